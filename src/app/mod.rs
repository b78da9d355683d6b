//! Application core. Door logic with no direct hardware access.
//!
//! Recognition results come in through [`ports::IdentitySource`],
//! observations go out through [`ports::EventSink`], and the output lines
//! are any `embedded_hal` output pins.  The loop is fully testable with
//! mock adapters.

pub mod door_loop;
pub mod events;
pub mod ports;
