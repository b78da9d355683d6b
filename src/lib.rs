//! Door latch firmware library.
//!
//! Turns identity-recognition results into timed door-strike unlocks.
//! Exposes the door loop, its ports and the line drivers for integration
//! testing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF needs the `espidf` feature: `cargo build --features espidf`");

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod identity;
pub mod queue;
pub mod signals;

mod esp_link_shims;
