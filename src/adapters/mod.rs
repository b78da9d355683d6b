//! Hexagonal adapters bridging the outside world to the door loop's ports.

pub mod log_sink;
pub mod serial_feed;
