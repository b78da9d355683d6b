//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing door events to the logger (UART /
//! USB-CDC on the device).  Access events are not persisted.

use log::{info, warn};

use crate::app::events::DoorEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`DoorEvent`] as one tagged line.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DoorEvent) {
        match event {
            DoorEvent::Started { unlock_interval } => {
                info!("START | unlock_interval={}ms", unlock_interval.as_millis());
            }
            DoorEvent::Denied => {
                info!("DENY  | identity=Unknown");
            }
            DoorEvent::Unlocked { principal, held } => {
                info!("GRANT | principal={} | held={}ms", principal, held.as_millis());
            }
            DoorEvent::UnlockCut { principal, held } => {
                warn!(
                    "CUT   | principal={} | held={}ms | stop requested",
                    principal,
                    held.as_millis()
                );
            }
            DoorEvent::UnlockFailed { principal, error } => {
                warn!("FAIL  | principal={} | {}", principal, error);
            }
            DoorEvent::Stopped(stats) => {
                info!(
                    "STOP  | granted={} denied={} failed={}",
                    stats.granted, stats.denied, stats.failed
                );
            }
        }
    }
}
