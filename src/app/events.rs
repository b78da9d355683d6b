//! Outbound door events.
//!
//! The [`DoorLoop`](super::door_loop::DoorLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  A completed unlock and a
//! failed one are separate variants, so a grant that never reached the
//! hardware cannot pass for a successful one.

use core::time::Duration;

use crate::error::HardwareIoError;
use crate::identity::Label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorEvent {
    /// Lines are configured LOW and the loop is serving.
    Started { unlock_interval: Duration },

    /// The recogniser reported the sentinel label.
    Denied,

    /// The door was held open for `held` and closed again.
    Unlocked { principal: Label, held: Duration },

    /// A stop request ended the hold early; the door was open for `held`
    /// and closed again.
    UnlockCut { principal: Label, held: Duration },

    /// The unlock sequence was abandoned; both lines were forced LOW.
    UnlockFailed {
        principal: Label,
        error: HardwareIoError,
    },

    /// The loop has stopped and released its lines.
    Stopped(DoorStats),
}

/// Per-run counters, returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoorStats {
    /// Completed unlocks, including those cut short by a stop request.
    pub granted: u32,
    pub denied: u32,
    pub failed: u32,
}

impl DoorStats {
    /// Events consumed from the identity source.
    pub fn processed(&self) -> u32 {
        self.granted + self.denied + self.failed
    }
}
