//! In-memory output line for host builds.
//!
//! Stands in for a GPIO when the firmware runs off-target.  The level is
//! kept in a shared [`LineProbe`] so the owner of the line (the door task)
//! and an observer can look at the same state from different threads.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin, PinState};
use log::debug;

use super::lines::Line;
use crate::error::level_name;

#[derive(Debug, Default)]
struct ProbeState {
    high: AtomicBool,
    writes: AtomicU32,
}

/// Read-only view of a [`SimLine`].
#[derive(Debug, Clone, Default)]
pub struct LineProbe(Arc<ProbeState>);

impl LineProbe {
    pub fn level(&self) -> PinState {
        PinState::from(self.0.high.load(Ordering::Acquire))
    }

    /// Number of writes the line has accepted.
    pub fn writes(&self) -> u32 {
        self.0.writes.load(Ordering::Relaxed)
    }
}

pub struct SimLine {
    line: Line,
    probe: LineProbe,
}

impl SimLine {
    pub fn new(line: Line) -> Self {
        Self {
            line,
            probe: LineProbe::default(),
        }
    }

    pub fn probe(&self) -> LineProbe {
        self.probe.clone()
    }

    fn write(&mut self, state: PinState) {
        self.probe
            .0
            .high
            .store(state == PinState::High, Ordering::Release);
        self.probe.0.writes.fetch_add(1, Ordering::Relaxed);
        debug!("sim: {} {}", self.line, level_name(state));
    }
}

impl ErrorType for SimLine {
    type Error = Infallible;
}

impl OutputPin for SimLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High);
        Ok(())
    }
}
