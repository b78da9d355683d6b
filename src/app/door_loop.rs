//! Door control loop, the application core.
//!
//! [`DoorLoop`] drains an [`IdentitySource`], classifies each event, and
//! turns a grant into one timed unlock of the door strike.  All shared
//! state arrives in a [`DoorContext`] at construction; the output lines
//! are acquired by [`DoorLoop::run`] and released on every way out of it.
//!
//! ```text
//!  IdentitySource ──▶ ┌──────────────────┐ ──▶ LineController
//!                     │     DoorLoop      │
//!      StopSignal ──▶ │  IDLE ⇄ UNLOCKING │ ──▶ VisualStateFlag
//!                     └──────────────────┘ ──▶ EventSink
//! ```
//!
//! ## Unlock sequence
//!
//! flag set → indicator HIGH → actuator HIGH → hold → actuator LOW →
//! indicator LOW → flag clear.  The hold blocks this task only; events
//! that arrive meanwhile wait in the source.  A failed line write aborts
//! the sequence, both lines are forced LOW, the flag is cleared, and the
//! loop goes back to serving.
//!
//! The hold is the only time the loop is UNLOCKING, and the
//! [`VisualStateFlag`] is set for exactly that span, so observers on other
//! tasks read the loop state from the flag.

use core::time::Duration;
use std::thread::JoinHandle;
use std::time::Instant;

use embedded_hal::digital::{OutputPin, PinState};
use log::{error, info, warn};

use crate::config::DoorTiming;
use crate::drivers::lines::{Line, LineController};
use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::error::{HardwareIoError, Result};
use crate::identity::{IdentityEvent, Label, Verdict};
use crate::signals::{StopSignal, VisualStateFlag};

use super::events::{DoorEvent, DoorStats};
use super::ports::{EventSink, IdentitySource, SourceError};

/// Longest single sleep of an interruptible hold.
const HOLD_SLICE: Duration = Duration::from_millis(20);

const DOOR_TASK_PRIORITY: u8 = 10;
const DOOR_TASK_STACK_KB: usize = 8;

/// How a hold ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hold {
    Full,
    /// A stop request ended an interruptible hold early.
    Cut,
}

/// Everything the loop shares with other tasks.
pub struct DoorContext<S> {
    pub source: S,
    pub stop: StopSignal,
    pub visual: VisualStateFlag,
}

pub struct DoorLoop<S, K> {
    ctx: DoorContext<S>,
    sink: K,
    timing: DoorTiming,
    stats: DoorStats,
}

impl<S: IdentitySource, K: EventSink> DoorLoop<S, K> {
    pub fn new(timing: DoorTiming, ctx: DoorContext<S>, sink: K) -> Self {
        Self {
            ctx,
            sink,
            timing,
            stats: DoorStats::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Acquire the lines, serve until stopped, release the lines.
    ///
    /// Only a failed initialisation is returned as an error; everything
    /// after that is handled inside the loop.
    pub fn run<A: OutputPin, I: OutputPin>(
        mut self,
        actuator: A,
        indicator: I,
    ) -> Result<DoorStats> {
        let mut lines = LineController::initialize(actuator, indicator).map_err(|e| {
            error!("door: line init failed, not serving: {}", e);
            e
        })?;

        info!(
            "door: serving (unlock={:?}, poll={:?}, interruptible_hold={})",
            self.timing.unlock_interval, self.timing.poll_timeout, self.timing.interruptible_hold
        );
        self.sink.emit(&DoorEvent::Started {
            unlock_interval: self.timing.unlock_interval,
        });

        self.serve(&mut lines);

        lines.release();
        self.ctx.visual.clear();

        info!(
            "door: stopped (granted={}, denied={}, failed={})",
            self.stats.granted, self.stats.denied, self.stats.failed
        );
        self.sink.emit(&DoorEvent::Stopped(self.stats));
        Ok(self.stats)
    }

    fn serve<A: OutputPin, I: OutputPin>(&mut self, lines: &mut LineController<A, I>) {
        while !self.ctx.stop.is_raised() {
            match self.ctx.source.next_event(self.timing.poll_timeout) {
                Ok(event) => self.handle_event(event, lines),
                Err(SourceError::Timeout) => {}
                Err(SourceError::Closed) => {
                    info!("door: identity source closed");
                    break;
                }
            }
        }
    }

    // ── Per-event handling ────────────────────────────────────

    /// Classify one event and act on it.
    pub fn handle_event<A: OutputPin, I: OutputPin>(
        &mut self,
        event: IdentityEvent,
        lines: &mut LineController<A, I>,
    ) {
        if event.classify() == Verdict::Denied {
            info!("door: unrecognised identity, staying locked");
            self.stats.denied += 1;
            self.sink.emit(&DoorEvent::Denied);
            return;
        }
        self.unlock(event.into_label(), lines);
    }

    fn unlock<A: OutputPin, I: OutputPin>(
        &mut self,
        principal: Label,
        lines: &mut LineController<A, I>,
    ) {
        info!("door: granted to {}, unlocking", principal);

        let shown = self.ctx.visual.raise_scoped();
        let outcome = self.actuate(lines);
        if outcome.is_err() {
            if let Err(e) = lines.force_safe() {
                error!("door: could not force lines LOW after failure: {}", e);
            }
        }

        drop(shown);

        match outcome {
            Ok((held, Hold::Full)) => {
                self.stats.granted += 1;
                self.sink.emit(&DoorEvent::Unlocked { principal, held });
            }
            Ok((held, Hold::Cut)) => {
                self.stats.granted += 1;
                self.sink.emit(&DoorEvent::UnlockCut { principal, held });
            }
            Err(error) => {
                warn!("door: unlock for {} aborted: {}", principal, error);
                self.stats.failed += 1;
                self.sink.emit(&DoorEvent::UnlockFailed { principal, error });
            }
        }
    }

    /// Drive the unlock sequence; returns how long the actuator was HIGH.
    fn actuate<A: OutputPin, I: OutputPin>(
        &self,
        lines: &mut LineController<A, I>,
    ) -> core::result::Result<(Duration, Hold), HardwareIoError> {
        lines.set_line(Line::Indicator, PinState::High)?;
        lines.set_line(Line::Actuator, PinState::High)?;
        let opened = Instant::now();

        let hold = self.hold();

        lines.set_line(Line::Actuator, PinState::Low)?;
        let held = opened.elapsed();
        lines.set_line(Line::Indicator, PinState::Low)?;
        Ok((held, hold))
    }

    /// Keep the door open for the unlock interval.
    fn hold(&self) -> Hold {
        if !self.timing.interruptible_hold {
            std::thread::sleep(self.timing.unlock_interval);
            return Hold::Full;
        }

        let deadline = Instant::now() + self.timing.unlock_interval;
        loop {
            let now = Instant::now();
            if now >= deadline {
                return Hold::Full;
            }
            if self.ctx.stop.is_raised() {
                warn!("door: stop raised, cutting hold short");
                return Hold::Cut;
            }
            std::thread::sleep((deadline - now).min(HOLD_SLICE));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn stats(&self) -> DoorStats {
        self.stats
    }

    pub fn timing(&self) -> DoorTiming {
        self.timing
    }
}

/// Run `door` on its own task pinned to the application core.
pub fn spawn_door_task<S, K, A, I>(
    door: DoorLoop<S, K>,
    actuator: A,
    indicator: I,
) -> std::io::Result<JoinHandle<Result<DoorStats>>>
where
    S: IdentitySource + Send + 'static,
    K: EventSink + Send + 'static,
    A: OutputPin + Send + 'static,
    I: OutputPin + Send + 'static,
{
    spawn_on_core(
        Core::App,
        DOOR_TASK_PRIORITY,
        DOOR_TASK_STACK_KB,
        "door\0",
        move || door.run(actuator, indicator),
    )
}
