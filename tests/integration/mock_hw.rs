//! Mock hardware for integration tests.
//!
//! [`MockLine`] records every accepted write into a shared [`Trace`],
//! together with the visual flag as it stood at that moment, so tests can
//! assert on the exact line sequence and on flag ordering.  Writes can be
//! made to fail through a [`FaultSwitch`] that stays with the test after
//! the line has been moved into the door task.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use doorlatch::app::events::DoorEvent;
use doorlatch::app::ports::EventSink;
use doorlatch::drivers::lines::Line;
use doorlatch::signals::VisualStateFlag;
use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};

// ── Line trace ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct Transition {
    pub line: Line,
    pub state: PinState,
    pub at: Instant,
    /// Visual flag as observed when the write landed.
    pub flag_set: bool,
}

#[derive(Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<Transition>>>);

#[allow(dead_code)]
impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, t: Transition) {
        self.0.lock().unwrap().push(t);
    }

    pub fn transitions(&self) -> Vec<Transition> {
        self.0.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<(Line, PinState)> {
        self.transitions()
            .iter()
            .map(|t| (t.line, t.state))
            .collect()
    }

    /// Last written level, LOW if never written.
    pub fn level(&self, line: Line) -> PinState {
        self.transitions()
            .iter()
            .rev()
            .find(|t| t.line == line)
            .map_or(PinState::Low, |t| t.state)
    }

    /// Time between the `nth` actuator HIGH and the LOW that follows it.
    pub fn actuator_hold(&self, nth: usize) -> Option<Duration> {
        let ts = self.transitions();
        let (i, opened) = ts
            .iter()
            .enumerate()
            .filter(|(_, t)| t.line == Line::Actuator && t.state == PinState::High)
            .nth(nth)?;
        let closed = ts[i..]
            .iter()
            .find(|t| t.line == Line::Actuator && t.state == PinState::Low)?;
        Some(closed.at - opened.at)
    }
}

// ── Fault injection ───────────────────────────────────────────

/// Number of upcoming HIGH / LOW writes that should fail.
#[derive(Clone, Default)]
pub struct FaultSwitch {
    high: Arc<AtomicU32>,
    low: Arc<AtomicU32>,
}

#[allow(dead_code)]
impl FaultSwitch {
    pub fn fail_next_high(&self, count: u32) {
        self.high.store(count, Ordering::SeqCst);
    }

    pub fn fail_next_low(&self, count: u32) {
        self.low.store(count, Ordering::SeqCst);
    }

    fn take(&self, state: PinState) -> bool {
        let counter = match state {
            PinState::High => &self.high,
            PinState::Low => &self.low,
        };
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[derive(Debug)]
pub struct MockPinError;

impl embedded_hal::digital::Error for MockPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

// ── MockLine ──────────────────────────────────────────────────

pub struct MockLine {
    line: Line,
    trace: Trace,
    visual: VisualStateFlag,
    faults: FaultSwitch,
}

#[allow(dead_code)]
impl MockLine {
    pub fn new(line: Line, trace: &Trace, visual: &VisualStateFlag) -> Self {
        Self {
            line,
            trace: trace.clone(),
            visual: visual.clone(),
            faults: FaultSwitch::default(),
        }
    }

    pub fn faults(&self) -> FaultSwitch {
        self.faults.clone()
    }

    fn write(&mut self, state: PinState) -> Result<(), MockPinError> {
        if self.faults.take(state) {
            return Err(MockPinError);
        }
        self.trace.record(Transition {
            line: self.line,
            state,
            at: Instant::now(),
            flag_set: self.visual.is_set(),
        });
        Ok(())
    }
}

impl ErrorType for MockLine {
    type Error = MockPinError;
}

impl OutputPin for MockLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(PinState::High)
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<DoorEvent>>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DoorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Principals of completed unlocks, in order.
    pub fn unlocked(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                DoorEvent::Unlocked { principal, .. } => Some(principal.as_str().to_owned()),
                _ => None,
            })
            .collect()
    }

    /// Number of events that consumed an identity.
    pub fn decisions(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    DoorEvent::Denied
                        | DoorEvent::Unlocked { .. }
                        | DoorEvent::UnlockCut { .. }
                        | DoorEvent::UnlockFailed { .. }
                )
            })
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DoorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Poll `cond` until it holds or `limit` passes.
#[allow(dead_code)]
pub fn wait_until(limit: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}
