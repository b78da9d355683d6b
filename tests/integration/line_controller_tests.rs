//! LineController against recording mock lines.

use doorlatch::drivers::lines::{Line, LineController};
use doorlatch::error::HardwareInitError;
use doorlatch::signals::VisualStateFlag;
use embedded_hal::digital::{ErrorKind, PinState};

use crate::mock_hw::{MockLine, Trace};

const LOW: PinState = PinState::Low;
const HIGH: PinState = PinState::High;
const ACT: Line = Line::Actuator;
const IND: Line = Line::Indicator;

fn lines(trace: &Trace) -> (MockLine, MockLine) {
    let visual = VisualStateFlag::new();
    (MockLine::new(ACT, trace, &visual), MockLine::new(IND, trace, &visual))
}

#[test]
fn release_twice_writes_low_once() {
    let trace = Trace::new();
    let (act, ind) = lines(&trace);
    let mut ctl = LineController::initialize(act, ind).unwrap();

    ctl.set_line(ACT, HIGH).unwrap();
    ctl.release();
    ctl.release();
    drop(ctl);

    assert_eq!(
        trace.steps(),
        [(ACT, LOW), (IND, LOW), (ACT, HIGH), (ACT, LOW), (IND, LOW)]
    );
}

#[test]
fn force_safe_reaches_indicator_when_actuator_fails() {
    let trace = Trace::new();
    let (act, ind) = lines(&trace);
    let act_faults = act.faults();
    let mut ctl = LineController::initialize(act, ind).unwrap();
    ctl.set_line(IND, HIGH).unwrap();

    act_faults.fail_next_low(1);
    let err = ctl.force_safe().unwrap_err();

    assert_eq!(err.line, ACT);
    assert_eq!(err.state, LOW);
    assert_eq!(err.kind, ErrorKind::Other);
    assert_eq!(trace.level(IND), LOW);
    ctl.release();
}

#[test]
fn init_failure_on_indicator_still_lowers_actuator() {
    let trace = Trace::new();
    let (act, ind) = lines(&trace);
    ind.faults().fail_next_low(1);

    let err = LineController::initialize(act, ind).err().unwrap();

    assert_eq!(
        err,
        HardwareInitError::DriveLow {
            line: IND,
            kind: ErrorKind::Other
        }
    );
    assert_eq!(trace.steps(), [(ACT, LOW)]);
}

#[test]
fn writes_after_release_are_refused() {
    let trace = Trace::new();
    let (act, ind) = lines(&trace);
    let mut ctl = LineController::initialize(act, ind).unwrap();
    ctl.release();

    assert!(ctl.is_released());
    assert!(ctl.set_line(ACT, HIGH).is_err());
    assert_eq!(trace.level(ACT), LOW);
}
