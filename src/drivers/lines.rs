//! Door relay and status LED output lines.
//!
//! [`LineController`] owns both output handles for the lifetime of the
//! door task.  It is generic over `embedded_hal::digital::OutputPin`, so the
//! same controller drives ESP-IDF `PinDriver`s, the host-side
//! [`SimLine`](super::sim_line::SimLine), and test doubles.
//!
//! ## Safety contract
//!
//! Both lines are LOW after [`LineController::initialize`] and after
//! [`LineController::release`].  If the owner never calls `release`
//! (panic unwind), `Drop` does it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`open_output`] claims a GPIO as a push-pull output.
//! On host/test: any `OutputPin` implementation can be handed in directly.

use core::fmt;

use embedded_hal::digital::{Error as _, ErrorKind, OutputPin, PinState};
use log::{debug, info, warn};

use crate::error::{HardwareInitError, HardwareIoError, level_name};

/// The two output lines the door task drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Door strike relay. HIGH = unlocked.
    Actuator,
    /// Status LED. HIGH = access granted.
    Indicator,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator => write!(f, "actuator"),
            Self::Indicator => write!(f, "indicator"),
        }
    }
}

pub struct LineController<A: OutputPin, I: OutputPin> {
    actuator: Option<A>,
    indicator: Option<I>,
}

impl<A: OutputPin, I: OutputPin> LineController<A, I> {
    /// Take ownership of both lines and drive them LOW.
    ///
    /// Both lines are attempted before an error is reported, so a line that
    /// accepted the write is left LOW even when its sibling failed.
    pub fn initialize(mut actuator: A, mut indicator: I) -> Result<Self, HardwareInitError> {
        let act = actuator
            .set_low()
            .map_err(|e| HardwareInitError::DriveLow {
                line: Line::Actuator,
                kind: e.kind(),
            });
        let ind = indicator
            .set_low()
            .map_err(|e| HardwareInitError::DriveLow {
                line: Line::Indicator,
                kind: e.kind(),
            });
        act?;
        ind?;

        info!("lines: actuator and indicator configured LOW");
        Ok(Self {
            actuator: Some(actuator),
            indicator: Some(indicator),
        })
    }

    /// Drive one line to `state`.
    pub fn set_line(&mut self, line: Line, state: PinState) -> Result<(), HardwareIoError> {
        match line {
            Line::Actuator => drive(self.actuator.as_mut(), line, state),
            Line::Indicator => drive(self.indicator.as_mut(), line, state),
        }
    }

    /// Best-effort LOW on both lines, actuator first.
    ///
    /// Both writes are always attempted; the first failure is returned.
    pub fn force_safe(&mut self) -> Result<(), HardwareIoError> {
        let act = self.set_line(Line::Actuator, PinState::Low);
        let ind = self.set_line(Line::Indicator, PinState::Low);
        act.and(ind)
    }

    /// Force both lines LOW and drop the handles.  Later calls are no-ops.
    pub fn release(&mut self) {
        if self.is_released() {
            return;
        }
        if let Err(e) = self.force_safe() {
            warn!("lines: release could not force safe state: {}", e);
        }
        self.actuator = None;
        self.indicator = None;
        info!("lines: released");
    }

    pub fn is_released(&self) -> bool {
        self.actuator.is_none() && self.indicator.is_none()
    }
}

impl<A: OutputPin, I: OutputPin> Drop for LineController<A, I> {
    fn drop(&mut self) {
        if !self.is_released() {
            warn!("lines: dropped without release, forcing LOW");
            self.release();
        }
    }
}

fn drive<P: OutputPin>(
    pin: Option<&mut P>,
    line: Line,
    state: PinState,
) -> Result<(), HardwareIoError> {
    let Some(pin) = pin else {
        return Err(HardwareIoError {
            line,
            state,
            kind: ErrorKind::Other,
        });
    };
    pin.set_state(state).map_err(|e| HardwareIoError {
        line,
        state,
        kind: e.kind(),
    })?;
    debug!("lines: {} -> {}", line, level_name(state));
    Ok(())
}

// ── ESP-IDF line construction ─────────────────────────────────

/// Push-pull GPIO output as handed to [`LineController`] on the device.
#[cfg(target_os = "espidf")]
pub type EspLine = esp_idf_hal::gpio::PinDriver<
    'static,
    esp_idf_hal::gpio::AnyOutputPin,
    esp_idf_hal::gpio::Output,
>;

/// Claim `gpio` as a push-pull output for `line`.
#[cfg(target_os = "espidf")]
pub fn open_output(line: Line, gpio: i32) -> Result<EspLine, HardwareInitError> {
    // SAFETY: the configured GPIOs are claimed exactly once, by the boot
    // path, before the door task starts.  Config validation rejects a
    // shared actuator/indicator pin.
    let pin = unsafe { esp_idf_hal::gpio::AnyOutputPin::new(gpio) };
    let driver = esp_idf_hal::gpio::PinDriver::output(pin)
        .map_err(|e| HardwareInitError::Configure { line, code: e.code() })?;
    info!("lines: {} on GPIO{}", line, gpio);
    Ok(driver)
}
