//! Unified error types for the door latch firmware.
//!
//! Hardware faults split into two families with different propagation
//! rules: [`HardwareInitError`] is fatal and stops the door task before it
//! serves a single event, [`HardwareIoError`] aborts one unlock and is
//! handled inside the loop.  Everything is `Copy` so errors can ride along
//! in [`DoorEvent`](crate::app::events::DoorEvent)s without allocation.

use core::fmt;

use embedded_hal::digital::{ErrorKind, PinState};

use crate::drivers::lines::Line;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Output lines could not be brought up.
    Init(HardwareInitError),
    /// An output line write failed.
    Io(HardwareIoError),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware initialisation errors
// ---------------------------------------------------------------------------

/// The output lines could not be configured.  The door task cannot
/// operate safely and terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareInitError {
    /// The GPIO could not be claimed as a push-pull output.
    Configure { line: Line, code: i32 },
    /// The line was claimed but refused its initial LOW level.
    DriveLow { line: Line, kind: ErrorKind },
}

impl fmt::Display for HardwareInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure { line, code } => {
                write!(f, "{line} line output config failed (rc={code})")
            }
            Self::DriveLow { line, kind } => {
                write!(f, "{line} line could not be driven LOW ({kind:?})")
            }
        }
    }
}

impl std::error::Error for HardwareInitError {}

impl From<HardwareInitError> for Error {
    fn from(e: HardwareInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware I/O errors
// ---------------------------------------------------------------------------

/// A single line write failed.  Recoverable: the current unlock is
/// abandoned and both lines are forced LOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareIoError {
    pub line: Line,
    /// Level that was being written when the failure occurred.
    pub state: PinState,
    pub kind: ErrorKind,
}

impl fmt::Display for HardwareIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line write {} failed ({:?})",
            self.line,
            level_name(self.state),
            self.kind
        )
    }
}

impl std::error::Error for HardwareIoError {}

impl From<HardwareIoError> for Error {
    fn from(e: HardwareIoError) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The stored document could not be parsed.
    Corrupted,
    /// A field failed range validation.
    /// The `&'static str` names the field and the rule it broke.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Upper-case level name for log lines.
pub const fn level_name(state: PinState) -> &'static str {
    match state {
        PinState::Low => "LOW",
        PinState::High => "HIGH",
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
