//! Port traits: the boundary between the door loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorLoop (domain)
//! ```
//!
//! The recognition feed sits behind [`IdentitySource`]; observers of the
//! loop sit behind [`EventSink`].  Output lines are not a port of their
//! own: the loop is generic over `embedded_hal::digital::OutputPin`.

use core::fmt;
use core::time::Duration;
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use crate::identity::IdentityEvent;

// ───────────────────────────────────────────────────────────────
// Identity source (driven adapter: recogniser → domain)
// ───────────────────────────────────────────────────────────────

/// Bounded-wait receive of identity events, oldest first.
pub trait IdentitySource {
    /// Wait at most `timeout` for the next event.
    fn next_event(&mut self, timeout: Duration) -> Result<IdentityEvent, SourceError>;
}

/// Why [`IdentitySource::next_event`] returned without an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// Nothing arrived within the timeout.  Benign.
    Timeout,
    /// Every producer has gone away; nothing will ever arrive.
    Closed,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out"),
            Self::Closed => write!(f, "source closed"),
        }
    }
}

impl IdentitySource for Receiver<IdentityEvent> {
    fn next_event(&mut self, timeout: Duration) -> Result<IdentityEvent, SourceError> {
        self.recv_timeout(timeout).map_err(|e| match e {
            RecvTimeoutError::Timeout => SourceError::Timeout,
            RecvTimeoutError::Disconnected => SourceError::Closed,
        })
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The loop emits structured [`DoorEvent`](super::events::DoorEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::DoorEvent);
}
