//! Identity events from the recognition host.
//!
//! One event per recognition cycle.  The label is either the name of a
//! recognised principal or the [`UNKNOWN_LABEL`] sentinel.  Labels live in
//! a fixed-capacity string so events can sit in the identity queue
//! without heap allocation.

use core::fmt;

/// Sentinel label the recogniser emits when no principal matched.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Maximum label length in bytes.
pub const LABEL_CAPACITY: usize = 32;

pub type Label = heapless::String<LABEL_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelError {
    Empty,
    /// Label length in bytes.
    TooLong(usize),
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty identity label"),
            Self::TooLong(len) => {
                write!(f, "identity label is {len} bytes (max {LABEL_CAPACITY})")
            }
        }
    }
}

/// Outcome of classifying an [`IdentityEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Recognition failed (the sentinel label).
    Denied,
    /// Recognition succeeded for the named principal.
    Granted(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityEvent {
    label: Label,
}

impl IdentityEvent {
    pub fn new(label: &str) -> Result<Self, LabelError> {
        if label.is_empty() {
            return Err(LabelError::Empty);
        }
        let mut buf = Label::new();
        buf.push_str(label)
            .map_err(|()| LabelError::TooLong(label.len()))?;
        Ok(Self { label: buf })
    }

    /// An event carrying the sentinel label.
    pub fn unknown() -> Self {
        let mut label = Label::new();
        // The sentinel is well under LABEL_CAPACITY.
        let _ = label.push_str(UNKNOWN_LABEL);
        Self { label }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Exact, case-sensitive comparison against [`UNKNOWN_LABEL`].
    pub fn classify(&self) -> Verdict<'_> {
        if self.label.as_str() == UNKNOWN_LABEL {
            Verdict::Denied
        } else {
            Verdict::Granted(self.label.as_str())
        }
    }

    pub fn into_label(self) -> Label {
        self.label
    }
}

impl TryFrom<&str> for IdentityEvent {
    type Error = LabelError;

    fn try_from(label: &str) -> Result<Self, Self::Error> {
        Self::new(label)
    }
}

impl fmt::Display for IdentityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
