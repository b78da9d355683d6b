//! Shared boolean signals between the door task and its collaborators.
//!
//! Both are `Arc<AtomicBool>` handles; clones observe the same state.
//! Writers publish with `Release`, readers observe with `Acquire`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative shutdown request, raised by the process supervisor and
/// polled by the door task once per wait timeout.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// "Access granted" flag read by the rendering collaborator.
///
/// Only the door task writes it; everyone else gets a read-only view.
#[derive(Debug, Clone, Default)]
pub struct VisualStateFlag(Arc<AtomicBool>);

impl VisualStateFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Set the flag; it clears when the returned guard drops.
    pub(crate) fn raise_scoped(&self) -> VisualGuard {
        self.0.store(true, Ordering::Release);
        VisualGuard(self.clone())
    }

    pub(crate) fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clears the [`VisualStateFlag`] on drop.
pub(crate) struct VisualGuard(VisualStateFlag);

impl Drop for VisualGuard {
    fn drop(&mut self) {
        self.0.clear();
    }
}
