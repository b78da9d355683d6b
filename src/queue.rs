//! Identity event queue between the recognition feed and the door task.
//!
//! Wraps an `embassy-sync` bounded MPMC channel.  Any number of producers
//! publish; the door task is the single consumer.  The channel buffers
//! events that arrive while an unlock is being held, and hands them out
//! strictly in arrival order afterwards.
//!
//! ```text
//! ┌──────────────┐  IdentityEvent  ┌──────────────┐
//! │ Serial feed  │───────────────▶│              │
//! │ Recogniser   │───────────────▶│  Door task   │
//! └──────────────┘   (depth 16)    └──────────────┘
//! ```
//!
//! The bounded wait races `receive()` against an `async-io-mini` timer
//! under `futures_lite::future::block_on`, so an idle door task sleeps in
//! the reactor instead of spinning.

use core::time::Duration;
use std::sync::Arc;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use futures_lite::future;

use crate::app::ports::{IdentitySource, SourceError};
use crate::identity::IdentityEvent;

/// Channel depth for identity events.
pub const IDENTITY_QUEUE_DEPTH: usize = 16;

pub struct IdentityQueue {
    channel: Channel<CriticalSectionRawMutex, IdentityEvent, IDENTITY_QUEUE_DEPTH>,
}

impl Default for IdentityQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityQueue {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Enqueue without waiting.  Hands the event back if the queue is full.
    pub fn try_publish(&self, event: IdentityEvent) -> Result<(), IdentityEvent> {
        self.channel
            .try_send(event)
            .map_err(|e| match e {
                TrySendError::Full(event) => event,
            })
    }

    /// Enqueue, blocking the caller until there is room.
    pub fn publish(&self, event: IdentityEvent) {
        future::block_on(self.channel.send(event));
    }

    /// Dequeue the oldest event, waiting at most `timeout`.
    pub fn receive_timeout(&self, timeout: Duration) -> Option<IdentityEvent> {
        if let Ok(event) = self.channel.try_receive() {
            return Some(event);
        }
        future::block_on(future::or(
            async { Some(self.channel.receive().await) },
            async {
                async_io_mini::Timer::after(timeout).await;
                None
            },
        ))
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl IdentitySource for Arc<IdentityQueue> {
    fn next_event(&mut self, timeout: Duration) -> Result<IdentityEvent, SourceError> {
        self.receive_timeout(timeout).ok_or(SourceError::Timeout)
    }
}
