//! Line-oriented identity feed.
//!
//! The recognition host writes one label per line over the serial console
//! (stdin on both the device and the host build).  Each line is trimmed
//! and published to the [`IdentityQueue`]; blank lines are skipped, and
//! undecodable or malformed lines are logged and dropped.  End of input
//! raises the stop signal.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::JoinHandle;

use log::{info, warn};

use crate::drivers::task_pin::{Core, spawn_on_core};
use crate::identity::IdentityEvent;
use crate::queue::IdentityQueue;
use crate::signals::StopSignal;

const FEED_TASK_PRIORITY: u8 = 5;
const FEED_TASK_STACK_KB: usize = 6;

/// Counters for one run of [`pump_lines`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub published: u32,
    pub rejected: u32,
}

/// Publish every label read from `reader`, blocking while the queue is full.
///
/// Lines that are not UTF-8 or not a valid label are counted as rejected
/// and skipped.  Returns at end of input, on a read error, or once `stop`
/// is raised.
pub fn pump_lines<R: BufRead>(mut reader: R, queue: &IdentityQueue, stop: &StopSignal) -> FeedStats {
    let mut stats = FeedStats::default();
    let mut buf = Vec::with_capacity(64);
    while !stop.is_raised() {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("feed: read error: {}", e);
                break;
            }
        }
        let Ok(line) = core::str::from_utf8(&buf) else {
            warn!("feed: dropping undecodable line ({} bytes)", buf.len());
            stats.rejected += 1;
            continue;
        };
        let label = line.trim();
        if label.is_empty() {
            continue;
        }
        match IdentityEvent::new(label) {
            Ok(event) => {
                queue.publish(event);
                stats.published += 1;
            }
            Err(e) => {
                warn!("feed: dropping label: {}", e);
                stats.rejected += 1;
            }
        }
    }
    stats
}

/// Spawn the stdin feed on the protocol core.  Raises `stop` at end of input.
pub fn spawn_stdin_feed(
    queue: Arc<IdentityQueue>,
    stop: StopSignal,
) -> io::Result<JoinHandle<FeedStats>> {
    spawn_on_core(
        Core::Pro,
        FEED_TASK_PRIORITY,
        FEED_TASK_STACK_KB,
        "feed\0",
        move || {
            let stats = pump_lines(io::stdin().lock(), &queue, &stop);
            info!(
                "feed: input closed (published={}, rejected={})",
                stats.published, stats.rejected
            );
            stop.raise();
            stats
        },
    )
}
