//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `embassy-sync` locks its channels through `critical-section` 1.x, which
//! expects the target to provide the acquire/release pair.  On the device
//! they map onto one process-wide re-entrant mutex.
//!
//! `async-io-mini`'s `Timer` reads time and schedules wake-ups through the
//! `embassy-time` driver symbols.  On the device these are backed by
//! `esp_timer`.  Host builds get both from the crates' `std` features.

#[cfg(target_os = "espidf")]
use core::cell::{Cell, RefCell};
#[cfg(target_os = "espidf")]
use core::task::Waker;
#[cfg(target_os = "espidf")]
use core::time::Duration;
#[cfg(target_os = "espidf")]
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(target_os = "espidf")]
static SECTION_LOCK: Mutex<()> = Mutex::new(());

#[cfg(target_os = "espidf")]
thread_local! {
    static NESTING: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    NESTING.with(|nesting| {
        let depth = nesting.get();
        if depth == 0 {
            // Poisoning is ignored: the lock guards no Rust data.
            let guard = SECTION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            HELD.with(|held| *held.borrow_mut() = Some(guard));
        }
        let depth = depth.saturating_add(1);
        nesting.set(depth);
        depth
    })
}

#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    NESTING.with(|nesting| {
        let depth = nesting.get();
        if depth == 0 {
            return;
        }
        nesting.set(depth - 1);
        if depth == 1 {
            HELD.with(|held| *held.borrow_mut() = None);
        }
    })
}

// ── embassy-time driver ───────────────────────────────────────

/// Microseconds since boot; embassy-time runs at 1 MHz ticks.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    // SAFETY: esp_timer is started by the IDF before `main`.
    unsafe { esp_idf_sys::esp_timer_get_time() as u64 }
}

/// Wake `waker` once `at` (in ticks) has passed.
///
/// A short-lived helper thread sleeps until the deadline.  The door task
/// arms at most one timer per poll, so these never pile up.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }
    // SAFETY: embassy-time hands over a pointer to a live `Waker` for the
    // duration of this call; it is cloned before returning.
    let waker = unsafe { (*(waker as *const Waker)).clone() };
    let fallback = waker.clone();
    let spawned = std::thread::Builder::new()
        .name("tmr-wake".into())
        .stack_size(2048)
        .spawn(move || {
            let now = _embassy_time_now();
            if at > now {
                std::thread::sleep(Duration::from_micros(at - now));
            }
            waker.wake();
        });
    if let Err(e) = spawned {
        log::warn!("timer: wake thread spawn failed ({}), waking now", e);
        fallback.wake();
    }
}
