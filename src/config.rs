//! Door configuration parameters
//!
//! Line assignments and timing for the door task.  The firmware embeds a
//! JSON document at build time; every value is range-checked before the
//! door task sees it.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    // --- Lines ---
    /// GPIO driving the door strike relay.
    pub actuator_gpio: i32,
    /// GPIO driving the "access granted" LED.
    pub indicator_gpio: i32,

    // --- Timing ---
    /// How long the strike stays energised per grant (milliseconds)
    pub unlock_interval_ms: u32,
    /// Bounded wait on the identity queue between stop checks (milliseconds)
    pub poll_timeout_ms: u32,
    /// Let a raised stop signal cut an unlock hold short.
    pub interruptible_hold: bool,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            actuator_gpio: 5,
            indicator_gpio: 6,

            unlock_interval_ms: 3000,
            poll_timeout_ms: 1000,
            interruptible_hold: false,
        }
    }
}

impl DoorConfig {
    /// Parse and validate a JSON config document.  Missing fields take
    /// their defaults.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(doc).map_err(|e| {
            log::warn!("config: parse error: {}", e);
            ConfigError::Corrupted
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the door task cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actuator_gpio < 0 {
            return Err(ConfigError::ValidationFailed("actuator_gpio must be >= 0"));
        }
        if self.indicator_gpio < 0 {
            return Err(ConfigError::ValidationFailed("indicator_gpio must be >= 0"));
        }
        if self.actuator_gpio == self.indicator_gpio {
            return Err(ConfigError::ValidationFailed(
                "actuator_gpio and indicator_gpio must differ",
            ));
        }
        if self.unlock_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("unlock_interval_ms must be > 0"));
        }
        if self.poll_timeout_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_timeout_ms must be > 0"));
        }
        Ok(())
    }

    /// Timing parameters for the door loop.  Call after [`validate`](Self::validate).
    pub fn timing(&self) -> DoorTiming {
        DoorTiming {
            unlock_interval: Duration::from_millis(u64::from(self.unlock_interval_ms)),
            poll_timeout: Duration::from_millis(u64::from(self.poll_timeout_ms)),
            interruptible_hold: self.interruptible_hold,
        }
    }
}

/// Timing the door loop runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTiming {
    /// Actuator HIGH time per grant.
    pub unlock_interval: Duration,
    /// Upper bound on stop-signal latency while idle.
    pub poll_timeout: Duration,
    pub interruptible_hold: bool,
}

impl DoorTiming {
    pub fn new(unlock_interval: Duration, poll_timeout: Duration) -> Result<Self, ConfigError> {
        if unlock_interval.is_zero() {
            return Err(ConfigError::ValidationFailed("unlock interval must be > 0"));
        }
        if poll_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed("poll timeout must be > 0"));
        }
        Ok(Self {
            unlock_interval,
            poll_timeout,
            interruptible_hold: false,
        })
    }

    pub fn with_interruptible_hold(mut self, interruptible: bool) -> Self {
        self.interruptible_hold = interruptible;
        self
    }
}
