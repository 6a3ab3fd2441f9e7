//! Default implementations for configuration types.
//!
//! This module contains the timing constants, all `Default` implementations,
//! and helper functions for providing default values in serde
//! deserialization.

use crate::config::types::{ActivitySection, LifecycleTimings, SessionSection, VigilConfig};
use std::time::Duration;

/// Default refresh interval in milliseconds (5 minutes).
///
/// Used when host context supplies no interval or the supplied string is
/// malformed. Also the total idle timeout: a session idle for the full
/// interval is terminated.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 300_000;

/// Length of the logout warning countdown in milliseconds (60 seconds).
///
/// The warning dialog opens this long before the idle timeout elapses.
pub const WARNING_DURATION_MS: u64 = 60_000;

/// Grace period in milliseconds past the idle timeout (5 seconds).
///
/// The hard-expiry fallback fires only after the timeout plus this margin,
/// giving the countdown path room to handle the normal case first.
pub const GRACE_PERIOD_MS: u64 = 5_000;

/// Evaluation and countdown tick period in milliseconds (1 second).
pub const TICK_PERIOD_MS: u64 = 1_000;

/// Default activity debounce window in milliseconds (1 second).
///
/// Bursts of interaction within this window coalesce into one recorded
/// timestamp. Must stay short relative to the warning duration or renewed
/// activity could go unnoticed during the countdown.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1_000;

/// Returns the default debounce window in milliseconds.
///
/// Used by serde `#[serde(default = "...")]` attribute.
pub fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for ActivitySection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            session: SessionSection::default(),
            activity: ActivitySection::default(),
        }
    }
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self::from_interval_ms(DEFAULT_REFRESH_INTERVAL_MS)
    }
}

impl LifecycleTimings {
    /// Total idle time after which the session must end.
    ///
    /// Equal to the refresh interval: a token that would have expired is a
    /// session that must not continue.
    pub fn total_idle_timeout(&self) -> Duration {
        self.refresh_interval
    }

    /// Idle time at which the warning phase begins.
    ///
    /// The total timeout minus the warning duration, saturating at zero
    /// when the interval is shorter than the warning itself.
    pub fn warning_threshold(&self) -> Duration {
        self.total_idle_timeout().saturating_sub(self.warning_duration)
    }

    /// Time since the last refresh at which a silent refresh is due (80% of
    /// the refresh interval, in whole milliseconds).
    pub fn refresh_after(&self) -> Duration {
        // u128 arithmetic: the parser accepts intervals above u64::MAX / 4 ms
        let ms = self.refresh_interval.as_millis() * 4 / 5;
        Duration::from_millis(u64::try_from(ms).unwrap_or(u64::MAX))
    }

    /// Idle time past which the hard-expiry fallback terminates the session.
    pub fn hard_expiry(&self) -> Duration {
        self.total_idle_timeout() + self.grace_period
    }
}
