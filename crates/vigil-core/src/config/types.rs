//! Configuration type definitions for vigil.
//!
//! Three layers of configuration flow into a running session:
//!
//! 1. [`SessionConfig`] - raw context supplied by the authenticating host
//!    (token expiry timestamp plus a human-readable refresh interval)
//! 2. [`VigilConfig`] - the optional user config file, `~/.vigil/config.toml`
//! 3. [`LifecycleTimings`] - the resolved, immutable timing parameters that
//!    the controller actually runs on
//!
//! # Example Configuration
//!
//! ```toml
//! [session]
//! refresh_interval = "5m"
//!
//! [activity]
//! debounce_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::defaults::{
    DEFAULT_DEBOUNCE_MS, GRACE_PERIOD_MS, TICK_PERIOD_MS, WARNING_DURATION_MS,
};
use crate::config::duration::parse_duration;

/// Session context handed over by the host after authentication.
///
/// Field names accept both snake_case and camelCase spellings since the
/// context typically originates from a JSON login response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SessionConfig {
    /// Token expiry timestamp, RFC 3339. Informational only: it is logged
    /// at controller spawn but timing always derives from the refresh
    /// interval (expiry enforcement is server-side).
    #[serde(default, alias = "expiresAt")]
    pub expires_at: Option<String>,

    /// Human-readable refresh interval, e.g. "5m", "45s", "1h".
    #[serde(default, alias = "refreshInterval")]
    pub refresh_interval: Option<String>,
}

impl SessionConfig {
    /// Parse the expiry timestamp, if present and well-formed.
    ///
    /// Informational only; hosts log the remaining validity. A missing or
    /// malformed timestamp is `None`, never an error.
    pub fn expires_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.expires_at
            .as_deref()
            .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}

/// Main configuration loaded from the user config file.
///
/// Loaded from `~/.vigil/config.toml`; a missing file is not an error.
/// CLI flags override file values, file values override built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Session timing configuration
    #[serde(default)]
    pub session: SessionSection,

    /// Activity tracking configuration
    #[serde(default)]
    pub activity: ActivitySection,
}

/// `[session]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionSection {
    /// Refresh interval as a duration string ("5m", "45s", "1h").
    /// Default: 5 minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<String>,
}

/// `[activity]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySection {
    /// Debounce window for activity recording in milliseconds.
    /// Default: 1000ms.
    #[serde(default = "super::defaults::default_debounce_ms")]
    pub debounce_ms: u64,
}

/// Resolved timing parameters for one session.
///
/// Immutable once a controller is spawned. Derived values
/// (warning threshold, refresh-after point, hard expiry) are computed by
/// the accessor methods in [`super::defaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    /// Interval between token refreshes, also the total idle timeout.
    pub refresh_interval: Duration,
    /// Length of the logout warning countdown.
    pub warning_duration: Duration,
    /// Margin past the idle timeout before the hard-expiry fallback fires.
    pub grace_period: Duration,
    /// Evaluation and countdown tick period.
    pub tick_period: Duration,
    /// Activity debounce window.
    pub debounce: Duration,
}

impl LifecycleTimings {
    /// Build timings from a refresh interval in milliseconds.
    pub fn from_interval_ms(interval_ms: u64) -> Self {
        Self {
            refresh_interval: Duration::from_millis(interval_ms),
            warning_duration: Duration::from_millis(WARNING_DURATION_MS),
            grace_period: Duration::from_millis(GRACE_PERIOD_MS),
            tick_period: Duration::from_millis(TICK_PERIOD_MS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }

    /// Build timings from a duration string, falling back to the default
    /// interval on malformed input.
    pub fn from_interval_str(interval: &str) -> Self {
        Self {
            refresh_interval: parse_duration(interval),
            ..Self::default()
        }
    }

    /// Build timings from host-supplied session context.
    pub fn from_session_config(config: &SessionConfig) -> Self {
        match &config.refresh_interval {
            Some(interval) => Self::from_interval_str(interval),
            None => Self::default(),
        }
    }

    /// Override the activity debounce window.
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce = Duration::from_millis(debounce_ms);
        self
    }
}
