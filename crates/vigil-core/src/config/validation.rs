//! Timing validation.
//!
//! Degenerate timings are mostly logged, not rejected: parsing is total and
//! the session lifecycle must keep working with whatever interval the host
//! supplied. Only a zero tick period or a zero refresh interval is an
//! error, since neither can drive the lifecycle.

use crate::config::types::LifecycleTimings;
use crate::errors::ConfigError;
use tracing::warn;

/// Validate resolved timings.
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfiguration` if the tick period is zero
/// (the controller could never evaluate) or the refresh interval is zero
/// (every derived timing collapses to zero and the session would refresh
/// and expire on the first tick). Short but non-zero refresh intervals are
/// accepted with a warning: the warning threshold clamps to zero and the
/// dialog opens on the first idle evaluation.
pub fn validate_timings(timings: &LifecycleTimings) -> Result<(), ConfigError> {
    if timings.tick_period.is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "tick period must be non-zero".to_string(),
        });
    }

    if timings.refresh_interval.is_zero() {
        return Err(ConfigError::InvalidConfiguration {
            message: "refresh interval must be non-zero".to_string(),
        });
    }

    if timings.refresh_interval <= timings.warning_duration {
        warn!(
            event = "core.config.short_refresh_interval",
            interval_ms = timings.refresh_interval.as_millis() as u64,
            warning_ms = timings.warning_duration.as_millis() as u64,
            message = "refresh interval does not exceed warning duration, warning opens immediately when idle"
        );
    }

    if !timings.warning_duration.is_zero() && timings.debounce >= timings.warning_duration {
        warn!(
            event = "core.config.debounce_exceeds_warning",
            debounce_ms = timings.debounce.as_millis() as u64,
            warning_ms = timings.warning_duration.as_millis() as u64,
            message = "debounce window reaches into the warning countdown, renewed activity may be coalesced away"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_timings_are_valid() {
        assert!(validate_timings(&LifecycleTimings::default()).is_ok());
    }

    #[test]
    fn test_zero_tick_period_rejected() {
        let timings = LifecycleTimings {
            tick_period: Duration::ZERO,
            ..LifecycleTimings::default()
        };
        let result = validate_timings(&timings);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_short_interval_accepted_with_warning() {
        // 30s interval is shorter than the 60s warning; threshold clamps to
        // zero but the configuration still works
        let timings = LifecycleTimings::from_interval_ms(30_000);
        assert!(validate_timings(&timings).is_ok());
        assert_eq!(timings.warning_threshold(), Duration::ZERO);
    }

    #[test]
    fn test_zero_interval_rejected() {
        // from_interval_ms bypasses the parser fallback, so validation is
        // the only guard on this path
        let timings = LifecycleTimings::from_interval_ms(0);
        let result = validate_timings(&timings);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidConfiguration { .. })
        ));
    }
}
