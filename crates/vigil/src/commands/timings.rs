use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use vigil_core::config::LifecycleTimings;
use vigil_core::events;

use super::helpers::load_config_with_warning;

/// Resolved timing parameters in milliseconds, as emitted by `timings --json`.
#[derive(Serialize)]
struct TimingsOutput {
    refresh_interval_ms: u64,
    warning_duration_ms: u64,
    warning_threshold_ms: u64,
    refresh_after_ms: u64,
    grace_period_ms: u64,
    hard_expiry_ms: u64,
    debounce_ms: u64,
}

impl From<&LifecycleTimings> for TimingsOutput {
    fn from(timings: &LifecycleTimings) -> Self {
        Self {
            refresh_interval_ms: timings.refresh_interval.as_millis() as u64,
            warning_duration_ms: timings.warning_duration.as_millis() as u64,
            warning_threshold_ms: timings.warning_threshold().as_millis() as u64,
            refresh_after_ms: timings.refresh_after().as_millis() as u64,
            grace_period_ms: timings.grace_period.as_millis() as u64,
            hard_expiry_ms: timings.hard_expiry().as_millis() as u64,
            debounce_ms: timings.debounce.as_millis() as u64,
        }
    }
}

pub(crate) fn handle_timings_command(
    matches: &ArgMatches,
) -> Result<(), Box<dyn std::error::Error>> {
    let interval_override = matches.get_one::<String>("refresh-interval");
    let json_output = matches.get_flag("json");

    info!(
        event = "cli.timings_started",
        interval_override = ?interval_override,
        json_output = json_output
    );

    let config = load_config_with_warning();
    let timings = match config.resolve_timings(interval_override.map(|s| s.as_str())) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to resolve timings: {}", e);
            error!(event = "cli.timings_failed", error = %e);
            events::log_vigil_error(&e);
            return Err(e.into());
        }
    };

    let output = TimingsOutput::from(&timings);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Refresh interval:   {}", format_ms(output.refresh_interval_ms));
        println!("Warning duration:   {}", format_ms(output.warning_duration_ms));
        println!("Warning threshold:  {}", format_ms(output.warning_threshold_ms));
        println!("Silent refresh at:  {}", format_ms(output.refresh_after_ms));
        println!("Grace period:       {}", format_ms(output.grace_period_ms));
        println!("Hard expiry:        {}", format_ms(output.hard_expiry_ms));
        println!("Activity debounce:  {}", format_ms(output.debounce_ms));
    }

    info!(
        event = "cli.timings_completed",
        refresh_interval_ms = output.refresh_interval_ms
    );

    Ok(())
}

/// Render a millisecond count with the coarsest exact unit.
fn format_ms(ms: u64) -> String {
    if ms == 0 {
        "0s".to_string()
    } else if ms % 60_000 == 0 {
        format!("{}m", ms / 60_000)
    } else if ms % 1_000 == 0 {
        format!("{}s", ms / 1_000)
    } else {
        format!("{}ms", ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timings_output_from_defaults() {
        let timings = LifecycleTimings::default();
        let output = TimingsOutput::from(&timings);

        assert_eq!(output.refresh_interval_ms, 300_000);
        assert_eq!(output.warning_duration_ms, 60_000);
        assert_eq!(output.warning_threshold_ms, 240_000);
        assert_eq!(output.refresh_after_ms, 240_000);
        assert_eq!(output.grace_period_ms, 5_000);
        assert_eq!(output.hard_expiry_ms, 305_000);
        assert_eq!(output.debounce_ms, 1_000);
    }

    #[test]
    fn test_timings_output_from_custom_interval() {
        let timings = LifecycleTimings::from_interval_ms(600_000);
        let output = TimingsOutput::from(&timings);

        assert_eq!(output.refresh_interval_ms, 600_000);
        assert_eq!(output.warning_threshold_ms, 540_000);
        assert_eq!(output.refresh_after_ms, 480_000);
        assert_eq!(output.hard_expiry_ms, 605_000);
    }

    #[test]
    fn test_timings_output_serializes_all_fields() {
        let timings = LifecycleTimings::default();
        let json = serde_json::to_value(TimingsOutput::from(&timings)).unwrap();

        for field in [
            "refresh_interval_ms",
            "warning_duration_ms",
            "warning_threshold_ms",
            "refresh_after_ms",
            "grace_period_ms",
            "hard_expiry_ms",
            "debounce_ms",
        ] {
            assert!(json.get(field).is_some(), "missing field: {}", field);
        }
    }

    #[test]
    fn test_format_ms_whole_minutes() {
        assert_eq!(format_ms(300_000), "5m");
        assert_eq!(format_ms(60_000), "1m");
        assert_eq!(format_ms(3_600_000), "60m");
    }

    #[test]
    fn test_format_ms_whole_seconds() {
        assert_eq!(format_ms(45_000), "45s");
        assert_eq!(format_ms(5_000), "5s");
    }

    #[test]
    fn test_format_ms_sub_second() {
        assert_eq!(format_ms(250), "250ms");
        assert_eq!(format_ms(1_500), "1500ms");
    }

    #[test]
    fn test_format_ms_zero() {
        assert_eq!(format_ms(0), "0s");
    }
}
