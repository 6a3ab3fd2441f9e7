//! Duration string parsing.
//!
//! Session timing arrives from host context as human-readable strings like
//! `"5m"`, `"45s"`, or `"2h"`. Parsing is total: any malformed input falls
//! back to the default refresh interval instead of erroring, so a bad
//! upstream value degrades to default timing rather than breaking the
//! session lifecycle.

use std::time::Duration;
use tracing::debug;

use crate::config::defaults::DEFAULT_REFRESH_INTERVAL_MS;

/// Parse a human-readable duration string into a [`Duration`].
///
/// Accepts an integer prefix followed by a single unit suffix:
/// `s` (seconds), `m` (minutes), or `h` (hours). Unit matching is ASCII
/// case-insensitive and surrounding whitespace is ignored.
///
/// Falls back to 5 minutes (300 000 ms) for empty input, a missing or
/// unknown suffix, a non-integer prefix, a zero value, or arithmetic
/// overflow. The result is always positive. Never errors and never panics.
pub fn parse_duration(input: &str) -> Duration {
    Duration::from_millis(parse_duration_ms(input))
}

/// Millisecond variant of [`parse_duration`].
pub fn parse_duration_ms(input: &str) -> u64 {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();

    let scale: u64 = match chars.next_back().map(|c| c.to_ascii_lowercase()) {
        Some('s') => 1_000,
        Some('m') => 60_000,
        Some('h') => 3_600_000,
        _ => return fallback(input, "missing or unknown unit suffix"),
    };

    let Ok(value) = chars.as_str().parse::<u64>() else {
        return fallback(input, "non-integer value");
    };

    match value.checked_mul(scale) {
        Some(0) => fallback(input, "zero duration"),
        Some(ms) => ms,
        None => fallback(input, "value overflows"),
    }
}

fn fallback(input: &str, reason: &str) -> u64 {
    debug!(
        event = "core.config.duration_fallback",
        input = input,
        reason = reason,
        fallback_ms = DEFAULT_REFRESH_INTERVAL_MS
    );
    DEFAULT_REFRESH_INTERVAL_MS
}
