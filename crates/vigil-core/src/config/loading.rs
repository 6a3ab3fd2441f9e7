//! Configuration loading and timing resolution.
//!
//! This module handles loading the user config file and resolving the final
//! timing parameters from all sources.
//!
//! # Resolution Order
//!
//! Later sources override earlier ones:
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.vigil/config.toml`
//! 3. **CLI arguments / host context** - Highest priority

use crate::config::types::{LifecycleTimings, VigilConfig};
use crate::config::validation::validate_timings;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Path of the user config file (`~/.vigil/config.toml`), if a home
/// directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".vigil").join("config.toml"))
}

/// Load the user configuration.
///
/// A missing config file is not an error; defaults are returned. Parse and
/// IO errors on an existing file fail.
pub fn load_user_config() -> Result<VigilConfig, ConfigError> {
    let Some(path) = user_config_path() else {
        warn!(
            event = "core.config.home_dir_not_found",
            message = "could not determine home directory, using defaults"
        );
        return Ok(VigilConfig::default());
    };

    match load_config_file(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::ConfigNotFound { .. }) => {
            debug!(event = "core.config.user_config_missing", path = %path.display());
            Ok(VigilConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<VigilConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let config: VigilConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            message: format!("{}: {}", path.display(), e),
        })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(config)
}

/// Resolve the final timings from config file values and an optional
/// override interval (CLI flag or host context).
///
/// # Errors
///
/// Returns an error if the resolved timings fail validation. Malformed
/// interval strings do not error; the duration parser falls back to the
/// default interval.
pub fn resolve_timings(
    config: &VigilConfig,
    override_interval: Option<&str>,
) -> Result<LifecycleTimings, ConfigError> {
    let interval = override_interval.or(config.session.refresh_interval.as_deref());

    let timings = match interval {
        Some(s) => LifecycleTimings::from_interval_str(s),
        None => LifecycleTimings::default(),
    }
    .with_debounce_ms(config.activity.debounce_ms);

    validate_timings(&timings)?;

    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_config_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_file(&dir.path().join("config.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_config_file_parses_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[session]
refresh_interval = "10m"

[activity]
debounce_ms = 500
"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.session.refresh_interval, Some("10m".to_string()));
        assert_eq!(config.activity.debounce_ms, 500);
    }

    #[test]
    fn test_load_config_file_invalid_toml_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "invalid toml [[[").unwrap();

        let result = load_config_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_resolve_timings_override_wins() {
        let config = VigilConfig {
            session: crate::config::types::SessionSection {
                refresh_interval: Some("10m".to_string()),
            },
            ..VigilConfig::default()
        };

        let timings = resolve_timings(&config, Some("2m")).unwrap();
        assert_eq!(timings.refresh_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_resolve_timings_falls_back_to_file_then_default() {
        let config = VigilConfig {
            session: crate::config::types::SessionSection {
                refresh_interval: Some("10m".to_string()),
            },
            ..VigilConfig::default()
        };
        let timings = resolve_timings(&config, None).unwrap();
        assert_eq!(timings.refresh_interval, Duration::from_secs(600));

        let timings = resolve_timings(&VigilConfig::default(), None).unwrap();
        assert_eq!(timings.refresh_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_resolve_timings_applies_debounce() {
        let config: VigilConfig = toml::from_str(
            r#"
[activity]
debounce_ms = 250
"#,
        )
        .unwrap();
        let timings = resolve_timings(&config, None).unwrap();
        assert_eq!(timings.debounce, Duration::from_millis(250));
    }
}
