use tracing::warn;

use vigil_core::VigilConfig;

/// Load the user configuration, falling back to defaults on failure.
///
/// A failed load is surfaced twice: a plain stderr warning for the user and
/// the `cli.config.load_failed` event for structured logs.
pub(crate) fn load_config_with_warning() -> VigilConfig {
    match VigilConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.vigil/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            VigilConfig::default()
        }
    }
}
