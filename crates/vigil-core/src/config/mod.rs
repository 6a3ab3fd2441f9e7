//! # Configuration System
//!
//! Timing configuration for the session lifecycle.
//!
//! ## Configuration Hierarchy
//!
//! Timings are resolved in the following order (later sources override
//! earlier ones):
//! 1. **Hardcoded defaults** - 5 minute refresh interval, 60 second warning
//! 2. **User config** - `~/.vigil/config.toml`
//! 3. **Host context / CLI arguments** - session context from the login
//!    response, or command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.vigil/config.toml
//! [session]
//! refresh_interval = "5m"
//!
//! [activity]
//! debounce_ms = 1000
//! ```
//!
//! ## Resolving Timings
//!
//! ```rust,no_run
//! use vigil_core::config::VigilConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VigilConfig::load()?;
//!     let timings = config.resolve_timings(Some("10m"))?;
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod duration;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use defaults::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_REFRESH_INTERVAL_MS, GRACE_PERIOD_MS, TICK_PERIOD_MS,
    WARNING_DURATION_MS,
};
pub use duration::{parse_duration, parse_duration_ms};
pub use types::{ActivitySection, LifecycleTimings, SessionConfig, SessionSection, VigilConfig};
pub use validation::validate_timings;

// Delegation for VigilConfig methods
impl VigilConfig {
    /// Load the user configuration file.
    ///
    /// See [`loading::load_user_config`] for details.
    pub fn load() -> Result<Self, crate::errors::ConfigError> {
        loading::load_user_config()
    }

    /// Resolve final timings, applying an optional override interval.
    ///
    /// See [`loading::resolve_timings`] for details.
    pub fn resolve_timings(
        &self,
        override_interval: Option<&str>,
    ) -> Result<LifecycleTimings, crate::errors::ConfigError> {
        loading::resolve_timings(self, override_interval)
    }
}

impl LifecycleTimings {
    /// Validate the timings.
    ///
    /// See [`validation::validate_timings`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_timings(self)
    }
}
