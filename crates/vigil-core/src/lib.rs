//! vigil-core: Core library for session lifecycle management
//!
//! This library provides the logic for keeping an authenticated session
//! alive: watching user activity, silently rotating the auth token before
//! it expires, warning the user ahead of an enforced logout, and performing
//! the logout when the user does not respond. It is used by the CLI and by
//! embedding hosts.
//!
//! # Main Entry Points
//!
//! - [`session`] - Spawn and drive the lifecycle controller
//! - [`activity`] - Record and query user activity
//! - [`config`] - Timing resolution and configuration management
//! - [`errors`] - Error taxonomy shared across modules

pub mod activity;
pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod session;

// Re-export commonly used types at crate root for convenience
pub use activity::{ActivitySource, ActivityTracker, SourceKind};
pub use config::{LifecycleTimings, SessionConfig, VigilConfig, parse_duration};
pub use errors::{ConfigError, VigilError};
pub use session::types::{
    LifecycleSnapshot, SessionEvent, SessionPhase, TerminationReason, WarningState,
};
pub use session::{GatewayError, RefreshGateway, RotatedToken, SessionController, SessionHandle};

// Re-export logging initialization
pub use logging::init_logging;
