pub mod controller;
pub mod errors;
pub mod gateway;
pub mod types;

// Re-export commonly used types and functions
pub use controller::{SessionController, SessionHandle};
pub use errors::{GatewayError, SessionError};
pub use gateway::{RefreshGateway, RotatedToken};
pub use types::{
    LifecycleSnapshot, SessionEvent, SessionPhase, TerminationReason, WarningState,
};
