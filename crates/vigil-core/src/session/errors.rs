//! Session error types.

use crate::errors::VigilError;

/// Errors reported by the host's refresh gateway.
///
/// The controller treats every variant identically: a failed refresh
/// terminates the session. The distinction exists for logging and for the
/// host's own handling.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error during session call: {message}")]
    Network { message: String },

    #[error("Credentials rejected: {message}")]
    Credential { message: String },

    #[error("Backend returned status {status}")]
    Backend { status: u16 },
}

impl VigilError for GatewayError {
    fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Network { .. } => "GATEWAY_NETWORK",
            GatewayError::Credential { .. } => "GATEWAY_CREDENTIAL",
            GatewayError::Backend { .. } => "GATEWAY_BACKEND",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, GatewayError::Credential { .. })
    }
}

/// Errors surfaced through the session handle.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session already terminated")]
    Terminated,

    #[error("Controller shutdown failed: {message}")]
    ShutdownFailed { message: String },
}

impl VigilError for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            SessionError::Terminated => "SESSION_TERMINATED",
            SessionError::ShutdownFailed { .. } => "SESSION_SHUTDOWN_FAILED",
        }
    }
}
