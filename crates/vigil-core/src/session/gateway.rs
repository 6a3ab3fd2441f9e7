//! Refresh gateway seam.
//!
//! The controller never talks to the network itself. The embedding host
//! implements [`RefreshGateway`] over its own HTTP client and hands it in
//! at spawn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::session::errors::GatewayError;

/// A rotated authentication token returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotatedToken {
    pub token: String,
}

impl RotatedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// Backend session calls supplied by the embedding host.
#[async_trait]
pub trait RefreshGateway: Send + Sync {
    /// Exchange the current token for a fresh one.
    ///
    /// Must be safe to call repeatedly. Any error terminates the session;
    /// the controller never retries.
    async fn refresh(&self) -> Result<RotatedToken, GatewayError>;

    /// Invalidate the server-side session.
    ///
    /// Best-effort: the controller logs failures and terminates locally
    /// regardless of the outcome.
    async fn logout(&self) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct FixedGateway;

    #[async_trait]
    impl RefreshGateway for FixedGateway {
        async fn refresh(&self) -> Result<RotatedToken, GatewayError> {
            Ok(RotatedToken::new("tok-1"))
        }

        async fn logout(&self) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_gateway_usable_as_trait_object() {
        let gateway: Arc<dyn RefreshGateway> = Arc::new(FixedGateway);
        let token = gateway.refresh().await.unwrap();
        assert_eq!(token.token, "tok-1");
        assert!(gateway.logout().await.is_ok());
    }

    #[test]
    fn test_rotated_token_wire_shape() {
        let token = RotatedToken::new("abc123");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "{\"token\":\"abc123\"}");

        let parsed: RotatedToken = serde_json::from_str("{\"token\":\"xyz\"}").unwrap();
        assert_eq!(parsed.token, "xyz");
    }
}
