use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthRequest, Identity};

#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials were presented.
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// The `[auth]` section cannot produce an authenticator.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Resolves the [`Identity`] behind a request.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError>;

    /// Value of `auth.method` this authenticator serves.
    fn method_name(&self) -> &'static str;
}
