//! Request authentication.
//!
//! The server resolves an [`Identity`] for every API request and passes it to
//! the board service, which records it on activity entries.

mod api_key;
mod none;
mod traits;
mod types;

pub use api_key::*;
pub use none::*;
pub use traits::*;
pub use types::*;

use crate::config::{AuthConfig, AuthMethod};

/// Build the authenticator selected by `auth.method`.
pub fn create_authenticator(config: &AuthConfig) -> Result<Box<dyn Authenticator>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(NoneAuthenticator::new())),
        AuthMethod::ApiKey => match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(Box::new(ApiKeyAuthenticator::new(key.to_string()))),
            _ => Err(AuthError::ConfigurationError(
                "auth.api_key must be set when auth.method = \"api_key\"".to_string(),
            )),
        },
    }
}
