use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Accepts every request.
///
/// Callers may still name the acting member through the member headers;
/// otherwise they are anonymous. Must be configured with `method = "none"`.
#[derive(Debug, Default)]
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        Ok(Identity::from_acting_member(request, self.method_name())
            .unwrap_or_else(Identity::anonymous))
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
