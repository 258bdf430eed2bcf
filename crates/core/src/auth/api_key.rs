//! Shared API key authentication.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{AuthError, AuthRequest, Authenticator, Identity};

/// Validates requests against one configured key.
///
/// The key is read from `Authorization: Bearer <key>` or `X-API-Key`. A
/// request that names an acting member is attributed to that member;
/// otherwise it is attributed to `api_key:<fingerprint>`, so activity
/// records never contain the key itself.
pub struct ApiKeyAuthenticator {
    expected_key: String,
    fingerprint: String,
}

impl ApiKeyAuthenticator {
    pub fn new(api_key: String) -> Self {
        let digest = format!("{:x}", Sha256::digest(api_key.as_bytes()));
        Self {
            fingerprint: digest[..12].to_string(),
            expected_key: api_key,
        }
    }

    fn extract_key(request: &AuthRequest) -> Option<&str> {
        let bearer = request.headers.get("authorization").and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        });

        bearer.or_else(|| request.headers.get("x-api-key").map(String::as_str))
    }

    fn key_identity(&self) -> Identity {
        Identity {
            user_id: format!("api_key:{}", self.fingerprint),
            method: self.method_name().to_string(),
            claims: Default::default(),
        }
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let provided = Self::extract_key(request).ok_or(AuthError::NotAuthenticated)?;

        if !constant_time_eq(provided.as_bytes(), self.expected_key.as_bytes()) {
            return Err(AuthError::InvalidCredentials("Invalid API key".to_string()));
        }

        let mut identity = Identity::from_acting_member(request, self.method_name())
            .unwrap_or_else(|| self.key_identity());
        identity.claims.insert(
            "key_fingerprint".to_string(),
            serde_json::Value::String(self.fingerprint.clone()),
        );
        Ok(identity)
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}

/// Byte comparison whose duration does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
