use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// Header carrying the id of the CRM member acting through the caller.
pub const MEMBER_ID_HEADER: &str = "x-member-id";

/// Header carrying that member's display name.
pub const MEMBER_NAME_HEADER: &str = "x-member-name";

/// Credentials and origin of an incoming request.
///
/// Header names are lowercase.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

impl AuthRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// The member the request acts for, with an optional display name.
    pub fn acting_member(&self) -> Option<(&str, Option<&str>)> {
        let member_id = self.header(MEMBER_ID_HEADER)?;
        Some((member_id, self.header(MEMBER_NAME_HEADER)))
    }
}

/// Who is calling.
///
/// Board operations take the caller's identity explicitly; it is used to
/// attribute activity records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub method: String,
    pub claims: HashMap<String, serde_json::Value>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: "anonymous".to_string(),
            method: "none".to_string(),
            claims: HashMap::new(),
        }
    }

    /// Identity of the member named in the request headers, if any.
    pub(crate) fn from_acting_member(request: &AuthRequest, method: &str) -> Option<Self> {
        let (member_id, name) = request.acting_member()?;
        let identity = Self {
            user_id: member_id.to_string(),
            method: method.to_string(),
            claims: HashMap::new(),
        };
        Some(match name {
            Some(name) => identity.with_name(name),
            None => identity,
        })
    }

    /// Attach a human-readable name, used in activity notifications.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.claims
            .insert("name".to_string(), serde_json::Value::String(name.into()));
        self
    }

    /// The `name` claim if present, otherwise the user id.
    pub fn display_name(&self) -> &str {
        self.claims
            .get("name")
            .and_then(|value| value.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.user_id)
    }
}
