use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Opaque bearer credential issued by the CRM API at login. The portal never inspects the token,
/// it only stores it for the lifetime of the browser session and forwards it with every
/// authenticated request.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Create a new token from the raw credential. Returns [None] if the credential is blank since
    /// an empty bearer value can never authorize a request.
    pub fn new<S: Into<String>>(token: S) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self(token))
    }

    /// Raw credential as sent in the `Authorization` header
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full `Authorization` header value for this token
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for SessionToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(****)")
    }
}
