use serde::{Deserialize, Serialize};

use crate::session::SessionToken;

/// CRM user as returned by the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Name to greet the user with, falling back to the email when no name was registered
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Request body to register a new [User]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login credentials exchanged for a [Token]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Form fields of the OAuth2 password flow accepted by the token endpoint. The email is sent as
/// the `username` field.
#[derive(Serialize)]
pub(crate) struct TokenForm<'c> {
    username: &'c str,
    password: &'c str,
}

impl<'c> From<&'c Credentials> for TokenForm<'c> {
    fn from(value: &'c Credentials) -> Self {
        Self {
            username: &value.email,
            password: &value.password,
        }
    }
}

/// Token payload returned by a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Token {
    /// Convert the payload into the [SessionToken] used to authorize further requests. Returns
    /// [None] if the server sent a blank access token.
    pub fn into_session_token(self) -> Option<SessionToken> {
        SessionToken::new(self.access_token)
    }
}
