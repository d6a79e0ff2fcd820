use reqwest::StatusCode;
use thiserror::Error;

/// All possible error types that may occur while talking to the CRM API or configuring the portal
#[derive(Error, Debug)]
pub enum CrmError {
    #[error("Request was not authorized by the CRM API. {}", .detail.as_deref().unwrap_or("No detail provided"))]
    Unauthorized { detail: Option<String> },
    #[error("CRM API responded with {status}. {}", .detail.as_deref().unwrap_or("No detail provided"))]
    ApiResponse {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("Reqwest Error\n{0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Environment Variable error\n{0}")]
    EnvVar(#[from] std::env::VarError),
    #[error("Invalid configuration value for `{name}`. {reason}")]
    InvalidConfig { name: &'static str, reason: String },
    #[error("IO error\n{0}")]
    Io(#[from] std::io::Error),
    #[error("Generic error\n{0}")]
    Generic(String),
}

impl CrmError {
    /// Returns true if the error is the API rejecting the bearer credential (HTTP 401)
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns the error detail provided by the CRM API, if the error originated from an API
    /// response that carried one
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::ApiResponse { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<String> for CrmError {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

/// Generic [Result][std::result::Result] type where the error is always [CrmError]
pub type CrmResult<T> = std::result::Result<T, CrmError>;
