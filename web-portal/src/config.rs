use actix_web::cookie::Key;
use common::{
    env_optional,
    error::{CrmError, CrmResult},
    validate_base_url,
};

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_LOG_CONFIG: &str = "web-portal/web_portal_log.yml";
const DEFAULT_ASSETS_DIR: &str = "web-portal/assets";

/// Runtime settings of the portal server, read from environment variables
pub struct PortalConfig {
    /// Base url of the CRM REST API (`CRM_API_URL`)
    pub api_url: String,
    /// Socket address the server binds to (`PORTAL_ADDRESS`)
    pub address: String,
    /// Key signing and encrypting the session cookie (`SECRET_KEY`). [None] when not configured,
    /// in which case a random key must be generated once at startup.
    pub secret_key: Option<Key>,
    /// Only send the session cookie over https (`COOKIE_SECURE`)
    pub cookie_secure: bool,
    /// Path of the log4rs config file (`LOG_CONFIG`)
    pub log_config: String,
    /// Directory served under `/assets` (`ASSETS_DIR`)
    pub assets_dir: String,
}

impl PortalConfig {
    /// Read the config from the process environment
    /// # Errors
    /// This function will return an error if any variable is present but invalid
    pub fn from_env() -> CrmResult<Self> {
        Self::from_lookup(env_optional)
    }

    /// Read the config using `lookup` to resolve each variable name. Blank values are treated as
    /// missing.
    /// # Errors
    /// This function will return an error if `lookup` fails or any value is invalid
    pub fn from_lookup<F>(lookup: F) -> CrmResult<Self>
    where
        F: Fn(&str) -> CrmResult<Option<String>>,
    {
        let get = |name: &str| -> CrmResult<Option<String>> {
            Ok(lookup(name)?.filter(|value| !value.trim().is_empty()))
        };

        let api_url = get("CRM_API_URL")?.unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        validate_base_url("CRM_API_URL", &api_url)?;
        let secret_key = match get("SECRET_KEY")? {
            Some(value) => Some(parse_secret_key(&value)?),
            None => None,
        };
        let cookie_secure = match get("COOKIE_SECURE")? {
            Some(value) => parse_flag("COOKIE_SECURE", &value)?,
            None => false,
        };
        Ok(Self {
            api_url,
            address: get("PORTAL_ADDRESS")?.unwrap_or_else(|| DEFAULT_ADDRESS.to_owned()),
            secret_key,
            cookie_secure,
            log_config: get("LOG_CONFIG")?.unwrap_or_else(|| DEFAULT_LOG_CONFIG.to_owned()),
            assets_dir: get("ASSETS_DIR")?.unwrap_or_else(|| DEFAULT_ASSETS_DIR.to_owned()),
        })
    }
}

fn parse_secret_key(value: &str) -> CrmResult<Key> {
    Key::try_from(value.as_bytes()).map_err(|error| CrmError::InvalidConfig {
        name: "SECRET_KEY",
        reason: format!("{error}. Expected at least 64 bytes"),
    })
}

fn parse_flag(name: &'static str, value: &str) -> CrmResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(CrmError::InvalidConfig {
            name,
            reason: format!("Expected a boolean flag but found `{other}`"),
        }),
    }
}
