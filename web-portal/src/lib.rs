#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::empty_structs_with_brackets)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::explicit_iter_loop)]
#![warn(clippy::expect_used)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::manual_string_new)]
#![warn(clippy::match_same_arms)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::panic)]
#![warn(clippy::print_stdout)]
#![warn(clippy::str_to_string)]
#![warn(clippy::string_to_string)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::use_self)]

//! Server rendered web portal of Cooper CRM Lite. Pages are rendered with leptos on the server
//! and every data operation is forwarded to the CRM REST API using the token stored in the
//! user's session cookie.

pub mod analytics;
pub mod components;
pub mod config;
pub mod pages;
mod utils;

use actix_session::{
    storage::CookieSessionStore, Session, SessionGetError, SessionInsertError, SessionMiddleware,
};
use actix_web::{
    cookie::{Key, SameSite},
    HttpResponse,
};
use common::error::{CrmError, CrmResult};
use crm_api::SessionToken;
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use thiserror::Error;

/// Session entry holding the CRM API bearer token
pub const TOKEN_SESSION_KEY: &str = "token";
pub const SESSION_COOKIE_NAME: &str = "crm_session";

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("User session does not contain a token")]
    MissingToken,
    #[error("Could not read the user session. {0}")]
    SessionGet(#[from] SessionGetError),
    #[error("Could not write the user session. {0}")]
    SessionInsert(#[from] SessionInsertError),
    #[error("CRM API returned a blank access token")]
    BlankToken,
    #[error(transparent)]
    Crm(#[from] CrmError),
}

impl PortalError {
    /// Response for a request that failed with this error. Missing or rejected credentials send
    /// the user back to the login page.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            Self::MissingToken => utils::redirect_login!(),
            Self::Crm(error) if error.is_unauthorized() => utils::redirect_login!(),
            Self::SessionGet(_) => {
                log::warn!("{self}");
                utils::redirect_login!()
            }
            _ => {
                log::error!("{self}");
                utils::internal_server_error!()
            }
        }
    }
}

/// Extract the CRM API token of the current user
/// # Errors
/// This function will return an error if the session cannot be read or holds no token
pub fn extract_session_token(session: &Session) -> Result<SessionToken, PortalError> {
    session
        .get::<SessionToken>(TOKEN_SESSION_KEY)?
        .ok_or(PortalError::MissingToken)
}

/// Start a fresh session holding `token`. Any previous session state is replaced.
/// # Errors
/// This function will return an error if the token cannot be written to the session
pub fn start_session(session: &Session, token: &SessionToken) -> Result<(), PortalError> {
    session.renew();
    session.insert(TOKEN_SESSION_KEY, token)?;
    Ok(())
}

/// Destroy the session, removing the session cookie from the browser
pub fn end_session(session: &Session) {
    session.purge();
}

/// Session middleware storing the session state in an encrypted cookie signed with `key`
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Strict)
        .cookie_secure(cookie_secure)
        .build()
}

/// Initialize log4rs from the config file at `path`, falling back to console logging when the
/// file cannot be loaded.
/// # Errors
/// This function will return an error if the fallback logger cannot be installed
pub fn init_logging(path: &str) -> CrmResult<()> {
    let Err(file_error) = log4rs::init_file(path, Default::default()) else {
        return Ok(());
    };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(
            Root::builder()
                .appender("stdout")
                .build(log::LevelFilter::Info),
        )
        .map_err(|error| CrmError::Generic(format!("Invalid fallback log config. {error}")))?;
    log4rs::init_config(config)
        .map_err(|error| CrmError::Generic(format!("Could not start logging. {error}")))?;
    log::warn!("Could not load log config from `{path}`. {file_error}. Logging to console only");
    Ok(())
}
