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
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::panic)]
#![warn(clippy::print_stdout)]
#![warn(clippy::str_to_string)]
#![warn(clippy::string_to_string)]
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::use_self)]

//! Common components of the Cooper CRM Lite application suite

use std::env::VarError;

use crate::error::{CrmError, CrmResult};

pub mod error;

/// Read the environment variable `name`, returning [None] if the variable is not set.
/// # Errors
/// This function will return an error if the variable is set but does not contain valid unicode
pub fn env_optional(name: &str) -> CrmResult<Option<String>> {
    match std::env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Join a `base` url and a `path`, making sure exactly one slash separates them. Trailing slashes
/// of the `path` are kept since the CRM API distinguishes `/users/` from `/users`.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Validate that `value` looks like an absolute http(s) url.
/// # Errors
/// This function will return an error if the url does not start with `http://` or `https://`
pub fn validate_base_url(name: &'static str, value: &str) -> CrmResult<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Ok(());
    }
    Err(CrmError::InvalidConfig {
        name,
        reason: format!("Expected an http(s) url but found `{value}`"),
    })
}
