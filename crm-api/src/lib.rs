#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::cognitive_complexity)]
#![warn(clippy::empty_structs_with_brackets)]
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
#![warn(clippy::uninlined_format_args)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::use_self)]

//! Client side of the Cooper CRM REST API. Holds the data model returned by the API, the explicit
//! [SessionToken][session::SessionToken] used to authorize requests and the [CrmApi] service
//! trait with its [reqwest] backed implementation.

pub mod data;
pub mod service;
pub mod session;

pub use service::{http::HttpCrmApi, CrmApi};
pub use session::SessionToken;
