//! HTTP clients for each step of an OAuth2 authorization-code flow.
//!
//! Every component is a stateless mapping of one request/response pair to a
//! typed record from `authflow-core`:
//!
//! - [`OAuthClient::check_liveness`]: probe the server root
//! - [`OAuthClient::fetch_configuration`]: fetch the discovery document
//! - [`build_authorization_url`]: build the authorization URL (pure)
//! - [`OAuthClient::request_authorization`]: simulate the browser redirect step
//! - [`AuthorizationCodeExtractor`]: recover the code from the response
//! - [`OAuthClient::exchange_code`] / [`OAuthClient::refresh`]: token grants
//! - [`OAuthClient::fetch_userinfo`]: protected resource access
//!
//! None of these components know about each other; the ordering belongs to
//! the orchestrator in the `authflow` crate.
//!
//! Note: this crate does NOT store tokens.

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod authorize;
mod discovery;
mod extract;
#[cfg(test)]
mod fixtures;
mod http;
mod token;
mod userinfo;

pub use authorize::{build_authorization_url, AuthorizationResponse};
pub use extract::{
    extract_code, extract_code_from_redirect, AuthorizationCodeExtractor, HtmlCodeExtractor,
    CODE_BOUNDARY, CODE_MARKER,
};
pub use http::OAuthClient;
