//! Shared test fixtures.

use std::time::Duration;

use authflow_core::ServerConfiguration;

use crate::http::OAuthClient;

/// Discovery document publishing the usual endpoints under `base`.
pub(crate) fn document(base: &str) -> serde_json::Value {
    serde_json::json!({
        "issuer": base,
        "authorization_endpoint": format!("{base}/authorize"),
        "token_endpoint": format!("{base}/token"),
        "userinfo_endpoint": format!("{base}/userinfo"),
    })
}

pub(crate) fn config(base: &str) -> ServerConfiguration {
    ServerConfiguration::from_json(&document(base).to_string()).unwrap()
}

pub(crate) fn client() -> OAuthClient {
    OAuthClient::with_timeout(Duration::from_secs(5)).unwrap()
}
