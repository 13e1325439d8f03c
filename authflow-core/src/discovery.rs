//! Server discovery document.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{FlowError, Result};

/// Well-known path of the discovery document, relative to the server base.
pub const DISCOVERY_PATH: &str = ".well-known/openid_configuration";

/// URL of the discovery document published under `server_url`.
///
/// Any path on the server URL is kept as a prefix, so a server mounted at
/// `http://host/oauth` publishes `http://host/oauth/.well-known/...`.
pub fn discovery_url(server_url: &Url) -> Result<Url> {
    let mut base = server_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(DISCOVERY_PATH)
        .map_err(|e| FlowError::discovery(format!("cannot build discovery URL: {e}")))
}

/// Endpoints published by the authorization server.
///
/// All four fields are required. The value is immutable once fetched and
/// lives for one flow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfiguration {
    /// Issuer identifier, exactly as published.
    pub issuer: String,
    /// Authorization endpoint.
    pub authorization_endpoint: Url,
    /// Token endpoint.
    pub token_endpoint: Url,
    /// User info endpoint.
    pub userinfo_endpoint: Url,
}

/// Wire shape of the discovery document, before validation.
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    authorization_endpoint: Option<String>,
    #[serde(default)]
    token_endpoint: Option<String>,
    #[serde(default)]
    userinfo_endpoint: Option<String>,
}

impl ServerConfiguration {
    /// Parse and validate a discovery document.
    ///
    /// Fails with [`FlowError::Discovery`] if the body is not a JSON object,
    /// or if any required field is missing, empty, or not a URL.
    pub fn from_json(body: &str) -> Result<Self> {
        let doc: DiscoveryDocument = serde_json::from_str(body)
            .map_err(|e| FlowError::discovery(format!("invalid discovery document: {e}")))?;

        Ok(Self {
            issuer: required_issuer(doc.issuer)?,
            authorization_endpoint: required_url(
                "authorization_endpoint",
                doc.authorization_endpoint,
            )?,
            token_endpoint: required_url("token_endpoint", doc.token_endpoint)?,
            userinfo_endpoint: required_url("userinfo_endpoint", doc.userinfo_endpoint)?,
        })
    }
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| FlowError::discovery(format!("missing required field `{field}`")))
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value.trim())
        .map_err(|e| FlowError::discovery(format!("field `{field}` is not a URL ({value}): {e}")))
}

fn required_url(field: &str, value: Option<String>) -> Result<Url> {
    parse_url(field, &required(field, value)?)
}

// Kept verbatim, only validated as a URL.
fn required_issuer(value: Option<String>) -> Result<String> {
    let issuer = required("issuer", value)?;
    parse_url("issuer", &issuer)?;
    Ok(issuer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DOCUMENT: &str = r#"{
        "issuer": "http://127.0.0.1:3000",
        "authorization_endpoint": "http://127.0.0.1:3000/authorize",
        "token_endpoint": "http://127.0.0.1:3000/token",
        "userinfo_endpoint": "http://127.0.0.1:3000/userinfo",
        "scopes_supported": ["openid", "read", "write"]
    }"#;

    #[test]
    fn test_parse_valid_document() {
        let config = ServerConfiguration::from_json(DOCUMENT).unwrap();
        assert_eq!(config.issuer, "http://127.0.0.1:3000");
        assert_eq!(config.token_endpoint.path(), "/token");
        assert_eq!(config.userinfo_endpoint.path(), "/userinfo");
        assert_eq!(config.authorization_endpoint.path(), "/authorize");
    }

    #[rstest]
    #[case("issuer")]
    #[case("authorization_endpoint")]
    #[case("token_endpoint")]
    #[case("userinfo_endpoint")]
    fn test_missing_field_is_rejected(#[case] field: &str) {
        let mut doc: serde_json::Value = serde_json::from_str(DOCUMENT).unwrap();
        doc.as_object_mut().unwrap().remove(field);

        let err = ServerConfiguration::from_json(&doc.to_string()).unwrap_err();
        match err {
            FlowError::Discovery(msg) => assert!(msg.contains(field), "{msg}"),
            other => panic!("expected discovery error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let doc = DOCUMENT.replace("http://127.0.0.1:3000/token", "  ");
        let err = ServerConfiguration::from_json(&doc).unwrap_err();
        assert!(matches!(err, FlowError::Discovery(_)));
    }

    #[test]
    fn test_non_url_field_is_rejected() {
        let doc = DOCUMENT.replace("http://127.0.0.1:3000/userinfo", "not a url");
        let err = ServerConfiguration::from_json(&doc).unwrap_err();
        assert!(matches!(err, FlowError::Discovery(_)));
    }

    #[test]
    fn test_non_url_issuer_is_rejected() {
        let doc = DOCUMENT.replacen("http://127.0.0.1:3000", "issuer-1", 1);
        let err = ServerConfiguration::from_json(&doc).unwrap_err();
        match err {
            FlowError::Discovery(msg) => assert!(msg.contains("issuer"), "{msg}"),
            other => panic!("expected discovery error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("http://127.0.0.1:3000", "http://127.0.0.1:3000/.well-known/openid_configuration")]
    #[case("http://127.0.0.1:3000/", "http://127.0.0.1:3000/.well-known/openid_configuration")]
    #[case(
        "http://127.0.0.1:3000/oauth",
        "http://127.0.0.1:3000/oauth/.well-known/openid_configuration"
    )]
    #[case(
        "http://127.0.0.1:3000/oauth/",
        "http://127.0.0.1:3000/oauth/.well-known/openid_configuration"
    )]
    fn test_discovery_url_keeps_base_path(#[case] server: &str, #[case] expected: &str) {
        let url = discovery_url(&Url::parse(server).unwrap()).unwrap();
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn test_non_json_is_rejected() {
        let err = ServerConfiguration::from_json("<html>not found</html>").unwrap_err();
        assert!(matches!(err, FlowError::Discovery(_)));
    }
}
