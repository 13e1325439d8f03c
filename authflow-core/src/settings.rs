//! Client settings for a flow run.
//!
//! A [`ClientSettings`] value carries the client identity and the target
//! server. It is passed explicitly into the orchestrator, so several runs
//! with different identities can coexist in one process.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::authorization::AuthorizationRequest;
use crate::discovery;
use crate::errors::{FlowError, Result};

/// Default server root.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
/// Default client identifier.
pub const DEFAULT_CLIENT_ID: &str = "test_client";
/// Default redirect URI.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
/// Default scopes.
pub const DEFAULT_SCOPE: &str = "read write";
/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Environment variable prefix read by [`ClientSettings::from_env`].
pub const ENV_PREFIX: &str = "AUTHFLOW";

/// Settings for one flow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Root URL of the authorization server.
    pub server_url: Url,
    /// OAuth client identifier.
    pub client_id: String,
    /// Redirect URI registered for the client.
    pub redirect_uri: String,
    /// Requested scopes.
    pub scopes: Vec<String>,
    /// Opaque `state` sent with the authorization request.
    pub state: String,
    /// Timeout applied to each individual call.
    pub timeout: Duration,
    /// Probe the server root before starting the flow.
    pub check_liveness: bool,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scopes: split_scope(DEFAULT_SCOPE),
            state: generate_state(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            check_liveness: true,
        }
    }
}

impl ClientSettings {
    /// Create settings with defaults and a fresh random state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from `AUTHFLOW_*` environment variables.
    ///
    /// Looks for:
    /// - `AUTHFLOW_SERVER_URL`
    /// - `AUTHFLOW_CLIENT_ID`
    /// - `AUTHFLOW_REDIRECT_URI`
    /// - `AUTHFLOW_SCOPE` (space-delimited)
    /// - `AUTHFLOW_STATE`
    /// - `AUTHFLOW_TIMEOUT_SECS`
    /// - `AUTHFLOW_CHECK_LIVENESS` (`true`/`false`)
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));
        let mut settings = Self::default();

        if let Some(url) = var("SERVER_URL") {
            settings = settings.with_server_url(&url)?;
        }
        if let Some(client_id) = var("CLIENT_ID") {
            settings.client_id = client_id;
        }
        if let Some(redirect_uri) = var("REDIRECT_URI") {
            settings.redirect_uri = redirect_uri;
        }
        if let Some(scope) = var("SCOPE") {
            settings.scopes = split_scope(&scope);
        }
        if let Some(state) = var("STATE") {
            settings.state = state;
        }
        if let Some(secs) = var("TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                FlowError::Configuration(format!(
                    "{ENV_PREFIX}_TIMEOUT_SECS is not a number: {secs}"
                ))
            })?;
            settings.timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = var("CHECK_LIVENESS") {
            settings.check_liveness = parse_flag(&flag).ok_or_else(|| {
                FlowError::Configuration(format!(
                    "{ENV_PREFIX}_CHECK_LIVENESS must be true or false: {flag}"
                ))
            })?;
        }

        Ok(settings)
    }

    /// Set the server root URL.
    pub fn with_server_url(mut self, url: &str) -> Result<Self> {
        self.server_url = Url::parse(url)
            .map_err(|e| FlowError::Configuration(format!("invalid server URL {url}: {e}")))?;
        Ok(self)
    }

    /// Set the client identifier.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Set the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Set the requested scopes.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set the `state` value.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Set the per-call timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable the liveness probe.
    #[must_use]
    pub fn with_liveness_check(mut self, enabled: bool) -> Self {
        self.check_liveness = enabled;
        self
    }

    /// URL of the discovery document under the configured server.
    pub fn discovery_url(&self) -> Result<Url> {
        discovery::discovery_url(&self.server_url)
    }

    /// Build the validated authorization request for these settings.
    pub fn authorization_request(&self) -> Result<AuthorizationRequest> {
        AuthorizationRequest::new(
            self.client_id.clone(),
            &self.redirect_uri,
            self.scopes.iter().cloned(),
            self.state.clone(),
        )
    }
}

/// Split a space-delimited scope string.
pub fn split_scope(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(str::to_string).collect()
}

fn generate_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = ClientSettings::default();
        assert_eq!(settings.server_url.as_str(), "http://127.0.0.1:3000/");
        assert_eq!(settings.client_id, "test_client");
        assert_eq!(settings.redirect_uri, "http://localhost:8080/callback");
        assert_eq!(settings.scopes, vec!["read", "write"]);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert!(settings.check_liveness);
        assert_eq!(settings.state.len(), 32);
    }

    #[test]
    fn test_default_state_is_fresh() {
        assert_ne!(ClientSettings::new().state, ClientSettings::new().state);
    }

    #[test]
    fn test_from_lookup() {
        let settings = ClientSettings::from_lookup(lookup(&[
            ("AUTHFLOW_SERVER_URL", "http://auth.example.com:9000"),
            ("AUTHFLOW_CLIENT_ID", "harness"),
            ("AUTHFLOW_SCOPE", "openid  profile"),
            ("AUTHFLOW_STATE", "xyz"),
            ("AUTHFLOW_TIMEOUT_SECS", "12"),
            ("AUTHFLOW_CHECK_LIVENESS", "false"),
        ]))
        .unwrap();

        assert_eq!(settings.server_url.as_str(), "http://auth.example.com:9000/");
        assert_eq!(settings.client_id, "harness");
        assert_eq!(settings.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(settings.scopes, vec!["openid", "profile"]);
        assert_eq!(settings.state, "xyz");
        assert_eq!(settings.timeout, Duration::from_secs(12));
        assert!(!settings.check_liveness);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = ClientSettings::from_lookup(lookup(&[("AUTHFLOW_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, FlowError::Configuration(_)));

        let err = ClientSettings::from_lookup(lookup(&[("AUTHFLOW_SERVER_URL", "::nope")]))
            .unwrap_err();
        assert!(matches!(err, FlowError::Configuration(_)));

        let err = ClientSettings::from_lookup(lookup(&[("AUTHFLOW_CHECK_LIVENESS", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, FlowError::Configuration(_)));
    }

    #[test]
    fn test_discovery_url_keeps_base_path() {
        let settings = ClientSettings::new()
            .with_server_url("http://127.0.0.1:3000/base/")
            .unwrap();
        assert_eq!(
            settings.discovery_url().unwrap().as_str(),
            "http://127.0.0.1:3000/base/.well-known/openid_configuration"
        );
    }

    #[test]
    fn test_authorization_request() {
        let request = ClientSettings::new()
            .with_client_id("c1")
            .with_scopes(["openid"])
            .with_state("s1")
            .authorization_request()
            .unwrap();
        assert_eq!(request.client_id(), "c1");
        assert_eq!(request.scope(), "openid");
        assert_eq!(request.state(), "s1");
    }
}
