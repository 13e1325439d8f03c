//! HTTP transport shared by every flow component.

use std::time::Duration;

use authflow_core::{ClientSettings, FlowError, Result};
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, RequestBuilder, StatusCode};
use tracing::debug;
use url::Url;

/// Status, redirect target, and body of a completed call.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// HTTP client used by every step of the flow.
///
/// Holds one `reqwest` client with a per-call timeout. Redirects are not
/// followed, so the authorization step can inspect a `Location` itself.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    pub(crate) http: Client,
    timeout: Duration,
}

impl OAuthClient {
    /// Create a client for the given settings.
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        Self::with_timeout(settings.timeout)
    }

    /// Create a client with an explicit per-call timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .user_agent(concat!("authflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FlowError::Configuration(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { http, timeout })
    }

    /// Per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe the server root. Any 2xx status means the server is reachable.
    pub async fn check_liveness(&self, server_url: &Url) -> Result<()> {
        let response = self.execute(self.http.get(server_url.clone()), server_url).await?;

        if !response.status.is_success() {
            return Err(FlowError::unreachable(
                server_url.as_str(),
                format!("liveness probe returned HTTP {}", response.status.as_u16()),
            ));
        }

        debug!(url = %server_url, "Server is reachable");
        Ok(())
    }

    /// Send a request and read its body.
    ///
    /// Transport failures, including timeouts, become
    /// [`FlowError::UnreachableServer`].
    pub(crate) async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<RawResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| FlowError::unreachable(url.as_str(), self.describe(&e)))?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::unreachable(url.as_str(), self.describe(&e)))?;

        debug!(url = %url, status = status.as_u16(), bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            location,
            body,
        })
    }

    fn describe(&self, error: &reqwest::Error) -> String {
        if error.is_timeout() {
            format!("timed out after {:?}", self.timeout)
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        }
    }
}
