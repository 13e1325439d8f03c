//! Error types for authflow.
//!
//! Every failure of a flow step is expressed as a [`FlowError`]. The variants
//! follow the protocol steps, so a failure can be attributed to the exchange
//! that misbehaved without inspecting logs.

use thiserror::Error;

/// Errors produced by the authflow components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// The server could not be reached, timed out, or failed the liveness probe.
    #[error("Server unreachable at {url}: {reason}")]
    UnreachableServer {
        /// URL that was being requested.
        url: String,
        /// Transport-level reason.
        reason: String,
    },

    /// Discovery document missing or malformed.
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Client input rejected before any request was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authorization endpoint answered with neither a page nor a redirect.
    #[error("Authorization rejected with HTTP {status}: {body}")]
    Authorization {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Authorization code could not be recovered from the response.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The `state` echoed back does not match the one that was sent.
    #[error("State mismatch: expected {expected}, got {}", .actual.as_deref().unwrap_or("<none>"))]
    StateMismatch {
        /// State sent with the authorization request.
        expected: String,
        /// State received, if any.
        actual: Option<String>,
    },

    /// Code or refresh-token exchange rejected by the token endpoint.
    #[error("Token exchange rejected with HTTP {status}: {body}")]
    TokenExchange {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Protected resource call rejected.
    #[error("Resource access rejected with HTTP {status}: {body}")]
    ResourceAccess {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Successful status, but the body could not be decoded.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// Endpoint that produced the body.
        endpoint: String,
        /// Decoding failure.
        reason: String,
    },

    /// Invalid settings or HTTP client construction failure.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias using FlowError.
pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    /// Create an unreachable server error.
    pub fn unreachable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreachableServer {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery(message.into())
    }

    /// Create an extraction error.
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a token exchange error.
    pub fn token_exchange(status: u16, body: impl Into<String>) -> Self {
        Self::TokenExchange {
            status,
            body: body.into(),
        }
    }

    /// Create a resource access error.
    pub fn resource_access(status: u16, body: impl Into<String>) -> Self {
        Self::ResourceAccess {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error.
    pub fn malformed(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Get the HTTP status if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authorization { status, .. }
            | Self::TokenExchange { status, .. }
            | Self::ResourceAccess { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the preserved response body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Authorization { body, .. }
            | Self::TokenExchange { body, .. }
            | Self::ResourceAccess { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The OAuth2 `error` code from a JSON error body, e.g. `invalid_grant`.
    #[must_use]
    pub fn oauth_error_code(&self) -> Option<String> {
        let body = self.body()?;
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value.get("error")?.as_str().map(str::to_string)
    }

    /// Check if the server could not be reached at all.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::UnreachableServer { .. })
    }
}
