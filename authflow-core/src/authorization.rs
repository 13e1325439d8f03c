//! Authorization request and code types.

use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{FlowError, Result};

/// The only response type the harness requests.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Parameters of an authorization-code request.
///
/// Built once per flow through [`AuthorizationRequest::new`], which rejects
/// malformed input. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRequest {
    client_id: String,
    redirect_uri: Url,
    scope: IndexSet<String>,
    state: String,
}

impl AuthorizationRequest {
    /// Create a validated authorization request.
    ///
    /// Duplicate scopes collapse, keeping the order of first occurrence.
    pub fn new<I, S>(
        client_id: impl Into<String>,
        redirect_uri: &str,
        scopes: I,
        state: impl Into<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(FlowError::invalid_request("client_id must not be empty"));
        }

        let redirect_uri = Url::parse(redirect_uri).map_err(|e| {
            FlowError::invalid_request(format!("redirect_uri is not a URL ({redirect_uri}): {e}"))
        })?;

        let mut scope = IndexSet::new();
        for s in scopes {
            let s: String = s.into();
            if s.is_empty() || s.chars().any(char::is_whitespace) {
                return Err(FlowError::invalid_request(format!(
                    "invalid scope token {s:?}"
                )));
            }
            scope.insert(s);
        }

        let state = state.into();
        if state.is_empty() {
            return Err(FlowError::invalid_request("state must not be empty"));
        }

        Ok(Self {
            client_id,
            redirect_uri,
            scope,
            state,
        })
    }

    /// Always `"code"`.
    pub fn response_type(&self) -> &'static str {
        RESPONSE_TYPE_CODE
    }

    /// Client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Redirect URI registered for the client.
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Requested scopes, in order.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scope.iter().map(String::as_str)
    }

    /// Scopes serialized as a space-delimited string.
    pub fn scope(&self) -> String {
        self.scopes().collect::<Vec<_>>().join(" ")
    }

    /// Opaque correlation token.
    pub fn state(&self) -> &str {
        &self.state
    }
}

/// An authorization code issued by the server.
///
/// Single-use by protocol convention; the server enforces that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    /// Wrap a code, rejecting empty or blank values.
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(FlowError::extraction("authorization code is empty"));
        }
        Ok(Self(code))
    }

    /// The code as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorizationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
