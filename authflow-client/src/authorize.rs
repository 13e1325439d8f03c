//! Authorization request builder and the simulated authorization step.

use authflow_core::{AuthorizationRequest, FlowError, Result, ServerConfiguration};
use tracing::{debug, info};
use url::Url;

use crate::http::OAuthClient;

/// Build the authorization URL for `request`.
///
/// Pure: the parameters are appended in a fixed order
/// (`response_type`, `client_id`, `redirect_uri`, `scope`, `state`) after any
/// query the endpoint already carries, so identical inputs always give the
/// same URL string.
pub fn build_authorization_url(
    config: &ServerConfiguration,
    request: &AuthorizationRequest,
) -> Url {
    let mut url = config.authorization_endpoint.clone();
    url.query_pairs_mut()
        .append_pair("response_type", request.response_type())
        .append_pair("client_id", request.client_id())
        .append_pair("redirect_uri", request.redirect_uri().as_str())
        .append_pair("scope", &request.scope())
        .append_pair("state", request.state());
    url
}

/// What the authorization endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationResponse {
    /// A human-readable page embedding the code.
    Page(String),
    /// A redirect whose `Location` carries the code.
    Redirect(Url),
}

impl OAuthClient {
    /// Request the authorization URL directly, standing in for the browser.
    ///
    /// A 2xx answer yields the page body, a 3xx answer with a `Location`
    /// yields the resolved redirect target. Anything else is
    /// [`FlowError::Authorization`].
    pub async fn request_authorization(&self, url: &Url) -> Result<AuthorizationResponse> {
        debug!(url = %url, "Requesting authorization");
        let response = self.execute(self.http.get(url.clone()), url).await?;

        if response.status.is_success() {
            info!(status = response.status.as_u16(), "Authorization page received");
            return Ok(AuthorizationResponse::Page(response.body));
        }

        if response.status.is_redirection() {
            if let Some(location) = response.location.as_deref() {
                let target = url.join(location).map_err(|e| {
                    FlowError::extraction(format!("invalid redirect location {location}: {e}"))
                })?;
                info!(status = response.status.as_u16(), "Authorization redirect received");
                return Ok(AuthorizationResponse::Redirect(target));
            }
        }

        Err(FlowError::Authorization {
            status: response.status.as_u16(),
            body: response.body,
        })
    }
}
