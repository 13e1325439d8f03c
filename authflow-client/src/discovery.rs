//! Configuration client.

use authflow_core::{discovery_url, FlowError, Result, ServerConfiguration};
use tracing::{debug, info};
use url::Url;

use crate::http::OAuthClient;

impl OAuthClient {
    /// Fetch and validate the discovery document published under `server_url`.
    ///
    /// Issues a single unauthenticated GET to the well-known path under the
    /// server base, keeping any path prefix. No retries.
    pub async fn fetch_configuration(&self, server_url: &Url) -> Result<ServerConfiguration> {
        let url = discovery_url(server_url)?;

        debug!(url = %url, "Fetching discovery document");
        let response = self.execute(self.http.get(url.clone()), &url).await?;

        if !response.status.is_success() {
            return Err(FlowError::discovery(format!(
                "{url} returned HTTP {}: {}",
                response.status.as_u16(),
                response.body
            )));
        }

        let config = ServerConfiguration::from_json(&response.body)?;
        info!(
            issuer = %config.issuer,
            authorization_endpoint = %config.authorization_endpoint,
            token_endpoint = %config.token_endpoint,
            userinfo_endpoint = %config.userinfo_endpoint,
            "Discovery document retrieved"
        );
        Ok(config)
    }
}
