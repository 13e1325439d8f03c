//! Resource client.

use authflow_core::{FlowError, Result, ServerConfiguration, UserInfo};
use reqwest::header::ACCEPT;
use tracing::{debug, info};

use crate::http::OAuthClient;

impl OAuthClient {
    /// Fetch the user profile with a bearer token.
    ///
    /// Idempotent; repeatable with the same token.
    pub async fn fetch_userinfo(
        &self,
        config: &ServerConfiguration,
        access_token: &str,
    ) -> Result<UserInfo> {
        let url = &config.userinfo_endpoint;
        debug!(url = %url, "Fetching user info");

        let request = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(access_token);
        let response = self.execute(request, url).await?;

        if !response.status.is_success() {
            return Err(FlowError::resource_access(
                response.status.as_u16(),
                response.body,
            ));
        }

        let userinfo: UserInfo = serde_json::from_str(&response.body)
            .map_err(|e| FlowError::malformed(url.as_str(), format!("invalid user info: {e}")))?;

        info!(
            sub = %userinfo.sub,
            email = %userinfo.email,
            email_verified = userinfo.email_verified,
            "User info retrieved"
        );
        Ok(userinfo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{client, config};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_userinfo_is_repeatable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer AT1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "u1",
                "name": "Test",
                "email": "t@example.com",
                "email_verified": true
            })))
            .expect(2)
            .mount(&server)
            .await;

        let config = config(&server.uri());
        let client = client();
        let first = client.fetch_userinfo(&config, "AT1").await.unwrap();
        let second = client.fetch_userinfo(&config, "AT1").await.unwrap();

        assert_eq!(first.sub, "u1");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_invalid_token_is_resource_access_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid token"))
            .mount(&server)
            .await;

        let err = client()
            .fetch_userinfo(&config(&server.uri()), "expired")
            .await
            .unwrap_err();
        assert_eq!(err, FlowError::resource_access(401, "Invalid token"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = client()
            .fetch_userinfo(&config(&server.uri()), "AT1")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::MalformedResponse { .. }));
    }
}
