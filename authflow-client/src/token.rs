//! Token exchange client.

use authflow_core::{
    AuthorizationCode, FlowError, GrantType, Result, ServerConfiguration, TokenResponse,
};
use reqwest::header::ACCEPT;
use tracing::{debug, info, warn};

use crate::http::OAuthClient;

impl OAuthClient {
    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        config: &ServerConfiguration,
        code: &AuthorizationCode,
        client_id: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse> {
        let params = [
            ("grant_type", GrantType::AuthorizationCode.as_str()),
            ("code", code.as_str()),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
        ];
        self.token_request(config, GrantType::AuthorizationCode, &params)
            .await
    }

    /// Obtain a new access token with a refresh token.
    pub async fn refresh(
        &self,
        config: &ServerConfiguration,
        refresh_token: &str,
        client_id: &str,
    ) -> Result<TokenResponse> {
        let params = [
            ("grant_type", GrantType::RefreshToken.as_str()),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
        ];
        self.token_request(config, GrantType::RefreshToken, &params)
            .await
    }

    async fn token_request(
        &self,
        config: &ServerConfiguration,
        grant: GrantType,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse> {
        let url = &config.token_endpoint;
        debug!(url = %url, grant_type = grant.as_str(), "Requesting token");

        let request = self
            .http
            .post(url.clone())
            .header(ACCEPT, "application/json")
            .form(params);
        let response = self.execute(request, url).await?;

        if !response.status.is_success() {
            warn!(
                grant_type = grant.as_str(),
                status = response.status.as_u16(),
                "Token request rejected"
            );
            return Err(FlowError::token_exchange(
                response.status.as_u16(),
                response.body,
            ));
        }

        let token: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            FlowError::malformed(url.as_str(), format!("invalid token response: {e}"))
        })?;

        info!(
            grant_type = grant.as_str(),
            token_type = token.token_type(),
            expires_in = token.expires_in,
            has_refresh_token = token.refresh_token().is_some(),
            "Token issued"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{client, config};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc123"))
            .and(body_string_contains("client_id=test_client"))
            .and(body_string_contains(
                "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "AT1",
                "refresh_token": "RT1",
                "expires_in": 3600,
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let code = AuthorizationCode::new("abc123").unwrap();
        let token = client()
            .exchange_code(
                &config(&server.uri()),
                &code,
                "test_client",
                "http://localhost:8080/callback",
            )
            .await
            .unwrap();

        assert_eq!(token.access_token, "AT1");
        assert_eq!(token.refresh_token(), Some("RT1"));
        assert_eq!(token.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_exchange_code_rejected_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let code = AuthorizationCode::new("stale").unwrap();
        let err = client()
            .exchange_code(&config(&server.uri()), &code, "test_client", "http://localhost/cb")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.oauth_error_code().as_deref(), Some("invalid_grant"));
        assert!(matches!(err, FlowError::TokenExchange { .. }));
    }

    #[tokio::test]
    async fn test_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=RT1"))
            .and(body_string_contains("client_id=test_client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "AT2",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client()
            .refresh(&config(&server.uri()), "RT1", "test_client")
            .await
            .unwrap();

        assert_eq!(token.access_token, "AT2");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.refresh_token(), None);
    }

    #[tokio::test]
    async fn test_refresh_with_revoked_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#),
            )
            .mount(&server)
            .await;

        let err = client()
            .refresh(&config(&server.uri()), "revoked", "test_client")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::TokenExchange { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_success_without_access_token_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token_type": "bearer"
            })))
            .mount(&server)
            .await;

        let err = client()
            .refresh(&config(&server.uri()), "RT1", "test_client")
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::MalformedResponse { .. }));
    }
}
