//! Flow orchestrator.
//!
//! Runs the authorization-code grant as a strictly ordered sequence:
//!
//! ```text
//! Init -> [Reachable] -> Discovered -> AuthorizationIssued -> CodeExtracted
//!      -> TokenExchanged -> UserInfoFetched
//!      -> { RefreshedTokenExchanged -> RefreshedUserInfoFetched } -> Completed
//! ```
//!
//! Each stage consumes the previous stage's output. The first failing call
//! ends the run with [`FlowOutcome::Failed`] naming that stage; nothing is
//! retried and no later call is made. The refresh branch runs only when the
//! code exchange issued a refresh token.

use authflow_client::{
    build_authorization_url, extract_code_from_redirect, AuthorizationCodeExtractor,
    AuthorizationResponse, HtmlCodeExtractor, OAuthClient,
};
use authflow_core::{AuthorizationRequest, ClientSettings, FlowError, FlowStage, Result};
use tracing::{debug, info, warn};

use crate::outcome::{FlowFailure, FlowOutcome, FlowReport};

/// Orchestrates one client identity through the full flow.
pub struct Flow {
    settings: ClientSettings,
    request: AuthorizationRequest,
    client: OAuthClient,
    extractor: Box<dyn AuthorizationCodeExtractor>,
}

impl std::fmt::Debug for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flow")
            .field("settings", &self.settings)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

impl Flow {
    /// Create a flow with the default HTML code extractor.
    ///
    /// The authorization request is validated here, before any network call.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        Self::with_extractor(settings, HtmlCodeExtractor::default())
    }

    /// Create a flow with a custom code extractor.
    pub fn with_extractor(
        settings: ClientSettings,
        extractor: impl AuthorizationCodeExtractor + 'static,
    ) -> Result<Self> {
        let request = settings.authorization_request()?;
        let client = OAuthClient::new(&settings)?;
        Ok(Self {
            settings,
            request,
            client,
            extractor: Box::new(extractor),
        })
    }

    /// Settings this flow runs with.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Run every stage to a terminal outcome.
    pub async fn run(&self) -> FlowOutcome {
        info!(
            server = %self.settings.server_url,
            client_id = self.request.client_id(),
            timeout = ?self.client.timeout(),
            "Starting authorization code flow"
        );

        let mut progress = Progress::default();
        match self.drive(&mut progress).await {
            Ok(report) => {
                info!(
                    sub = %report.userinfo.sub,
                    refreshed = report.refreshed_userinfo.is_some(),
                    "Flow completed"
                );
                FlowOutcome::Completed(report)
            }
            Err(failure) => FlowOutcome::Failed(failure),
        }
    }

    async fn drive(
        &self,
        progress: &mut Progress,
    ) -> std::result::Result<FlowReport, FlowFailure> {
        let settings = &self.settings;
        let client = &self.client;
        let client_id = self.request.client_id();

        if settings.check_liveness {
            client
                .check_liveness(&settings.server_url)
                .await
                .map_err(|e| progress.fail(FlowStage::Reachable, e))?;
            progress.reach(FlowStage::Reachable);
        }

        let configuration = client
            .fetch_configuration(&settings.server_url)
            .await
            .map_err(|e| progress.fail(FlowStage::Discovered, e))?;
        progress.reach(FlowStage::Discovered);

        let authorization_url = build_authorization_url(&configuration, &self.request);
        debug!(url = %authorization_url, "Built authorization URL");
        let response = client
            .request_authorization(&authorization_url)
            .await
            .map_err(|e| progress.fail(FlowStage::AuthorizationIssued, e))?;
        progress.reach(FlowStage::AuthorizationIssued);

        let code = match &response {
            AuthorizationResponse::Page(body) => {
                debug!("Authorization page carries no state echo, state not verified");
                self.extractor.extract_code(body)
            }
            AuthorizationResponse::Redirect(location) => {
                extract_code_from_redirect(location, self.request.state())
            }
        }
        .map_err(|e| progress.fail(FlowStage::CodeExtracted, e))?;
        progress.reach(FlowStage::CodeExtracted);

        let token = client
            .exchange_code(
                &configuration,
                &code,
                client_id,
                self.request.redirect_uri().as_str(),
            )
            .await
            .map_err(|e| progress.fail(FlowStage::TokenExchanged, e))?;
        progress.reach(FlowStage::TokenExchanged);

        let userinfo = client
            .fetch_userinfo(&configuration, &token.access_token)
            .await
            .map_err(|e| progress.fail(FlowStage::UserInfoFetched, e))?;
        progress.reach(FlowStage::UserInfoFetched);

        let (refreshed_token, refreshed_userinfo) = match token.refresh_token() {
            Some(refresh_token) => {
                let refreshed = client
                    .refresh(&configuration, refresh_token, client_id)
                    .await
                    .map_err(|e| progress.fail(FlowStage::RefreshedTokenExchanged, e))?;
                progress.reach(FlowStage::RefreshedTokenExchanged);

                let refreshed_info = client
                    .fetch_userinfo(&configuration, &refreshed.access_token)
                    .await
                    .map_err(|e| progress.fail(FlowStage::RefreshedUserInfoFetched, e))?;
                progress.reach(FlowStage::RefreshedUserInfoFetched);

                (Some(refreshed), Some(refreshed_info))
            }
            None => {
                info!("No refresh token issued, skipping refresh");
                (None, None)
            }
        };

        Ok(FlowReport {
            configuration,
            authorization_url,
            code,
            token,
            userinfo,
            refreshed_token,
            refreshed_userinfo,
            reached: progress.reached.clone(),
        })
    }
}

/// Stages reached so far in one run.
#[derive(Debug, Default)]
struct Progress {
    reached: Vec<FlowStage>,
}

impl Progress {
    fn reach(&mut self, stage: FlowStage) {
        info!(
            stage = %stage,
            step = self.reached.len() + 1,
            refresh = stage.is_refresh(),
            "Stage reached"
        );
        self.reached.push(stage);
    }

    fn fail(&self, stage: FlowStage, error: FlowError) -> FlowFailure {
        warn!(stage = %stage, error = %error, "Stage failed, aborting flow");
        FlowFailure {
            stage,
            error,
            reached: self.reached.clone(),
        }
    }
}
