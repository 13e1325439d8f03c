//! Terminal results of a flow run.

use authflow_core::{
    AuthorizationCode, FlowError, FlowStage, ServerConfiguration, TokenResponse, UserInfo,
};
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Exit status when the flow completed.
pub const EXIT_COMPLETED: u8 = 0;
/// Exit status when a stage failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit status when the server could not be reached.
pub const EXIT_UNREACHABLE: u8 = 3;
/// Exit status when the settings were invalid and no flow ran.
pub const EXIT_INVALID_CONFIG: u8 = 4;

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    /// Discovered server endpoints.
    pub configuration: ServerConfiguration,
    /// URL requested in place of the browser redirect.
    pub authorization_url: Url,
    /// Code recovered from the authorization response.
    pub code: AuthorizationCode,
    /// Tokens from the code exchange.
    pub token: TokenResponse,
    /// User info fetched with the first access token.
    pub userinfo: UserInfo,
    /// Tokens from the refresh exchange, when a refresh token was issued.
    pub refreshed_token: Option<TokenResponse>,
    /// User info fetched with the refreshed access token.
    pub refreshed_userinfo: Option<UserInfo>,
    /// Stages reached, in order.
    pub reached: Vec<FlowStage>,
}

/// A run that stopped at `stage`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed: {error}")]
pub struct FlowFailure {
    /// Stage that could not be reached.
    pub stage: FlowStage,
    /// Underlying cause.
    pub error: FlowError,
    /// Stages reached before the failure, in order.
    pub reached: Vec<FlowStage>,
}

/// Terminal state of the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Every step succeeded. The refresh branch may or may not have run.
    Completed(FlowReport),
    /// A step failed and no further steps were attempted.
    Failed(FlowFailure),
}

impl FlowOutcome {
    /// Whether the run reached `Completed`.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// The report of a completed run.
    pub fn report(&self) -> Option<&FlowReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed(_) => None,
        }
    }

    /// The failure of a failed run.
    pub fn failure(&self) -> Option<&FlowFailure> {
        match self {
            Self::Completed(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    /// Stages reached, in order.
    pub fn reached(&self) -> &[FlowStage] {
        match self {
            Self::Completed(report) => &report.reached,
            Self::Failed(failure) => &failure.reached,
        }
    }

    /// Process exit status for this outcome.
    ///
    /// Distinguishes "could not reach the server" from "a stage failed".
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Completed(_) => EXIT_COMPLETED,
            Self::Failed(failure) if failure.error.is_unreachable() => EXIT_UNREACHABLE,
            Self::Failed(_) => EXIT_FAILED,
        }
    }

    /// Machine-readable summary.
    pub fn summary(&self) -> FlowSummary {
        match self {
            Self::Completed(report) => FlowSummary {
                status: FlowStatus::Completed,
                stage: None,
                reason: None,
                http_status: None,
                oauth_error: None,
                sub: Some(report.userinfo.sub.clone()),
                refreshed: report.refreshed_userinfo.is_some(),
                reached: report.reached.clone(),
            },
            Self::Failed(failure) => FlowSummary {
                status: FlowStatus::Failed,
                stage: Some(failure.stage),
                reason: Some(failure.error.to_string()),
                http_status: failure.error.status(),
                oauth_error: failure.error.oauth_error_code(),
                sub: None,
                refreshed: false,
                reached: failure.reached.clone(),
            },
        }
    }
}

/// Overall status in a [`FlowSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStatus {
    /// The run completed.
    Completed,
    /// A stage failed.
    Failed,
}

/// Serializable summary of an outcome, printed with `--json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSummary {
    /// Overall status.
    pub status: FlowStatus,
    /// Failing stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<FlowStage>,
    /// Failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// HTTP status of the failing call, when the server answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// OAuth2 `error` code from the failing response body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_error: Option<String>,
    /// Subject of the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Whether the refresh branch ran.
    pub refreshed: bool,
    /// Stages reached, in order.
    pub reached: Vec<FlowStage>,
}
