//! Flow stages, the unit of failure attribution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A state reached by the orchestrator.
///
/// A failure is attributed to the stage that could not be reached, so a
/// rejected token exchange reports [`FlowStage::TokenExchanged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowStage {
    /// The server root answered the liveness probe.
    Reachable,
    /// The discovery document was fetched and validated.
    Discovered,
    /// The authorization endpoint answered.
    AuthorizationIssued,
    /// An authorization code was recovered.
    CodeExtracted,
    /// The code was exchanged for tokens.
    TokenExchanged,
    /// User info was fetched with the access token.
    UserInfoFetched,
    /// The refresh token was exchanged for a new access token.
    RefreshedTokenExchanged,
    /// User info was fetched with the refreshed access token.
    RefreshedUserInfoFetched,
}

impl FlowStage {
    /// Every stage, in execution order.
    pub const ALL: [FlowStage; 8] = [
        FlowStage::Reachable,
        FlowStage::Discovered,
        FlowStage::AuthorizationIssued,
        FlowStage::CodeExtracted,
        FlowStage::TokenExchanged,
        FlowStage::UserInfoFetched,
        FlowStage::RefreshedTokenExchanged,
        FlowStage::RefreshedUserInfoFetched,
    ];

    /// Stage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reachable => "Reachable",
            Self::Discovered => "Discovered",
            Self::AuthorizationIssued => "AuthorizationIssued",
            Self::CodeExtracted => "CodeExtracted",
            Self::TokenExchanged => "TokenExchanged",
            Self::UserInfoFetched => "UserInfoFetched",
            Self::RefreshedTokenExchanged => "RefreshedTokenExchanged",
            Self::RefreshedUserInfoFetched => "RefreshedUserInfoFetched",
        }
    }

    /// Whether the stage belongs to the optional refresh branch.
    pub fn is_refresh(&self) -> bool {
        matches!(
            self,
            Self::RefreshedTokenExchanged | Self::RefreshedUserInfoFetched
        )
    }
}

impl fmt::Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
