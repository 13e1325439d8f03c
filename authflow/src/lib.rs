//! # authflow
//!
//! Drive an OAuth2 / OpenID Connect authorization server through a complete
//! authorization-code flow and report the first stage that fails.
//!
//! The flow runs entirely against the server's HTTP interface. The browser
//! redirect is replaced by a direct request to the authorization endpoint,
//! and the code is recovered from the response.
//!
//! ## Quick Start
//!
//! ```ignore
//! use authflow::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ClientSettings::from_env()?;
//!     let outcome = Flow::new(settings)?.run().await;
//!
//!     match &outcome {
//!         FlowOutcome::Completed(report) => println!("sub = {}", report.userinfo.sub),
//!         FlowOutcome::Failed(failure) => eprintln!("{failure}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`authflow_core`] - Records, settings, stages and errors (no I/O)
//! - [`authflow_client`] - One HTTP component per flow step
//! - this crate - The [`Flow`] orchestrator and the `authflow` binary

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod flow;
pub mod outcome;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Core types (re-exported from `authflow-core`).
pub use authflow_core as core;

/// Flow components (re-exported from `authflow-client`).
pub use authflow_client as client;

// ============================================================================
// Type Re-exports
// ============================================================================

pub use flow::Flow;
pub use outcome::{
    FlowFailure, FlowOutcome, FlowReport, FlowStatus, FlowSummary, EXIT_COMPLETED, EXIT_FAILED,
    EXIT_INVALID_CONFIG, EXIT_UNREACHABLE,
};

pub use authflow_core::{
    AuthorizationCode, AuthorizationRequest, ClientSettings, FlowError, FlowStage, Result,
    ServerConfiguration, TokenResponse, UserInfo,
};

pub use authflow_client::{AuthorizationCodeExtractor, HtmlCodeExtractor, OAuthClient};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```ignore
/// use authflow::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{ClientSettings, FlowError, FlowStage, Result};
    pub use crate::core::{AuthorizationCode, ServerConfiguration, TokenResponse, UserInfo};
    pub use crate::client::{AuthorizationCodeExtractor, HtmlCodeExtractor};
    pub use crate::{Flow, FlowFailure, FlowOutcome, FlowReport};
}
