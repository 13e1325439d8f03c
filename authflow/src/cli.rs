//! Command-line arguments.

use std::time::Duration;

use authflow::core::settings::split_scope;
use authflow::{ClientSettings, Result};
use clap::Parser;

/// Run an OAuth2 authorization-code flow against a server and report the
/// first stage that fails.
///
/// Every option overrides the matching `AUTHFLOW_*` environment variable.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root URL of the authorization server
    #[arg(long, value_name = "URL")]
    pub server_url: Option<String>,

    /// OAuth client identifier
    #[arg(long)]
    pub client_id: Option<String>,

    /// Redirect URI registered for the client
    #[arg(long, value_name = "URI")]
    pub redirect_uri: Option<String>,

    /// Requested scope; repeat or space-delimit for several
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<String>,

    /// Fixed `state` value instead of a random one
    #[arg(long)]
    pub state: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Skip the liveness probe of the server root
    #[arg(long)]
    pub skip_liveness: bool,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Write logs to stderr as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay the arguments onto `settings`.
    pub fn apply(&self, mut settings: ClientSettings) -> Result<ClientSettings> {
        if let Some(url) = &self.server_url {
            settings = settings.with_server_url(url)?;
        }
        if let Some(client_id) = &self.client_id {
            settings = settings.with_client_id(client_id.as_str());
        }
        if let Some(redirect_uri) = &self.redirect_uri {
            settings = settings.with_redirect_uri(redirect_uri.as_str());
        }
        if !self.scopes.is_empty() {
            settings = settings.with_scopes(self.scopes.iter().flat_map(|s| split_scope(s)));
        }
        if let Some(state) = &self.state {
            settings = settings.with_state(state.as_str());
        }
        if let Some(secs) = self.timeout_secs {
            settings = settings.with_timeout(Duration::from_secs(secs));
        }
        if self.skip_liveness {
            settings = settings.with_liveness_check(false);
        }
        Ok(settings)
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "authflow=debug,authflow_client=debug,authflow_core=debug"
        } else {
            "authflow=info,authflow_client=info"
        }
    }
}
