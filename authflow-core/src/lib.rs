//! # authflow-core
//!
//! Core types, settings, and error handling for authflow.
//!
//! This crate holds everything the flow components exchange, with no I/O:
//!
//! - **Discovery**: [`ServerConfiguration`] parsed from the discovery document
//! - **Authorization**: [`AuthorizationRequest`] and [`AuthorizationCode`]
//! - **Tokens**: [`TokenResponse`] and [`GrantType`]
//! - **User info**: [`UserInfo`] claims
//! - **Stages**: [`FlowStage`], the unit of failure attribution
//! - **Settings**: [`ClientSettings`], the explicit client identity for a run
//! - **Errors**: [`FlowError`]
//!
//! ## Example
//!
//! ```rust
//! use authflow_core::{ClientSettings, ServerConfiguration};
//!
//! let settings = ClientSettings::new()
//!     .with_client_id("test_client")
//!     .with_state("test_state_123");
//! let request = settings.authorization_request().expect("valid request");
//! assert_eq!(request.scope(), "read write");
//!
//! let config = ServerConfiguration::from_json(r#"{
//!     "issuer": "http://127.0.0.1:3000",
//!     "authorization_endpoint": "http://127.0.0.1:3000/authorize",
//!     "token_endpoint": "http://127.0.0.1:3000/token",
//!     "userinfo_endpoint": "http://127.0.0.1:3000/userinfo"
//! }"#).expect("valid document");
//! assert_eq!(config.token_endpoint.path(), "/token");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod authorization;
pub mod discovery;
pub mod errors;
pub mod settings;
pub mod stage;
pub mod token;
pub mod userinfo;

// Re-exports for convenience
pub use authorization::{AuthorizationCode, AuthorizationRequest, RESPONSE_TYPE_CODE};
pub use discovery::{discovery_url, ServerConfiguration, DISCOVERY_PATH};
pub use errors::{FlowError, Result};
pub use settings::ClientSettings;
pub use stage::FlowStage;
pub use token::{GrantType, TokenResponse};
pub use userinfo::UserInfo;
