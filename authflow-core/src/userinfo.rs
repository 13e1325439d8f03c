//! User profile returned by the userinfo endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Claims about the authenticated user.
///
/// Fetched fresh on every resource call, never cached across steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Stable subject identifier.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Whether the server has verified the email address.
    #[serde(deserialize_with = "bool_or_string")]
    pub email_verified: bool,
    /// Any other claims the server returned.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

// Some servers serialize every claim as a string.
fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid email_verified value: {other}"
            ))),
        },
    }
}
