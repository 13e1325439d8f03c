//! Authorization code extraction.
//!
//! The simulated authorization step returns a human-readable page instead of
//! a redirect, so the code has to be scraped out of the markup. That scraping
//! lives behind [`AuthorizationCodeExtractor`]; the rest of the flow only sees
//! an [`AuthorizationCode`]. When the server does redirect,
//! [`extract_code_from_redirect`] reads the code from the `Location` query
//! instead.

use authflow_core::{AuthorizationCode, FlowError, Result};
use tracing::debug;
use url::Url;

/// Opening marker of the code-bearing element.
pub const CODE_MARKER: &str = r#"class="code">"#;
/// Closing boundary of the code-bearing element.
pub const CODE_BOUNDARY: &str = "</div>";

/// Recovers an authorization code from an authorization response body.
pub trait AuthorizationCodeExtractor: Send + Sync {
    /// Extract the code, failing with [`FlowError::Extraction`] rather than
    /// returning an empty or corrupted value.
    fn extract_code(&self, body: &str) -> Result<AuthorizationCode>;
}

/// Extracts the text enclosed between a marker and a closing boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlCodeExtractor {
    marker: String,
    boundary: String,
}

impl Default for HtmlCodeExtractor {
    fn default() -> Self {
        Self::new(CODE_MARKER, CODE_BOUNDARY)
    }
}

impl HtmlCodeExtractor {
    /// Create an extractor for custom markup.
    pub fn new(marker: impl Into<String>, boundary: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            boundary: boundary.into(),
        }
    }
}

impl AuthorizationCodeExtractor for HtmlCodeExtractor {
    fn extract_code(&self, body: &str) -> Result<AuthorizationCode> {
        let start = body
            .find(&self.marker)
            .map(|i| i + self.marker.len())
            .ok_or_else(|| {
                FlowError::extraction(format!("code marker `{}` not found", self.marker))
            })?;

        let len = body[start..].find(&self.boundary).ok_or_else(|| {
            FlowError::extraction(format!(
                "closing boundary `{}` not found after code marker",
                self.boundary
            ))
        })?;

        let code = body[start..start + len].trim();
        if code.contains('<') {
            return Err(FlowError::extraction("code element contains nested markup"));
        }

        debug!(len = code.len(), "Extracted authorization code from page");
        AuthorizationCode::new(code)
    }
}

/// Extract a code with the default markup.
pub fn extract_code(body: &str) -> Result<AuthorizationCode> {
    HtmlCodeExtractor::default().extract_code(body)
}

/// Read the code from a redirect target and check the echoed `state`.
///
/// An `error` parameter or a missing `code` is [`FlowError::Extraction`]; a
/// missing or different `state` is [`FlowError::StateMismatch`].
pub fn extract_code_from_redirect(
    location: &Url,
    expected_state: &str,
) -> Result<AuthorizationCode> {
    let mut code = None;
    let mut state = None;
    let mut error = None;

    for (key, value) in location.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(FlowError::extraction(format!(
            "authorization server redirected with error `{error}`"
        )));
    }

    let code = code.ok_or_else(|| FlowError::extraction("redirect carries no `code` parameter"))?;

    if state.as_deref() != Some(expected_state) {
        return Err(FlowError::StateMismatch {
            expected: expected_state.to_string(),
            actual: state,
        });
    }

    AuthorizationCode::new(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Authorization Code Generated:</h1>
  <div class="code">  abc123
  </div>
</body>
</html>"#;

    #[test]
    fn test_extract_from_page() {
        let code = extract_code(PAGE).unwrap();
        assert_eq!(code.as_str(), "abc123");
    }

    #[test]
    fn test_extract_inline_fixture() {
        let code = extract_code(r#"<div class="code">abc123</div>"#).unwrap();
        assert_eq!(code.as_str(), "abc123");
    }

    #[rstest]
    #[case::empty_body("")]
    #[case::no_marker("<html><body>Login</body></html>")]
    #[case::no_boundary(r#"<div class="code">abc123"#)]
    #[case::empty_code(r#"<div class="code">   </div>"#)]
    #[case::nested_markup(r#"<div class="code"><span>abc</span></div>"#)]
    fn test_extract_failures(#[case] body: &str) {
        let err = extract_code(body).unwrap_err();
        assert!(matches!(err, FlowError::Extraction(_)), "{err:?}");
    }

    #[test]
    fn test_custom_markup() {
        let extractor = HtmlCodeExtractor::new(r#"<code id="auth">"#, "</code>");
        let code = extractor
            .extract_code(r#"<p>Your code: <code id="auth">q-42</code></p>"#)
            .unwrap();
        assert_eq!(code.as_str(), "q-42");
    }

    #[test]
    fn test_redirect_with_matching_state() {
        let url = Url::parse("http://localhost:8080/callback?code=xyz&state=s1").unwrap();
        let code = extract_code_from_redirect(&url, "s1").unwrap();
        assert_eq!(code.as_str(), "xyz");
    }

    #[test]
    fn test_redirect_with_wrong_state() {
        let url = Url::parse("http://localhost:8080/callback?code=xyz&state=forged").unwrap();
        let err = extract_code_from_redirect(&url, "s1").unwrap_err();
        assert_eq!(
            err,
            FlowError::StateMismatch {
                expected: "s1".to_string(),
                actual: Some("forged".to_string()),
            }
        );
    }

    #[test]
    fn test_redirect_without_state() {
        let url = Url::parse("http://localhost:8080/callback?code=xyz").unwrap();
        let err = extract_code_from_redirect(&url, "s1").unwrap_err();
        assert!(matches!(err, FlowError::StateMismatch { actual: None, .. }));
    }

    #[test]
    fn test_redirect_with_error() {
        let url =
            Url::parse("http://localhost:8080/callback?error=access_denied&state=s1").unwrap();
        let err = extract_code_from_redirect(&url, "s1").unwrap_err();
        assert!(matches!(err, FlowError::Extraction(_)));
    }
}
