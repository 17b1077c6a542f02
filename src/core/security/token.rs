use serde::{Deserialize, Serialize};

/// Number of leading characters shown when a token is rendered.
const VISIBLE_PREFIX_LEN: usize = 4;

/// A Figma personal access token.
///
/// The raw value is only reachable through [`AccessToken::expose`], which the
/// upstream client calls when building the `X-Figma-Token` header. `Debug`
/// and `Display` print a redacted prefix such as `figd…`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Returns the raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short, non-reversible form for diagnostics.
    pub fn redacted(&self) -> String {
        if self.0.is_empty() {
            return "[missing]".to_string();
        }
        let prefix: String = self.0.chars().take(VISIBLE_PREFIX_LEN).collect();
        format!("{prefix}…")
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&self.redacted()).finish()
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.redacted())
    }
}
