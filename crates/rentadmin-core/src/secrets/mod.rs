//! Secret handling for session tokens.
//!
//! - `SessionToken`: bearer credential wrapper that prevents accidental logging
//! - `scrub_secrets`: redact token values from bodies and error messages

use secrecy::{ExposeSecret, SecretBox};

/// Opaque bearer credential proving an authenticated admin identity.
///
/// The inner value is wrapped with `secrecy::SecretBox` so it never shows up
/// in `Debug` or `Display` output. The format is not validated.
#[derive(Clone)]
pub struct SessionToken(SecretBox<str>);

impl SessionToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretBox::new(token.into().into_boxed_str()))
    }

    /// Expose the raw value.
    ///
    /// Only for building an `Authorization` header or a cookie.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the token is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }

    /// `Bearer <token>` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken([REDACTED])")
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<String> for SessionToken {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Scrub secrets from response bodies and logs.
///
/// Replaces values after known secret patterns with `[REDACTED]`.
///
/// # Arguments
///
/// * `text` - Text to scrub
/// * `patterns` - Patterns to look for (e.g., `["accessToken\":\"", "token="]`)
#[must_use]
pub fn scrub_secrets(text: &str, patterns: &[&str]) -> String {
    let mut result = text.to_string();

    for pattern in patterns {
        let mut search_start = 0;
        while let Some(start) = result[search_start..].find(pattern) {
            let abs_start = search_start + start + pattern.len();

            let end = result[abs_start..]
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == '&' || c == ',' || c == ';')
                .map_or(result.len(), |e| abs_start + e);

            result.replace_range(abs_start..end, "[REDACTED]");

            search_start = abs_start + "[REDACTED]".len();
        }
    }

    result
}

/// Secret patterns that appear in backend bodies, cookies and headers.
pub const COMMON_SECRET_PATTERNS: &[&str] = &[
    "\"accessToken\":\"",
    "\"token\":\"",
    "\"password\":\"",
    "accessToken=",
    "token=",
    "Bearer ",
    "upload_preset=",
];
