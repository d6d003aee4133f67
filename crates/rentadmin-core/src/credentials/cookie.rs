//! Session cookie record and header encoding.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{DEFAULT_COOKIE_NAME, DEFAULT_TTL_DAYS};
use crate::secrets::SessionToken;

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// Sent only on same-site requests.
    #[default]
    Strict,
    /// Sent on top-level navigations too.
    Lax,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
        }
    }
}

/// How session cookies are issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSettings {
    /// Cookie name.
    pub name: String,
    /// Lifetime in days.
    pub ttl_days: u32,
    /// Emit the `Secure` attribute (production only).
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            ttl_days: DEFAULT_TTL_DAYS,
            secure: false,
        }
    }
}

impl CookieSettings {
    /// Settings for production deployments (`Secure` cookie).
    #[must_use]
    pub fn production() -> Self {
        Self {
            secure: true,
            ..Self::default()
        }
    }

    /// Configured lifetime.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::days(i64::from(self.ttl_days))
    }

    /// Issue a cookie for `token` with the configured lifetime.
    #[must_use]
    pub fn issue(&self, token: &SessionToken, now: DateTime<Utc>) -> SessionCookie {
        self.issue_with_ttl(token, now, self.ttl())
    }

    /// Issue a cookie for `token` expiring `ttl` after `now`.
    ///
    /// An expiry past the representable range saturates to the latest
    /// representable instant.
    #[must_use]
    pub fn issue_with_ttl(
        &self,
        token: &SessionToken,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> SessionCookie {
        SessionCookie {
            name: self.name.clone(),
            value: token.expose().to_string(),
            expires: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            secure: self.secure,
            same_site: SameSite::Strict,
            path: "/".to_string(),
        }
    }

    /// `Set-Cookie` value that deletes the session cookie.
    #[must_use]
    pub fn removal_header(&self) -> String {
        let mut header = format!(
            "{}=; Path=/; Max-Age=0; SameSite={}",
            self.name,
            SameSite::Strict.as_str()
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// A stored session cookie.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    /// Cookie name.
    pub name: String,
    value: String,
    /// Absolute expiry.
    #[zeroize(skip)]
    pub expires: DateTime<Utc>,
    /// `Secure` attribute.
    pub secure: bool,
    /// `SameSite` attribute.
    #[zeroize(skip)]
    pub same_site: SameSite,
    /// `Path` attribute.
    pub path: String,
}

impl SessionCookie {
    /// The token carried by this cookie.
    #[must_use]
    pub fn token(&self) -> SessionToken {
        SessionToken::new(self.value.clone())
    }

    /// Whether the cookie has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }

    /// `Set-Cookie` header value for this cookie.
    #[must_use]
    pub fn set_cookie_header(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; Expires={}; SameSite={}",
            self.name,
            self.value,
            self.path,
            self.expires.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.same_site.as_str()
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("expires", &self.expires)
            .field("secure", &self.secure)
            .field("same_site", &self.same_site)
            .finish_non_exhaustive()
    }
}

/// Extract the value of cookie `name` from a `Cookie:` request header.
#[must_use]
pub fn parse_cookie_header(header: &str, name: &str) -> Option<String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}
