//! Session credential storage.
//!
//! The session token lives in a cookie-shaped record: name `accessToken`,
//! expiry seven days after issuance, `SameSite=Strict`, `Secure` in
//! production. Stores enforce expiry themselves, the way a cookie jar does,
//! so callers only ever see a live token or nothing.

mod cookie;
mod file;

pub use cookie::{CookieSettings, SameSite, SessionCookie, parse_cookie_header};
pub use file::FileCredentialStore;

use std::sync::{Mutex, PoisonError};

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::secrets::SessionToken;

/// Name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "accessToken";

/// Days until a freshly issued session cookie expires.
pub const DEFAULT_TTL_DAYS: u32 = 7;

/// Errors from credential operations.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// IO error reading/writing the session record.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session record could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cookie data could not be read.
    #[error("Malformed cookie: {0}")]
    Malformed(String),

    /// The store only exposes what the client sent.
    #[error("Credential store is read-only")]
    ReadOnly,
}

/// Durable storage for the session token.
///
/// Single source of truth for "is the user logged in". Writes overwrite any
/// previous token; reads never return an expired one.
pub trait CredentialStore: Send + Sync {
    /// Current token, or `None` when absent or expired.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be read.
    fn get(&self) -> Result<Option<SessionToken>, CredentialError>;

    /// Store a token that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be written.
    fn set_with_ttl(&self, token: &SessionToken, ttl: Duration) -> Result<(), CredentialError>;

    /// Store a token with the default seven day lifetime.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be written.
    fn set(&self, token: &SessionToken) -> Result<(), CredentialError> {
        self.set_with_ttl(token, Duration::days(i64::from(DEFAULT_TTL_DAYS)))
    }

    /// Remove the token immediately.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying storage cannot be written.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Process-local credential store.
///
/// Used as the substitute store in tests and by short-lived tools that do not
/// need the session to survive a restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    settings: CookieSettings,
    cookie: Mutex<Option<SessionCookie>>,
}

impl MemoryCredentialStore {
    /// Create an empty store with default cookie settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with explicit cookie settings.
    #[must_use]
    pub fn with_settings(settings: CookieSettings) -> Self {
        Self {
            settings,
            cookie: Mutex::new(None),
        }
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<SessionToken>) -> Self {
        let store = Self::new();
        let cookie = store.settings.issue(&token.into(), Utc::now());
        *store.cookie.lock().unwrap_or_else(PoisonError::into_inner) = Some(cookie);
        store
    }

    /// The cookie currently held, including its attributes.
    #[must_use]
    pub fn cookie(&self) -> Option<SessionCookie> {
        self.cookie
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<SessionToken>, CredentialError> {
        let mut slot = self.cookie.lock().unwrap_or_else(PoisonError::into_inner);

        if slot.as_ref().is_some_and(|c| c.is_expired(Utc::now())) {
            tracing::debug!("Session cookie expired, dropping it");
            *slot = None;
        }

        Ok(slot.as_ref().map(SessionCookie::token))
    }

    fn set_with_ttl(&self, token: &SessionToken, ttl: Duration) -> Result<(), CredentialError> {
        let cookie = self.settings.issue_with_ttl(token, Utc::now(), ttl);
        *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = Some(cookie);
        Ok(())
    }

    fn set(&self, token: &SessionToken) -> Result<(), CredentialError> {
        self.set_with_ttl(token, self.settings.ttl())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.cookie.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_roundtrip() {
        let store = MemoryCredentialStore::new();
        store.set(&SessionToken::new("tok123")).unwrap();

        let token = store.get().unwrap().unwrap();
        assert_eq!(token.expose(), "tok123");
    }

    #[test]
    fn test_clear_then_get_is_none() {
        let store = MemoryCredentialStore::with_token("tok123");
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_set_overwrites_previous_token() {
        let store = MemoryCredentialStore::with_token("old");
        store.set(&SessionToken::new("new")).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose(), "new");
    }

    #[test]
    fn test_expired_token_is_dropped() {
        let store = MemoryCredentialStore::new();
        store
            .set_with_ttl(&SessionToken::new("tok123"), Duration::seconds(-1))
            .unwrap();

        assert!(store.get().unwrap().is_none());
        assert!(store.cookie().is_none());
    }

    #[test]
    fn test_default_cookie_attributes() {
        let store = MemoryCredentialStore::new();
        store.set(&SessionToken::new("tok123")).unwrap();

        let cookie = store.cookie().unwrap();
        assert_eq!(cookie.name, DEFAULT_COOKIE_NAME);
        assert_eq!(cookie.same_site, SameSite::Strict);
        assert!(!cookie.secure);

        let lifetime = cookie.expires - Utc::now();
        assert!(lifetime > Duration::days(6) && lifetime <= Duration::days(7));
    }

    #[test]
    fn test_production_settings_mark_cookie_secure() {
        let store = MemoryCredentialStore::with_settings(CookieSettings::production());
        store.set(&SessionToken::new("tok123")).unwrap();
        assert!(store.cookie().unwrap().secure);
    }

    #[test]
    fn test_set_with_huge_ttl_does_not_fail() {
        let store = MemoryCredentialStore::with_settings(CookieSettings {
            ttl_days: 200_000_000,
            ..CookieSettings::default()
        });
        store.set(&SessionToken::new("tok123")).unwrap();
        assert_eq!(store.get().unwrap().unwrap().expose(), "tok123");
    }
}
