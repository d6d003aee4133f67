//! File-backed credential store.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};

use super::{CookieSettings, CredentialError, CredentialStore, SessionCookie};
use crate::secrets::SessionToken;

const SESSION_FILE: &str = "session.json";

/// Credential store that persists the session cookie to disk.
///
/// The record is written with restrictive permissions (0600 on Unix) and is
/// removed on read once it has expired.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    settings: CookieSettings,
}

impl FileCredentialStore {
    /// Create a store keeping its record in `dir`.
    #[must_use]
    pub fn new(dir: &Path, settings: CookieSettings) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
            settings,
        }
    }

    /// Location of the session record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_cookie(&self) -> Result<Option<SessionCookie>, CredentialError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let cookie: SessionCookie = serde_json::from_str(&content)?;
        Ok(Some(cookie))
    }

    fn write_cookie(&self, cookie: &SessionCookie) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_vec(cookie)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        // `mode` only applies on creation; tighten a record left by an older write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(&content)?;

        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<SessionToken>, CredentialError> {
        let Some(cookie) = self.read_cookie()? else {
            return Ok(None);
        };

        if cookie.is_expired(Utc::now()) {
            tracing::debug!(path = %self.path.display(), "Session record expired, removing it");
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(cookie.token()))
    }

    fn set_with_ttl(&self, token: &SessionToken, ttl: Duration) -> Result<(), CredentialError> {
        let cookie = self.settings.issue_with_ttl(token, Utc::now(), ttl);
        self.write_cookie(&cookie)
    }

    fn set(&self, token: &SessionToken) -> Result<(), CredentialError> {
        self.set_with_ttl(token, self.settings.ttl())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
