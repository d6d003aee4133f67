//! Auth bridge: the single choke point for reading the session credential.
//!
//! Two side-effect-free reads:
//! - `check`: does a session exist (presence only, used for route guarding)
//! - `token`: hand out the raw token (used only right before a request is sent)
//!
//! Faults in the credential store never escape; they degrade to
//! "not authenticated" / "no token" with a generic message.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::credentials::CredentialStore;
use crate::envelope::NO_ACCESS_TOKEN_MESSAGE;
use crate::secrets::SessionToken;

/// Outcome class of a bridge read, mapped to 200/401/500 over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BridgeStatus {
    /// Read succeeded.
    #[default]
    Ok,
    /// No session present.
    Unauthorized,
    /// The credential store failed.
    Fault,
}

impl BridgeStatus {
    /// HTTP status code for this outcome.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Unauthorized => 401,
            Self::Fault => 500,
        }
    }
}

/// `GET /api/auth/check` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCheck {
    /// True iff a session token is present.
    pub authenticated: bool,
    /// Human-readable message.
    pub message: String,
    /// Outcome class (not serialized).
    #[serde(skip)]
    pub status: BridgeStatus,
}

/// `GET /api/auth/token` body.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenFetch {
    /// Raw token, `null` when absent.
    pub access_token: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Outcome class (not serialized).
    #[serde(skip)]
    pub status: BridgeStatus,
}

impl TokenFetch {
    /// The fetched token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SessionToken> {
        self.access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(SessionToken::new)
    }
}

impl std::fmt::Debug for TokenFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenFetch")
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("message", &self.message)
            .field("status", &self.status)
            .finish()
    }
}

/// Source of the current session token for outbound requests.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when there is no usable session.
    async fn fetch_token(&self) -> Option<SessionToken>;
}

/// In-process auth bridge over a credential store.
#[derive(Clone)]
pub struct AuthBridge {
    store: Arc<dyn CredentialStore>,
}

impl AuthBridge {
    /// Create a bridge over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Report whether a session token is present.
    ///
    /// Presence only: the token is not validated against the backend.
    #[must_use]
    pub fn check(&self) -> AuthCheck {
        match self.store.get() {
            Ok(Some(_)) => AuthCheck {
                authenticated: true,
                message: "User is authenticated".to_string(),
                status: BridgeStatus::Ok,
            },
            Ok(None) => AuthCheck {
                authenticated: false,
                message: "User is not authenticated".to_string(),
                status: BridgeStatus::Ok,
            },
            Err(e) => {
                tracing::warn!("Auth check failed: {}", e);
                AuthCheck {
                    authenticated: false,
                    message: "Failed to check authentication status".to_string(),
                    status: BridgeStatus::Fault,
                }
            }
        }
    }

    /// Hand out the raw session token.
    #[must_use]
    pub fn token(&self) -> TokenFetch {
        match self.store.get() {
            Ok(Some(token)) => TokenFetch {
                access_token: Some(token.expose().to_string()),
                message: "Access token retrieved".to_string(),
                status: BridgeStatus::Ok,
            },
            Ok(None) => TokenFetch {
                access_token: None,
                message: NO_ACCESS_TOKEN_MESSAGE.to_string(),
                status: BridgeStatus::Unauthorized,
            },
            Err(e) => {
                tracing::warn!("Token fetch failed: {}", e);
                TokenFetch {
                    access_token: None,
                    message: "Failed to retrieve access token".to_string(),
                    status: BridgeStatus::Fault,
                }
            }
        }
    }
}

impl std::fmt::Debug for AuthBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBridge").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for AuthBridge {
    async fn fetch_token(&self) -> Option<SessionToken> {
        self.token().token()
    }
}
