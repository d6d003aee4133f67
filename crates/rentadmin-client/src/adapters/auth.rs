//! Login and logout.

use reqwest::Method;

use rentadmin_core::envelope::AdapterResult;
use rentadmin_core::secrets::SessionToken;

use super::{AdapterContext, Endpoint};
use crate::gateway::RequestOptions;
use crate::models::{LoginData, LoginRequest};

const LOGIN_FAILED: &str = "Login failed";

/// Session lifecycle against the backend.
#[derive(Debug, Clone)]
pub struct AuthAdapter {
    ctx: AdapterContext,
}

impl AuthAdapter {
    pub(crate) fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// Sign in and store the issued token, replacing any previous one.
    ///
    /// The only operation that runs without a session.
    pub async fn login(&self, request: &LoginRequest) -> AdapterResult<LoginData> {
        let body = match serde_json::to_value(request) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to encode login request: {}", e);
                return AdapterResult::fail(LOGIN_FAILED);
            }
        };

        let endpoint = Endpoint::post("/auth/login", LOGIN_FAILED);
        let result: AdapterResult<LoginData> = self
            .ctx
            .dispatch(&endpoint, RequestOptions::new(Method::POST).body(body))
            .await;

        let (token, email) = match result.data.as_ref() {
            Some(data) if result.success => (
                SessionToken::new(data.access_token.as_str()),
                data.user.email.clone(),
            ),
            _ => return result,
        };

        if token.is_empty() {
            tracing::warn!("Login response carried an empty token");
            return AdapterResult::fail(LOGIN_FAILED);
        }
        if let Err(e) = self.ctx.credentials().set(&token) {
            tracing::warn!("Failed to store session: {}", e);
            return AdapterResult::fail("Failed to save session");
        }

        tracing::info!(email = %email, "Session stored");
        result
    }

    /// Forget the session. No network call.
    pub fn logout(&self) -> AdapterResult<()> {
        match self.ctx.credentials().clear() {
            Ok(()) => {
                tracing::info!("Session cleared");
                AdapterResult::ok((), Some("Logged out".to_string()))
            }
            Err(e) => {
                tracing::warn!("Failed to clear session: {}", e);
                AdapterResult::fail("Failed to clear session")
            }
        }
    }
}
