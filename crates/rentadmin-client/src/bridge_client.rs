//! Client for a remote auth bridge.
//!
//! Keeps the session cookie in a [`Jar`] and asks the bridge for presence or
//! the raw token, the way browser-side code does.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::{Client, StatusCode};
use serde_json::json;

use rentadmin_core::auth::{AuthCheck, BridgeStatus, TokenFetch, TokenSource};
use rentadmin_core::secrets::SessionToken;

use crate::error::GatewayError;

const CHECK_FAILED: &str = "Failed to check authentication status";
const TOKEN_FAILED: &str = "Failed to retrieve access token";

fn bridge_status(status: StatusCode) -> BridgeStatus {
    if status.is_success() {
        BridgeStatus::Ok
    } else if status == StatusCode::UNAUTHORIZED {
        BridgeStatus::Unauthorized
    } else {
        BridgeStatus::Fault
    }
}

/// HTTP client for the auth bridge endpoints.
#[derive(Clone)]
pub struct BridgeClient {
    client: Client,
    base_url: String,
    jar: Arc<Jar>,
}

impl BridgeClient {
    /// Create a client with an empty cookie jar.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_jar(base_url, Arc::new(Jar::default()))
    }

    /// Create a client sharing `jar`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_jar(base_url: impl Into<String>, jar: Arc<Jar>) -> Result<Self, GatewayError> {
        let client = Client::builder().cookie_provider(jar.clone()).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            jar,
        })
    }

    /// The cookie jar.
    #[must_use]
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Put an existing session cookie into the jar, as a browser that already
    /// holds it would send.
    ///
    /// # Errors
    ///
    /// Returns error if the bridge URL is not a valid URL.
    pub fn seed_session(&self, cookie_name: &str, token: &SessionToken) -> Result<(), GatewayError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| GatewayError::InvalidRequest(format!("Invalid bridge URL: {e}")))?;
        self.jar
            .add_cookie_str(&format!("{cookie_name}={}", token.expose()), &url);
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `GET /api/auth/check`. Never fails; faults read as unauthenticated.
    pub async fn check(&self) -> AuthCheck {
        let fault = || AuthCheck {
            authenticated: false,
            message: CHECK_FAILED.to_string(),
            status: BridgeStatus::Fault,
        };

        let response = match self.client.get(self.url("/api/auth/check")).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Auth bridge unreachable: {}", e);
                return fault();
            }
        };

        let status = bridge_status(response.status());
        match response.json::<AuthCheck>().await {
            Ok(mut check) => {
                check.status = status;
                check.authenticated &= status == BridgeStatus::Ok;
                check
            }
            Err(e) => {
                tracing::warn!("Unexpected auth check response: {}", e);
                fault()
            }
        }
    }

    /// `GET /api/auth/token`. Never fails; faults read as "no token".
    pub async fn token(&self) -> TokenFetch {
        let fault = || TokenFetch {
            access_token: None,
            message: TOKEN_FAILED.to_string(),
            status: BridgeStatus::Fault,
        };

        let response = match self.client.get(self.url("/api/auth/token")).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Auth bridge unreachable: {}", e);
                return fault();
            }
        };

        let status = bridge_status(response.status());
        match response.json::<TokenFetch>().await {
            Ok(mut fetch) => {
                fetch.status = status;
                if status != BridgeStatus::Ok {
                    fetch.access_token = None;
                }
                fetch
            }
            Err(e) => {
                tracing::warn!("Unexpected token response: {}", e);
                fault()
            }
        }
    }

    /// Ask the bridge to issue the session cookie for `token`.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-2xx response.
    pub async fn create_session(&self, token: &SessionToken) -> Result<(), GatewayError> {
        let response = self
            .client
            .post(self.url("/api/auth/session"))
            .json(&json!({ "accessToken": token.expose() }))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    /// Ask the bridge to expire the session cookie.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-2xx response.
    pub async fn clear_session(&self) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url("/api/auth/session"))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn expect_success(response: reqwest::Response) -> Result<(), GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(GatewayError::Api {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenSource for BridgeClient {
    async fn fetch_token(&self) -> Option<SessionToken> {
        self.token().await.token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayClient, RequestOptions};
    use crate::testing::MockBackend;
    use pretty_assertions::assert_eq;
    use rentadmin_bridge::{Bridge, BridgeServerConfig};
    use reqwest::Url;

    async fn start_bridge() -> String {
        let router = Bridge::new(BridgeServerConfig::default()).router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_without_cookie() {
        let bridge = BridgeClient::new(start_bridge().await).unwrap();

        let check = bridge.check().await;
        assert!(!check.authenticated);
        assert_eq!(check.status, BridgeStatus::Ok);

        let fetch = bridge.token().await;
        assert_eq!(fetch.status, BridgeStatus::Unauthorized);
        assert!(fetch.access_token.is_none());
        assert_eq!(fetch.message, "No access token found");
    }

    #[tokio::test]
    async fn test_with_cookie_in_jar() {
        let base = start_bridge().await;
        let bridge = BridgeClient::new(base.clone()).unwrap();
        bridge
            .jar()
            .add_cookie_str("accessToken=tok123", &Url::parse(&base).unwrap());

        assert!(bridge.check().await.authenticated);
        assert_eq!(bridge.fetch_token().await.unwrap().expose(), "tok123");
    }

    #[tokio::test]
    async fn test_seeded_session_is_authenticated() {
        let bridge = BridgeClient::new(start_bridge().await).unwrap();
        bridge
            .seed_session("accessToken", &SessionToken::new("tok123"))
            .unwrap();

        assert!(bridge.check().await.authenticated);
        assert_eq!(bridge.fetch_token().await.unwrap().expose(), "tok123");
    }

    #[test]
    fn test_seed_session_rejects_bad_url() {
        let bridge = BridgeClient::new("not a url").unwrap();
        let err = bridge
            .seed_session("accessToken", &SessionToken::new("tok123"))
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let bridge = BridgeClient::new(start_bridge().await).unwrap();

        bridge.create_session(&SessionToken::new("tok123")).await.unwrap();
        assert!(bridge.check().await.authenticated);
        assert_eq!(bridge.fetch_token().await.unwrap().expose(), "tok123");

        bridge.clear_session().await.unwrap();
        assert!(!bridge.check().await.authenticated);
        assert!(bridge.fetch_token().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_session_rejected() {
        let bridge = BridgeClient::new(start_bridge().await).unwrap();
        let err = bridge
            .create_session(&SessionToken::new(""))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }

    #[tokio::test]
    async fn test_unreachable_bridge_degrades() {
        let bridge = BridgeClient::new("http://127.0.0.1:1").unwrap();

        let check = bridge.check().await;
        assert!(!check.authenticated);
        assert_eq!(check.status, BridgeStatus::Fault);
        assert_eq!(check.message, CHECK_FAILED);

        assert!(bridge.fetch_token().await.is_none());
    }

    #[tokio::test]
    async fn test_gateway_reads_token_through_bridge() {
        let base = start_bridge().await;
        let bridge = BridgeClient::new(base.clone()).unwrap();
        bridge
            .jar()
            .add_cookie_str("accessToken=tok123", &Url::parse(&base).unwrap());

        let backend = MockBackend::start().await;
        backend.respond("GET", "/cars", 200, serde_json::json!({"success": true, "data": []}));

        let gateway = GatewayClient::new(backend.base_url.clone(), Arc::new(bridge)).unwrap();
        gateway.request("/cars", RequestOptions::default()).await.unwrap();

        assert_eq!(
            backend.requests()[0].authorization.as_deref(),
            Some("Bearer tok123")
        );
    }
}
