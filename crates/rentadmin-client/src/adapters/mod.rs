//! Domain adapters.
//!
//! Every resource operation follows the same contract:
//! 1. No session token: return `No access token found` without touching the network.
//! 2. Send through the gateway.
//! 3. Read the backend envelope; `success: false` (or a bad `statusCode` where
//!    the endpoint checks it) is a rejection carrying the backend message.
//! 4. Take the payload at the endpoint's unwrap path and decode it.
//!
//! Resource modules only declare endpoints and payload types; the contract
//! lives in [`AdapterContext::call`].

mod advertisements;
mod auth;
mod cars;
mod coupons;
mod dashboard;
mod parking;
mod payments;
mod users;

pub use advertisements::AdvertisementsAdapter;
pub use auth::AuthAdapter;
pub use cars::CarsAdapter;
pub use coupons::CouponsAdapter;
pub use dashboard::DashboardAdapter;
pub use parking::ParkingAdapter;
pub use payments::PaymentsAdapter;
pub use users::UsersAdapter;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use rentadmin_core::credentials::CredentialStore;
use rentadmin_core::envelope::{AdapterResult, Envelope, UnwrapPath};
use rentadmin_core::secrets::{COMMON_SECRET_PATTERNS, scrub_secrets};

use crate::error::{AdapterFault, GatewayError};
use crate::gateway::{GatewayClient, RequestOptions};
use crate::models::ListQuery;

/// One backend endpoint as an adapter sees it.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    path: String,
    unwrap: UnwrapPath,
    fallback: &'static str,
    require_status_code: bool,
}

impl Endpoint {
    /// Endpoint at `path`; `fallback` is shown when the backend gives no message.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, fallback: &'static str) -> Self {
        Self {
            method,
            path: path.into(),
            unwrap: UnwrapPath::ROOT,
            fallback,
            require_status_code: false,
        }
    }

    /// `GET` endpoint.
    #[must_use]
    pub fn get(path: impl Into<String>, fallback: &'static str) -> Self {
        Self::new(Method::GET, path, fallback)
    }

    /// `POST` endpoint.
    #[must_use]
    pub fn post(path: impl Into<String>, fallback: &'static str) -> Self {
        Self::new(Method::POST, path, fallback)
    }

    /// `PUT` endpoint.
    #[must_use]
    pub fn put(path: impl Into<String>, fallback: &'static str) -> Self {
        Self::new(Method::PUT, path, fallback)
    }

    /// `PATCH` endpoint.
    #[must_use]
    pub fn patch(path: impl Into<String>, fallback: &'static str) -> Self {
        Self::new(Method::PATCH, path, fallback)
    }

    /// `DELETE` endpoint.
    #[must_use]
    pub fn delete(path: impl Into<String>, fallback: &'static str) -> Self {
        Self::new(Method::DELETE, path, fallback)
    }

    /// Payload sits at `path` below `data`.
    #[must_use]
    pub fn unwrapping(mut self, path: UnwrapPath) -> Self {
        self.unwrap = path;
        self
    }

    /// Also require a 2xx `statusCode` in the body.
    #[must_use]
    pub fn checking_status_code(mut self) -> Self {
        self.require_status_code = true;
        self
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fallback failure message.
    #[must_use]
    pub const fn fallback(&self) -> &'static str {
        self.fallback
    }
}

/// `{prefix}/{id}{suffix}` with the id percent-encoded.
pub(crate) fn resource_path(prefix: &str, id: &str, suffix: &str) -> String {
    format!("{prefix}/{}{suffix}", urlencoding::encode(id))
}

/// Shared dependencies of every adapter.
#[derive(Clone)]
pub struct AdapterContext {
    gateway: Arc<GatewayClient>,
    credentials: Arc<dyn CredentialStore>,
}

impl AdapterContext {
    /// Create a context.
    #[must_use]
    pub fn new(gateway: Arc<GatewayClient>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            gateway,
            credentials,
        }
    }

    /// The gateway client.
    #[must_use]
    pub fn gateway(&self) -> &GatewayClient {
        &self.gateway
    }

    /// The credential store.
    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Auth operations.
    #[must_use]
    pub fn auth(&self) -> AuthAdapter {
        AuthAdapter::new(self.clone())
    }

    /// Car operations.
    #[must_use]
    pub fn cars(&self) -> CarsAdapter {
        CarsAdapter::new(self.clone())
    }

    /// User and vendor operations.
    #[must_use]
    pub fn users(&self) -> UsersAdapter {
        UsersAdapter::new(self.clone())
    }

    /// Coupon operations.
    #[must_use]
    pub fn coupons(&self) -> CouponsAdapter {
        CouponsAdapter::new(self.clone())
    }

    /// Advertisement operations.
    #[must_use]
    pub fn advertisements(&self) -> AdvertisementsAdapter {
        AdvertisementsAdapter::new(self.clone())
    }

    /// Payment operations.
    #[must_use]
    pub fn payments(&self) -> PaymentsAdapter {
        PaymentsAdapter::new(self.clone())
    }

    /// Parking approval operations.
    #[must_use]
    pub fn parking(&self) -> ParkingAdapter {
        ParkingAdapter::new(self.clone())
    }

    /// Dashboard operations.
    #[must_use]
    pub fn dashboard(&self) -> DashboardAdapter {
        DashboardAdapter::new(self.clone())
    }

    /// Whether a session token is present. Store faults count as absent.
    #[must_use]
    pub fn has_session(&self) -> bool {
        match self.credentials.get() {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Credential store unavailable: {}", e);
                false
            }
        }
    }

    /// Run an authenticated operation.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        options: RequestOptions,
    ) -> AdapterResult<T> {
        if !self.has_session() {
            tracing::debug!(path = endpoint.path(), "No session, request not sent");
            return AdapterFault::NoCredential.into_result();
        }
        self.dispatch(endpoint, options).await
    }

    /// Run an authenticated operation with a JSON body.
    pub async fn send<B, T>(&self, endpoint: &Endpoint, body: &B) -> AdapterResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match serde_json::to_value(body) {
            Ok(body) => self.call(endpoint, RequestOptions::default().body(body)).await,
            Err(e) => {
                tracing::warn!(path = endpoint.path(), "Failed to encode request body: {}", e);
                AdapterResult::fail(endpoint.fallback)
            }
        }
    }

    /// Run an authenticated list operation.
    pub async fn list<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        query: &ListQuery,
    ) -> AdapterResult<T> {
        self.call(endpoint, RequestOptions::default().query(query.pairs()))
            .await
    }

    /// Run an operation without the session precondition.
    pub(crate) async fn dispatch<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        options: RequestOptions,
    ) -> AdapterResult<T> {
        match self.execute(endpoint, options).await {
            Ok((data, message)) => AdapterResult::ok(data, message),
            Err(fault) => {
                tracing::warn!(path = endpoint.path(), "Request failed: {}", fault);
                fault.into_result()
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        options: RequestOptions,
    ) -> Result<(T, Option<String>), AdapterFault> {
        let options = RequestOptions {
            method: endpoint.method.clone(),
            ..options
        };
        let transport = || AdapterFault::Transport {
            message: endpoint.fallback.to_string(),
        };

        let envelope = match self.gateway.request(&endpoint.path, options).await {
            Ok(response) => {
                let bytes = response.bytes().await.map_err(|e| {
                    tracing::debug!("Failed to read response body: {}", e);
                    transport()
                })?;
                serde_json::from_slice::<Envelope>(&bytes).map_err(|e| {
                    tracing::debug!("Response is not an envelope: {}", e);
                    transport()
                })?
            }
            Err(GatewayError::Api { status, body }) => {
                tracing::debug!(status, body = %scrub_secrets(&body, COMMON_SECRET_PATTERNS), "Backend error response");
                return Err(serde_json::from_str::<Envelope>(&body)
                    .ok()
                    .and_then(|envelope| envelope.message().map(str::to_string))
                    .map_or_else(transport, |message| AdapterFault::BackendRejection {
                        status: Some(status),
                        message,
                    }));
            }
            Err(e) => {
                tracing::debug!("Transport failure: {}", e);
                return Err(transport());
            }
        };

        if !envelope.success || (endpoint.require_status_code && !envelope.status_ok()) {
            return Err(AdapterFault::BackendRejection {
                status: envelope.status_code,
                message: envelope.message().unwrap_or(endpoint.fallback).to_string(),
            });
        }

        let message = envelope.message().map(str::to_string);
        let unexpected = || AdapterFault::UnexpectedShape {
            message: endpoint.fallback.to_string(),
        };

        let payload = endpoint.unwrap.take(envelope.data).ok_or_else(|| {
            tracing::debug!(path = %endpoint.unwrap, "Payload missing at unwrap path");
            unexpected()
        })?;
        let data = serde_json::from_value(payload).map_err(|e| {
            tracing::debug!(path = %endpoint.unwrap, "Payload has unexpected shape: {}", e);
            unexpected()
        })?;

        Ok((data, message))
    }
}

impl std::fmt::Debug for AdapterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterContext")
            .field("gateway", &self.gateway)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use pretty_assertions::assert_eq;
    use rentadmin_core::credentials::MemoryCredentialStore;
    use serde_json::json;

    const NESTED: UnwrapPath = UnwrapPath::new(&["data"]);

    async fn backend_with_session() -> (MockBackend, AdapterContext) {
        let backend = MockBackend::start().await;
        let ctx = backend.context(Arc::new(MemoryCredentialStore::with_token("tok123")));
        (backend, ctx)
    }

    #[test]
    fn test_resource_path_encodes_id() {
        assert_eq!(resource_path("/cars", "c1", ""), "/cars/c1");
        assert_eq!(
            resource_path("/admin/users", "a/b c", "/status"),
            "/admin/users/a%2Fb%20c/status"
        );
    }

    #[tokio::test]
    async fn test_no_session_short_circuits() {
        let backend = MockBackend::start().await;
        let ctx = backend.context(Arc::new(MemoryCredentialStore::new()));

        let result: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/cars", "Failed"), RequestOptions::default())
            .await;

        assert_eq!(result, AdapterResult::fail("No access token found"));
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_unwraps_at_declared_path() {
        let (backend, ctx) = backend_with_session().await;
        let payload = json!({"items": [1, 2, 3]});
        backend.respond(
            "GET",
            "/nested",
            200,
            json!({"statusCode": 200, "success": true, "message": "OK", "data": NESTED.wrap(payload.clone())}),
        );

        let result: AdapterResult<Value> = ctx
            .call(
                &Endpoint::get("/nested", "Failed").unwrapping(NESTED),
                RequestOptions::default(),
            )
            .await;

        assert!(result.success);
        assert_eq!(result.data, Some(payload));
        assert_eq!(result.message.as_deref(), Some("OK"));
    }

    #[tokio::test]
    async fn test_success_false_prefers_backend_message() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("POST", "/thing", 200, json!({"success": false, "message": "Nope"}));

        let result: AdapterResult<Value> = ctx
            .send(&Endpoint::post("/thing", "Failed to create thing"), &json!({}))
            .await;
        assert_eq!(result, AdapterResult::fail("Nope"));
    }

    #[tokio::test]
    async fn test_success_false_without_message_uses_fallback() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/thing", 200, json!({"success": false}));

        let result: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/thing", "Failed to load thing"), RequestOptions::default())
            .await;
        assert_eq!(result, AdapterResult::fail("Failed to load thing"));
    }

    #[tokio::test]
    async fn test_error_status_with_message() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/thing", 403, json!({"statusCode": 403, "success": false, "message": "Forbidden"}));

        let result: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/thing", "Failed"), RequestOptions::default())
            .await;
        assert_eq!(result, AdapterResult::fail("Forbidden"));
    }

    #[tokio::test]
    async fn test_error_status_without_body_is_transport() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/thing", 502, Value::Null);

        let result: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/thing", "Failed to load thing"), RequestOptions::default())
            .await;
        assert_eq!(result, AdapterResult::fail("Failed to load thing"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport() {
        let gateway = GatewayClient::new(
            "http://127.0.0.1:1",
            Arc::new(rentadmin_core::auth::AuthBridge::new(Arc::new(
                MemoryCredentialStore::with_token("tok123"),
            ))),
        )
        .unwrap();
        let ctx = AdapterContext::new(
            Arc::new(gateway),
            Arc::new(MemoryCredentialStore::with_token("tok123")),
        );

        let result: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/thing", "Failed to load thing"), RequestOptions::default())
            .await;
        assert_eq!(result, AdapterResult::fail("Failed to load thing"));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_failure_not_empty_success() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/thing", 200, json!({"success": true, "data": {"other": 1}}));

        let result: AdapterResult<Value> = ctx
            .call(
                &Endpoint::get("/thing", "Failed to load thing").unwrapping(NESTED),
                RequestOptions::default(),
            )
            .await;
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.message.as_deref(), Some("Failed to load thing"));
    }

    #[tokio::test]
    async fn test_status_code_check() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/thing", 200, json!({"success": true, "statusCode": 422, "data": {}, "message": "Half done"}));

        let endpoint = Endpoint::get("/thing", "Failed").checking_status_code();
        let result: AdapterResult<Value> = ctx.call(&endpoint, RequestOptions::default()).await;
        assert_eq!(result, AdapterResult::fail("Half done"));

        let lenient: AdapterResult<Value> = ctx
            .call(&Endpoint::get("/thing", "Failed"), RequestOptions::default())
            .await;
        assert!(lenient.success);
    }

    #[tokio::test]
    async fn test_list_sends_query() {
        let (backend, ctx) = backend_with_session().await;
        backend.respond("GET", "/things", 200, json!({"success": true, "data": []}));

        let query = ListQuery {
            page: Some(3),
            limit: Some(20),
            ..ListQuery::default()
        };
        let result: AdapterResult<Vec<Value>> =
            ctx.list(&Endpoint::get("/things", "Failed"), &query).await;

        assert!(result.success);
        assert_eq!(backend.requests()[0].query.as_deref(), Some("page=3&limit=20"));
    }
}
