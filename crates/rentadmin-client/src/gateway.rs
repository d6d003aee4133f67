//! Gateway client.
//!
//! Transport only: resolves the session token through a [`TokenSource`],
//! shapes headers, dispatches, and hands back the raw response. Error
//! normalization belongs to the adapters.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, Url};
use serde_json::Value;

use rentadmin_core::auth::TokenSource;
use rentadmin_core::secrets::SessionToken;

use crate::error::GatewayError;

/// Caller-supplied request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// JSON body.
    pub body: Option<Value>,
    /// Headers merged over the computed defaults; caller wins on conflict.
    pub headers: HeaderMap,
    /// Query parameters.
    pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
        }
    }
}

impl RequestOptions {
    /// Options for `method` with no body.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header, replacing the default of the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Append query parameters.
    #[must_use]
    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }
}

/// A fully shaped request, ready to dispatch.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Target URL including the query string.
    pub url: Url,
    /// HTTP method.
    pub method: Method,
    /// Final headers.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: Option<Value>,
}

impl OutboundRequest {
    /// Whether an `Authorization` header is attached.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }
}

/// Shape an outbound request.
///
/// With a non-empty token the request carries `Authorization: Bearer <token>`
/// (marked sensitive); without one it is still built, unauthenticated.
/// `Content-Type: application/json` is set unless the caller overrides it.
///
/// # Errors
///
/// Returns error if the URL does not parse or the token is not a valid
/// header value.
pub fn build_request(
    url: &str,
    token: Option<&SessionToken>,
    options: RequestOptions,
) -> Result<OutboundRequest, GatewayError> {
    let mut url =
        Url::parse(url).map_err(|e| GatewayError::InvalidRequest(format!("{url}: {e}")))?;
    if !options.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&options.query);
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&token.bearer()).map_err(|_| {
            GatewayError::InvalidRequest("session token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for name in options.headers.keys() {
        headers.remove(name);
    }
    for (name, value) in &options.headers {
        headers.append(name.clone(), value.clone());
    }

    Ok(OutboundRequest {
        url,
        method: options.method,
        headers,
        body: options.body,
    })
}

/// HTTP client for the backend API.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl GatewayClient {
    /// Create a client for `base_url`, reading tokens from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, base_url, tokens))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Base URL of the backend.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Send one request. No retries.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-2xx response.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, GatewayError> {
        let token = self.tokens.fetch_token().await;
        let outbound = build_request(&self.url(path), token.as_ref(), options)?;

        tracing::debug!(
            method = %outbound.method,
            url = %outbound.url,
            authorized = outbound.is_authorized(),
            "Sending backend request"
        );

        let mut request = self
            .client
            .request(outbound.method, outbound.url)
            .headers(outbound.headers);
        if let Some(body) = &outbound.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "Backend returned an error status");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use pretty_assertions::assert_eq;
    use rentadmin_core::auth::AuthBridge;
    use rentadmin_core::credentials::MemoryCredentialStore;
    use serde_json::json;

    const URL: &str = "http://localhost:5000/api/v1/cars";

    #[test]
    fn test_bearer_header_when_token_present() {
        let token = SessionToken::new("tok123");
        let request = build_request(URL, Some(&token), RequestOptions::default()).unwrap();

        let auth = request.headers.get(AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer tok123");
        assert!(auth.is_sensitive());
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_no_authorization_without_token() {
        let request = build_request(URL, None, RequestOptions::default()).unwrap();
        assert!(!request.is_authorized());

        let empty = SessionToken::new("");
        let request = build_request(URL, Some(&empty), RequestOptions::default()).unwrap();
        assert!(!request.is_authorized());
    }

    #[test]
    fn test_caller_headers_win() {
        let token = SessionToken::new("tok123");
        let options = RequestOptions::new(Method::POST)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(
                HeaderName::from_static("x-request-id"),
                HeaderValue::from_static("abc"),
            );

        let request = build_request(URL, Some(&token), options).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers[CONTENT_TYPE], "text/plain");
        assert_eq!(request.headers["x-request-id"], "abc");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer tok123");
        assert_eq!(request.headers.get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn test_query_parameters() {
        let options = RequestOptions::default().query([
            ("page".to_string(), "2".to_string()),
            ("search".to_string(), "red car".to_string()),
        ]);
        let request = build_request(URL, None, options).unwrap();
        assert_eq!(
            request.url.as_str(),
            "http://localhost:5000/api/v1/cars?page=2&search=red+car"
        );

        let plain = build_request(URL, None, RequestOptions::default()).unwrap();
        assert_eq!(plain.url.as_str(), URL);
    }

    #[test]
    fn test_invalid_url() {
        let result = build_request("not a url", None, RequestOptions::default());
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[test]
    fn test_url_joining() {
        let tokens = Arc::new(AuthBridge::new(Arc::new(MemoryCredentialStore::new())));
        let client = GatewayClient::new("http://localhost:5000/api/v1/", tokens).unwrap();

        assert_eq!(client.url("/cars"), "http://localhost:5000/api/v1/cars");
        assert_eq!(client.url("cars"), "http://localhost:5000/api/v1/cars");
        assert_eq!(client.url("https://other.test/x"), "https://other.test/x");
    }

    #[tokio::test]
    async fn test_request_attaches_token_on_the_wire() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/cars", 200, json!({"success": true, "data": []}));

        let store = Arc::new(MemoryCredentialStore::with_token("tok123"));
        let gateway = backend.gateway(store);
        let response = gateway.request("/cars", RequestOptions::default()).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let seen = backend.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer tok123"));
        assert_eq!(seen[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_request_without_token_is_still_sent() {
        let backend = MockBackend::start().await;
        backend.respond("GET", "/cars", 401, json!({"success": false, "message": "Unauthorized"}));

        let gateway = backend.gateway(Arc::new(MemoryCredentialStore::new()));
        let err = gateway
            .request("/cars", RequestOptions::default())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(401));
        match err {
            GatewayError::Api { body, .. } => assert!(body.contains("Unauthorized")),
            other => panic!("unexpected error: {other}"),
        }

        let seen = backend.requests();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].authorization.is_none());
    }

    #[tokio::test]
    async fn test_request_sends_json_body() {
        let backend = MockBackend::start().await;
        backend.respond("POST", "/cars", 201, json!({"success": true, "data": {}}));

        let gateway = backend.gateway(Arc::new(MemoryCredentialStore::with_token("t")));
        gateway
            .request(
                "/cars",
                RequestOptions::new(Method::POST).body(json!({"make": "Toyota"})),
            )
            .await
            .unwrap();

        assert_eq!(backend.requests()[0].body, json!({"make": "Toyota"}));
    }
}
