//! Bridge server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use rentadmin_core::config::Config;
use rentadmin_core::credentials::CookieSettings;

use crate::BridgeError;
use crate::routes;

/// Bridge server configuration.
#[derive(Debug, Clone)]
pub struct BridgeServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Bind address.
    pub bind_address: String,
    /// Origins allowed cross-origin access with credentials.
    pub allowed_origins: Vec<String>,
    /// How session cookies are issued and read.
    pub cookie: CookieSettings,
}

impl Default for BridgeServerConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl BridgeServerConfig {
    /// Derive server settings from the application config.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            port: config.bridge.port,
            bind_address: config.bridge.mode.address(),
            allowed_origins: config.bridge.allowed_origins.clone(),
            cookie: config.cookie_settings(),
        }
    }
}

/// State shared across handlers.
#[derive(Debug, Clone)]
pub struct BridgeState {
    /// Cookie settings.
    pub cookie: CookieSettings,
}

/// Bridge server.
pub struct Bridge {
    config: BridgeServerConfig,
    state: Arc<BridgeState>,
}

impl Bridge {
    /// Create a new bridge.
    #[must_use]
    pub fn new(config: BridgeServerConfig) -> Self {
        let state = Arc::new(BridgeState {
            cookie: config.cookie.clone(),
        });
        Self { config, state }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let app = Router::new()
            .route("/health", get(routes::health))
            .route("/api/auth/check", get(routes::auth_check))
            .route("/api/auth/token", get(routes::auth_token))
            .route(
                "/api/auth/session",
                axum::routing::post(routes::create_session).delete(routes::delete_session),
            )
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        let origins: Vec<HeaderValue> = self
            .config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid allowed origin");
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            return app;
        }

        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true),
        )
    }

    /// Run the bridge server until it fails.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the listener fails.
    pub async fn run(&self) -> Result<(), BridgeError> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| BridgeError::Config(format!("Invalid address: {e}")))?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Auth bridge listening on http://{}", addr);

        axum::serve(listener, self.router())
            .await
            .map_err(|e| BridgeError::Server(e.to_string()))
    }
}
