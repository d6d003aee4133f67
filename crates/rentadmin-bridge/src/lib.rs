//! # Rentadmin Bridge
//!
//! HTTP surface of the auth bridge. Browser-side code asks these endpoints
//! whether a session exists and, right before calling the backend, for the
//! raw token, instead of reading the session cookie itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Read-only credential store over a request's `Cookie` header.
pub mod cookies;
mod routes;
mod server;

pub use cookies::RequestCookies;
pub use server::{Bridge, BridgeServerConfig, BridgeState};

/// Start the bridge server.
///
/// # Errors
///
/// Returns error if server fails to start.
pub async fn start(config: BridgeServerConfig) -> Result<(), BridgeError> {
    Bridge::new(config).run().await
}

/// Bridge errors.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Server error.
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
