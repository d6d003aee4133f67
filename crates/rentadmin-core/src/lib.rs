//! # Rentadmin Core
//!
//! Shared building blocks for the rentadmin console.
//!
//! This crate provides:
//! - The session credential store (cookie semantics, memory and file backed)
//! - The in-process auth bridge and the `TokenSource` seam used by the gateway
//! - The backend envelope, per-endpoint unwrap paths and normalized results
//! - Configuration loading and validation (JSON5 format)
//! - Secret wrappers that keep tokens out of logs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod secrets;

pub use auth::{AuthBridge, AuthCheck, BridgeStatus, TokenFetch, TokenSource};
pub use config::{Config, ConfigError, Environment};
pub use credentials::{
    CookieSettings, CredentialError, CredentialStore, FileCredentialStore,
    MemoryCredentialStore, SessionCookie, parse_cookie_header,
};
pub use envelope::{AdapterResult, Envelope, NO_ACCESS_TOKEN_MESSAGE, UnwrapPath};
pub use secrets::{SessionToken, scrub_secrets};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::auth::{AuthBridge, TokenSource};
    pub use crate::config::Config;
    pub use crate::credentials::{CredentialStore, MemoryCredentialStore};
    pub use crate::envelope::{AdapterResult, Envelope, UnwrapPath};
    pub use crate::secrets::SessionToken;
}
