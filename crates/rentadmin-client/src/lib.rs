//! # Rentadmin Client
//!
//! Talks to the rentadmin backend API.
//!
//! - [`GatewayClient`]: attaches the session token and sends requests
//! - [`BridgeClient`]: reads the session through a remote auth bridge
//! - [`adapters`]: one adapter per resource, each returning an
//!   [`AdapterResult`](rentadmin_core::AdapterResult)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapters;
pub mod bridge_client;
pub mod error;
pub mod gateway;
pub mod models;

#[cfg(test)]
mod testing;

pub use adapters::{AdapterContext, Endpoint};
pub use bridge_client::BridgeClient;
pub use error::{AdapterFault, GatewayError};
pub use gateway::{GatewayClient, OutboundRequest, RequestOptions, build_request};
