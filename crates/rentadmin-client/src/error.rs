//! Client errors.

use rentadmin_core::envelope::{AdapterResult, NO_ACCESS_TOKEN_MESSAGE};
use thiserror::Error;

/// Transport-level errors from the gateway client.
///
/// The gateway does not interpret response bodies; a non-2xx response is
/// returned as [`GatewayError::Api`] with the raw body for the adapter to read.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Non-2xx response.
    #[error("API error: {status}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Why an adapter operation failed.
///
/// Every variant carries the message shown to the user; none of them escape
/// an adapter except as a failed [`AdapterResult`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterFault {
    /// No session token; nothing was sent.
    #[error("{}", NO_ACCESS_TOKEN_MESSAGE)]
    NoCredential,

    /// Network failure or an unusable response.
    #[error("{message}")]
    Transport {
        /// Resource-specific fallback message.
        message: String,
    },

    /// The backend refused the operation.
    #[error("{message}")]
    BackendRejection {
        /// Status code reported by the backend, if any.
        status: Option<u16>,
        /// Backend message, or the fallback when it sent none.
        message: String,
    },

    /// The backend reported success but the payload was not where, or what,
    /// the endpoint declares.
    #[error("{message}")]
    UnexpectedShape {
        /// Resource-specific fallback message.
        message: String,
    },
}

impl AdapterFault {
    /// Convert into a failed result carrying this fault's message.
    #[must_use]
    pub fn into_result<T>(self) -> AdapterResult<T> {
        match self {
            Self::NoCredential => AdapterResult::no_credential(),
            other => AdapterResult::fail(other.to_string()),
        }
    }
}
