//! Backend envelope and normalized adapter results.
//!
//! Every backend response is `{statusCode, data, message, success}`, but the
//! payload sits at a different depth below `data` depending on the endpoint.
//! Each endpoint declares an [`UnwrapPath`] instead of special-casing the
//! nesting in code.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message returned by every authenticated adapter call made without a session.
pub const NO_ACCESS_TOKEN_MESSAGE: &str = "No access token found";

/// The backend's outer JSON wrapper.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// HTTP-like status code echoed in the body.
    #[serde(default)]
    pub status_code: Option<u16>,

    /// Payload or payload wrapper.
    #[serde(default)]
    pub data: Value,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Backend success flag.
    #[serde(default)]
    pub success: bool,
}

impl Envelope {
    /// Successful envelope around `data`.
    #[must_use]
    pub fn ok(data: Value, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(200),
            data,
            message: Some(message.into()),
            success: true,
        }
    }

    /// Failed envelope carrying `message`.
    #[must_use]
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status_code),
            data: Value::Null,
            message: Some(message.into()),
            success: false,
        }
    }

    /// Whether the status code, when present, is 2xx.
    #[must_use]
    pub fn status_ok(&self) -> bool {
        self.status_code.is_some_and(|code| (200..300).contains(&code))
    }

    /// Backend message, if non-blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

/// Keys traversed below `envelope.data` to reach an endpoint's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwrapPath(&'static [&'static str]);

impl UnwrapPath {
    /// Payload is `envelope.data` itself.
    pub const ROOT: Self = Self(&[]);

    /// Path through the given keys.
    #[must_use]
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self(keys)
    }

    /// Keys in traversal order.
    #[must_use]
    pub const fn keys(&self) -> &'static [&'static str] {
        self.0
    }

    /// Locate the payload inside `data`.
    #[must_use]
    pub fn apply<'a>(&self, data: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(data, |value, key| value.get(*key))
    }

    /// Take the payload out of `data`.
    #[must_use]
    pub fn take(&self, mut data: Value) -> Option<Value> {
        for key in self.0 {
            data = match data {
                Value::Object(mut map) => map.remove(*key)?,
                _ => return None,
            };
        }
        Some(data)
    }

    /// Nest `payload` under this path; inverse of [`UnwrapPath::take`].
    #[must_use]
    pub fn wrap(&self, payload: Value) -> Value {
        self.0.iter().rev().fold(payload, |inner, key| {
            let mut map = serde_json::Map::new();
            map.insert((*key).to_string(), inner);
            Value::Object(map)
        })
    }
}

impl std::fmt::Display for UnwrapPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data")?;
        for key in self.0 {
            write!(f, ".{key}")?;
        }
        Ok(())
    }
}

/// Uniform `{success, data?, message?}` result of every adapter operation.
///
/// `success == true` implies `data` is present; `success == false` implies a
/// non-empty `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterResult<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Unwrapped payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Message to show the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> AdapterResult<T> {
    /// Successful result.
    #[must_use]
    pub fn ok(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
        }
    }

    /// Failed result. Blank messages are replaced so the invariant holds.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Request failed".to_string()
        } else {
            message
        };

        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }

    /// Failed result for a call attempted without a session.
    #[must_use]
    pub fn no_credential() -> Self {
        Self::fail(NO_ACCESS_TOKEN_MESSAGE)
    }

    /// Message text, or empty.
    #[must_use]
    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Transform the payload.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AdapterResult<U> {
        AdapterResult {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
        }
    }

    /// Convert into a plain `Result`.
    ///
    /// # Errors
    ///
    /// Returns the message when the operation failed.
    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.message.unwrap_or_default()),
        }
    }
}
