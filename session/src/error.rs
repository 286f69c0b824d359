//! Error taxonomy for the session core.
//!
//! ERROR HANDLING
//! ==============
//! `AuthError` is `Clone` because a single refresh outcome is handed to every
//! caller waiting on the shared in-flight refresh. Variants carry rendered
//! strings rather than source errors for the same reason.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password.";
pub const UNREACHABLE_MESSAGE: &str = "Cannot connect to backend API.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Check your data and try again.";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed. Check backend and try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Sign in again.";

/// Failure of a login/register/refresh exchange or of an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The token endpoint rejected the username/password pair (HTTP 401).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The register endpoint rejected the payload (HTTP 400).
    #[error("validation failed: {message}")]
    Validation {
        /// First field-level message, or the fallback chain's result.
        message: String,
        /// Field name to messages, in server order.
        fields: Vec<(String, Vec<String>)>,
    },

    /// No refresh token is stored and the session is not cookie based.
    #[error("missing refresh token")]
    MissingRefresh,

    /// The backend could not be reached at all.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}")]
    Status { status: u16, body: String },

    /// A success response did not match the expected schema.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl AuthError {
    /// HTTP status carried by this error, if any. Transport failures report 0.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidCredentials => Some(401),
            Self::Validation { .. } => Some(400),
            Self::Network(_) => Some(0),
            Self::Status { status, .. } => Some(*status),
            Self::MissingRefresh | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::Status { status: 401, .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Text suitable for showing next to a form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_owned(),
            Self::Validation { message, .. } => message.clone(),
            Self::Network(_) => UNREACHABLE_MESSAGE.to_owned(),
            Self::MissingRefresh | Self::Status { status: 401, .. } => SESSION_EXPIRED_MESSAGE.to_owned(),
            Self::Status { .. } | Self::Decode(_) => REQUEST_FAILED_MESSAGE.to_owned(),
        }
    }

    /// Build a [`AuthError::Validation`] from a register 400 body.
    ///
    /// The message is the first non-blank field message (an `errors` object
    /// wins over top-level fields), then a non-blank `detail`, then
    /// [`REGISTRATION_FAILED_MESSAGE`].
    #[must_use]
    pub fn from_validation_body(body: &str) -> Self {
        let payload: Value = serde_json::from_str(body).unwrap_or(Value::Null);

        let fields = match payload.get("errors") {
            Some(errors @ Value::Object(_)) => collect_field_messages(errors),
            _ => collect_field_messages(&payload),
        };

        let detail = payload
            .get("detail")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let message = fields
            .iter()
            .find_map(|(_, messages)| messages.first().cloned())
            .or_else(|| detail.map(str::to_owned))
            .unwrap_or_else(|| REGISTRATION_FAILED_MESSAGE.to_owned());

        Self::Validation { message, fields }
    }
}

fn collect_field_messages(value: &Value) -> Vec<(String, Vec<String>)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };
    map.iter()
        .filter(|(key, _)| key.as_str() != "detail")
        .filter_map(|(key, value)| {
            let messages: Vec<String> = match value {
                Value::Array(items) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_owned)
                    .collect(),
                Value::String(m) if !m.trim().is_empty() => vec![m.clone()],
                _ => Vec::new(),
            };
            (!messages.is_empty()).then(|| (key.clone(), messages))
        })
        .collect()
}

/// Failure raised by a [`crate::http::Transport`] before any status was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, CORS rejection, timeout.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    /// The request could not be built (bad header, unserializable body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        Self::Network(err.to_string())
    }
}

/// Configuration parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}
