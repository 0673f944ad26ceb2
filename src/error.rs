//! Error types
//!
//! Every fallible call in the library returns [`CachetError`]. Non-2xx HTTP
//! responses are split into [`CachetError::NotFound`] (404) and
//! [`CachetError::Api`] (everything else) so callers can match on the common
//! "entity is gone" case without inspecting status codes.

use serde_json::Value;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, CachetError>;

/// Errors returned by the Cachet client
#[derive(Debug, Error)]
pub enum CachetError {
    /// Required fields were missing; raised before any request is sent.
    #[error("{resource}: missing required field(s): {}", fields.join(", "))]
    Validation {
        resource: &'static str,
        fields: Vec<&'static str>,
    },

    /// The server answered 404.
    #[error("{} not found", describe_target(path, *id))]
    NotFound {
        path: String,
        id: Option<i64>,
        body: Value,
    },

    /// The server answered with any other non-2xx status.
    #[error("API request to {} failed with status {status}", describe_target(path, *id))]
    Api {
        status: u16,
        path: String,
        id: Option<i64>,
        body: Value,
    },

    /// The request never produced a response (connection, TLS, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CachetError {
    /// HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded error body returned by the server, if any
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::NotFound { body, .. } | Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn describe_target(path: &str, id: Option<i64>) -> String {
    match id {
        Some(id) => format!("{}/{}", path, id),
        None => path.to_string(),
    }
}
