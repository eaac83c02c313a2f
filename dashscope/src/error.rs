//! Error types for the DashScope API client.

use thiserror::Error;

/// Result type alias for DashScope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for DashScope API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response from a REST endpoint.
    #[error("dashscope: {code} - {message} (request_id={request_id}, http_status={http_status})")]
    Api {
        code: String,
        message: String,
        request_id: String,
        http_status: u16,
    },

    /// `error` event reported by a realtime session.
    #[error("session error: {code} - {message}")]
    Session { code: String, message: String },

    /// WebSocket error.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Base64 decoding error.
    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Session closed.
    #[error("session closed")]
    SessionClosed,

    /// Response body did not carry the expected field.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>, http_status: u16) -> Self {
        Error::Api {
            code: code.into(),
            message: message.into(),
            request_id: String::new(),
            http_status,
        }
    }

    /// Creates a new API error with request ID.
    pub fn api_with_request_id(
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
        http_status: u16,
    ) -> Self {
        Error::Api {
            code: code.into(),
            message: message.into(),
            request_id: request_id.into(),
            http_status,
        }
    }
}
