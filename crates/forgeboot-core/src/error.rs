//! Error types for forgeboot.

use thiserror::Error;

/// Main error type for forgeboot operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(String),

    /// Credentials were rejected (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials lack permission for the resource (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned any other error status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Configuration error (missing token, bad environment)
    #[error("Configuration error: {0}")]
    Config(String),

    /// External command exited unsuccessfully
    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    /// External command could not be spawned or fed input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map a non-success HTTP status and its body to an error.
    ///
    /// GitHub error bodies look like `{"message": "..."}`; the message is
    /// extracted when present, otherwise the raw body is kept.
    pub fn from_status(status: u16, body: String) -> Self {
        let message = extract_message(&body).unwrap_or(body);
        match status {
            401 => Error::Unauthorized(message),
            403 => Error::Forbidden(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Result type alias for forgeboot operations.
pub type Result<T> = std::result::Result<T, Error>;
