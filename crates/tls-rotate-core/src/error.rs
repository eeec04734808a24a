use thiserror::Error;

/// Result type alias for secret store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when talking to a secret store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named secret does not exist
    #[error("secret not found: {name}")]
    NotFound {
        /// Name of the secret that was requested
        name: String,
    },

    /// Credentials were missing or rejected
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// Credentials were accepted but lack permission for the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The store rejected a write because the record changed underneath us
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the API
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection settings are missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns the HTTP status code if the store answered with one
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Conflict(_) => Some(409),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
