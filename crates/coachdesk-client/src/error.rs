//! Error types for the Coachdesk client.
//!
//! Gateway calls never return these: expected HTTP and transport failures are
//! folded into an [`Envelope`](crate::Envelope). `ClientError` covers setup and
//! caller bugs only.

/// Client setup and programming errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A required resource identifier was empty.
    #[error("missing required identifier: {resource}")]
    MissingIdentifier { resource: &'static str },

    /// An identifier that cannot name a single path segment.
    #[error("invalid {resource} identifier: {value:?}")]
    InvalidIdentifier { resource: &'static str, value: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// HTTP client could not be constructed.
    #[error("http client error: {message}")]
    Http { message: String },

    /// Token storage failed.
    #[error("token store error: {message}")]
    TokenStore { message: String },

    /// A multipart body could not be assembled.
    #[error("multipart error: {message}")]
    Multipart { message: String },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
        }
    }
}

/// Result type for client setup operations.
pub type ClientResult<T> = Result<T, ClientError>;
