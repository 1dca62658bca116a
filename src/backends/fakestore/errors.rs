use thiserror::Error;

/// Failure modes of a store API request.
///
/// The split decides whether a request is worth retrying: network trouble,
/// server errors and rate limits are transient, everything else is not.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreApiError {
    /// Rate limiting (429)
    #[error("Rate limited: {message} (retry after: {retry_after:?}s)")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Server error (500+)
    #[error("Server error: {message} (status: {status})")]
    ServerError { status: u16, message: String },

    /// Client error (400-499, excluding rate limit)
    #[error("Client error: {message} (status: {status})")]
    ClientError { status: u16, message: String },

    /// Timeout, connection refused and similar
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    Other(String),
}

impl StoreApiError {
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreApiError::Network(_)
                | StoreApiError::ServerError { .. }
                | StoreApiError::RateLimit { .. }
        )
    }

    /// Server-requested wait in seconds, for rate limit errors
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            StoreApiError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            StoreApiError::Network(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            StoreApiError::Network(format!("Connection failed: {}", error))
        } else if error.is_decode() {
            StoreApiError::ParseError(error.to_string())
        } else if error.is_request() {
            StoreApiError::Network(format!("Request error: {}", error))
        } else {
            StoreApiError::Other(error.to_string())
        }
    }

    pub fn from_status(status: u16, body: String, retry_after: Option<u64>) -> Self {
        match status {
            429 => StoreApiError::RateLimit {
                message: body,
                retry_after,
            },
            400..=499 => StoreApiError::ClientError {
                status,
                message: body,
            },
            500..=599 => StoreApiError::ServerError {
                status,
                message: body,
            },
            _ => StoreApiError::Other(format!("HTTP {}: {}", status, body)),
        }
    }
}
