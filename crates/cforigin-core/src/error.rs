use thiserror::Error;

/// Result type alias for Shodan operations
pub type Result<T> = std::result::Result<T, ShodanError>;

/// Errors raised while building an address table
#[derive(Error, Debug)]
pub enum CoreError {
    /// A CIDR entry could not be parsed
    #[error("invalid address block '{block}' on line {line}")]
    InvalidBlock {
        /// The offending text
        block: String,
        /// 1-based line number in the source
        line: usize,
    },

    /// The table source contained no blocks
    #[error("address table is empty")]
    EmptyTable,

    /// The table file could not be read
    #[error("could not read address table {path}: {source}")]
    Io {
        /// Path that was being read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when using the Shodan API
#[derive(Error, Debug)]
pub enum ShodanError {
    /// Authentication failed - invalid or missing API key
    #[error("authentication failed: invalid API key")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("rate limit exceeded")]
    RateLimited,

    /// Insufficient query credits
    #[error("insufficient query credits: {0}")]
    InsufficientCredits(String),

    /// API returned an error response
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

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl ShodanError {
    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::InsufficientCredits(_) => Some(402),
            Self::RateLimited => Some(429),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
