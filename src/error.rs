use thiserror::Error;

/// Errors raised by the TruffleAI SDK.
///
/// Every public operation either resolves with a typed success value or
/// fails with exactly one of these variants. The SDK never retries on its
/// own; retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum TruffleError {
    /// A local precondition failed before any network call was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server rejected the API key (HTTP 401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server throttled the request (HTTP 429).
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Any other non-success response from the API, either a non-2xx
    /// status or an application-level `success: false` result.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, connect, TLS, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// A response body could not be decoded into the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TruffleError {
    /// The HTTP-style status code associated with this error.
    ///
    /// Local validation maps to 400, transport-level failures to 0.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Authentication(_) => 401,
            Self::RateLimited(_) => 429,
            Self::Api { status, .. } => *status,
            Self::Network(_) | Self::Serialization(_) => 0,
        }
    }
}

pub type Result<T> = std::result::Result<T, TruffleError>;
