//! Live feed error types.

/// Errors from the stop-monitoring HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing API key
    #[error("unauthorized (check API token)")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by stop-monitoring API")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body is not JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The credential cannot be sent as a header value
    #[error("API token contains characters not allowed in a header")]
    InvalidCredential,
}

impl FeedError {
    /// Whether this is a transport failure rather than a bad payload.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FeedError::Json { .. })
    }
}
