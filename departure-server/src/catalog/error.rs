//! Catalog API error types.

/// Errors that can occur when querying the static catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body is not JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}

impl CatalogError {
    /// Whether this is a transport failure rather than a bad payload.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CatalogError::Json { .. })
    }
}
