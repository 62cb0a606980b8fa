//! Store error types.

/// Errors writing persisted state.
///
/// Reads never fail: missing or unreadable files load as defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("store I/O error: {message}")]
    Io { message: String },

    /// Serialization failed
    #[error("store serialization error: {message}")]
    Serialize { message: String },
}
