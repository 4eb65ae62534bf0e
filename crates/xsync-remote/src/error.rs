//! Error types for xsync-remote

/// Result type for remote API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the remote workspace
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (connection, timeout, TLS)
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The remote rejected the request; message surfaced verbatim
    #[error("remote error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A create/update collided with an existing object name.
    ///
    /// Recovery (delete-then-recreate) applies only to the object types
    /// enumerated by [`crate::ObjectType::uses_delete_recreate_recovery`].
    #[error("uniqueness conflict: {message}")]
    UniquenessConflict { message: String },

    /// The response body did not have the expected shape
    #[error("malformed remote response: {detail}")]
    MalformedResponse { detail: String },
}

impl Error {
    /// Whether this error is a name-uniqueness conflict eligible for
    /// delete-then-recreate recovery.
    pub fn is_uniqueness_conflict(&self) -> bool {
        matches!(self, Self::UniquenessConflict { .. })
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            detail: detail.into(),
        }
    }
}
