//! Error types for loyalty storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found")]
    NotFound,

    /// An expiration already exists for the earned transaction
    /// (uniqueness guard on the idempotency key).
    #[error("already expired: {earned_id}")]
    AlreadyExpired {
        /// The earned transaction that was already expired.
        earned_id: String,
    },
}
