use sea_orm::{DbErr, SqlErr};

/// Errors that can occur within the storage layer.
///
/// Unique-key violations reported by the database surface as
/// [`StorageError::Conflict`] so callers can answer `409` without
/// inspecting driver messages.
///
/// # Examples
///
/// ```rust
/// use catalyst_storage::error::StorageError;
///
/// let err = StorageError::NotFound {
///     entity: "blog_post",
///     id: "post-99".to_string(),
/// };
/// assert!(err.to_string().contains("blog_post"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the database.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// A natural key (slug, setting key, object name, username) is taken.
    #[error("Storage: conflict: {0}")]
    Conflict(String),

    /// Input that the schema cannot hold.
    #[error("Storage: invalid input: {0}")]
    Invalid(String),

    /// An imported row could not be decoded into the table's insert shape.
    #[error("Storage: row {index} is invalid: {source}")]
    InvalidRow {
        index: usize,
        source: serde_json::Error,
    },

    #[error("Storage: database error: {0}")]
    Db(DbErr),

    /// JSON serialization or deserialization failure (JSON text columns).
    #[error("Storage: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage: object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("Storage: {0}")]
    Other(String),
}

impl From<DbErr> for StorageError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => StorageError::Conflict(msg),
            _ => StorageError::Db(err),
        }
    }
}

/// Convenience `Result` alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
