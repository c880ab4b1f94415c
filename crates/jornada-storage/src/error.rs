use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    /// A create lost to another writer: the key already holds a record.
    #[error("object already exists: {key}")]
    AlreadyExists { key: String },

    /// An update lost to another writer: the record changed since it was read.
    #[error("precondition failed for key: {key}")]
    PreconditionFailed { key: String },

    #[error("invalid record: {0}")]
    Invalid(#[from] jornada_core::error::CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),
}

impl StorageError {
    /// True for the two lost-race variants.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StorageError::AlreadyExists { .. } | StorageError::PreconditionFailed { .. }
        )
    }
}
