use lvl_types::LevelId;

/// Errors from level store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No level is stored under this id.
    #[error("level not found: {0}")]
    NotFound(LevelId),

    /// A level is already stored under this id.
    #[error("level already exists: {0}")]
    AlreadyExists(LevelId),

    /// The id does not resolve to a single file inside the storage directory.
    #[error("level id does not map to a safe path: {0:?}")]
    UnsafePath(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
