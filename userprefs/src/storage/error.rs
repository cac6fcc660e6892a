use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
}

impl StorageError {
    /// True if `err` carries a `StorageError::NotFound`
    pub fn is_not_found(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<Self>(), Some(Self::NotFound(_)))
    }
}
