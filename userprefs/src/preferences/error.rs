use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Invalid owner name: {0:?}")]
    InvalidOwner(String),

    #[error("Unknown preference backend: {0}. Must be 'single' or 'multi'")]
    UnknownBackend(String),
}
