use anyhow::Result;
use async_trait::async_trait;

use super::model::{Container, Record};

/// Store of whole-map containers, one per name.
#[async_trait]
pub trait ContainerClient: Send + Sync {
    /// `None` when no container with that name exists.
    async fn get(&self, name: &str) -> Result<Option<Container>>;

    /// # Errors
    /// Returns `StorageError::AlreadyExists` if the name is taken
    async fn create(&self, container: &Container) -> Result<Container>;

    /// # Errors
    /// Returns `StorageError::NotFound` if the container does not exist
    async fn update(&self, container: &Container) -> Result<Container>;

    /// Deleting a missing container succeeds.
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Store of named records grouped into scopes.
///
/// A scope must exist before records can be created in it. Listing a missing
/// scope yields no records rather than an error.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Checks a record name against this store's naming rules without any I/O.
    ///
    /// # Errors
    /// Returns `StorageError::InvalidName` if the store cannot hold the name
    fn validate_record_name(&self, name: &str) -> Result<()>;

    async fn scope_exists(&self, scope: &str) -> Result<bool>;

    /// # Errors
    /// Returns `StorageError::AlreadyExists` if the scope already exists
    async fn create_scope(&self, scope: &str) -> Result<()>;

    /// Removes the scope and every record in it. A missing scope is not an error.
    async fn delete_scope(&self, scope: &str) -> Result<()>;

    async fn list_records(&self, scope: &str) -> Result<Vec<Record>>;

    /// # Errors
    /// Returns `StorageError::NotFound` if the scope is missing and
    /// `StorageError::AlreadyExists` if the record name is taken
    async fn create_record(&self, scope: &str, record: &Record) -> Result<Record>;

    /// # Errors
    /// Returns `StorageError::NotFound` if the record does not exist
    async fn update_record(&self, scope: &str, record: &Record) -> Result<Record>;

    async fn delete_record(&self, scope: &str, name: &str) -> Result<()>;
}
