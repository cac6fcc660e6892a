use anyhow::Result;
use async_trait::async_trait;
use shared_types::{Entries, Owner, PreferenceSet};

use super::config::BackendKind;

/// Per-owner preference storage.
///
/// Reads never fail for an owner that has no stored preferences; they return
/// an empty set instead. `update` replaces the owner's whole set.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    fn kind(&self) -> BackendKind;

    async fn read(&self, owner: &Owner) -> Result<PreferenceSet>;

    /// Always exactly one set: the owner's own.
    async fn list(&self, owner: &Owner) -> Result<Vec<PreferenceSet>> {
        Ok(vec![self.read(owner).await?])
    }

    /// Make the stored set equal to `entries` and return what was stored.
    ///
    /// Not atomic: a failure part way through leaves some keys written.
    /// Calling again with the same `entries` finishes the job.
    async fn update(&self, owner: &Owner, entries: Entries) -> Result<PreferenceSet>;

    /// Removing preferences of an owner with none stored succeeds.
    async fn delete(&self, owner: &Owner) -> Result<()>;
}
