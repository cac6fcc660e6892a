use anyhow::Result;
use shared_types::{Entries, Owner, ResourceCollection, ResourceObject};
use std::sync::Arc;
use tracing::instrument;

use super::config::{BackendKind, PreferenceConfig};
use super::multi::MultiObjectStore;
use super::single::SingleObjectStore;
use super::traits::PreferenceStore;
use crate::storage::ObjectStoreBackend;

/// Pick the preference store implementation for `kind` on top of `backend`.
pub fn build_store(kind: BackendKind, backend: Arc<ObjectStoreBackend>) -> Arc<dyn PreferenceStore> {
    match kind {
        BackendKind::Single => Arc::new(SingleObjectStore::new(backend)),
        BackendKind::Multi => Arc::new(MultiObjectStore::new(backend)),
    }
}

/// The `userpreference` resource as seen by an API router.
///
/// The router resolves the calling user and passes it in as `owner`.
#[derive(Clone)]
pub struct PreferenceResource {
    store: Arc<dyn PreferenceStore>,
}

impl PreferenceResource {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn from_config(config: PreferenceConfig) -> Result<Self> {
        let backend = Arc::new(ObjectStoreBackend::from_config(config.storage)?);
        Ok(Self::new(build_store(config.backend, backend)))
    }

    pub fn kind(&self) -> BackendKind {
        self.store.kind()
    }

    #[instrument(skip(self))]
    pub async fn by_id(&self, owner: &Owner) -> Result<ResourceObject> {
        Ok(self.store.read(owner).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list(&self, owner: &Owner) -> Result<ResourceCollection> {
        let objects = self
            .store
            .list(owner)
            .await?
            .into_iter()
            .map(ResourceObject::from)
            .collect();

        Ok(ResourceCollection { objects })
    }

    #[instrument(skip(self, entries))]
    pub async fn update(&self, owner: &Owner, entries: Entries) -> Result<ResourceObject> {
        Ok(self.store.update(owner, entries).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, owner: &Owner) -> Result<()> {
        self.store.delete(owner).await
    }
}
