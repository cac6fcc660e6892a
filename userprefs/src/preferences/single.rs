use anyhow::Result;
use async_trait::async_trait;
use shared_types::{Entries, Owner, PreferenceSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::BackendKind;
use super::naming::scope_for;
use super::traits::PreferenceStore;
use crate::storage::{Container, ContainerClient};

/// Keeps an owner's whole preference map in one container.
///
/// Updates overwrite the payload wholesale; there is no per-key diff. Two
/// concurrent writers for the same owner race on get-then-put and the last
/// one wins.
pub struct SingleObjectStore {
    client: Arc<dyn ContainerClient>,
}

impl SingleObjectStore {
    pub fn new(client: Arc<dyn ContainerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PreferenceStore for SingleObjectStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Single
    }

    #[instrument(skip(self))]
    async fn read(&self, owner: &Owner) -> Result<PreferenceSet> {
        let name = scope_for(owner)?;

        let set = match self.client.get(name).await? {
            Some(container) => PreferenceSet::new(owner.clone(), container.data),
            None => PreferenceSet::empty(owner.clone()),
        };

        debug!("Read {} preferences for {}", set.entries.len(), owner);
        Ok(set)
    }

    #[instrument(skip(self, entries))]
    async fn update(&self, owner: &Owner, entries: Entries) -> Result<PreferenceSet> {
        let name = scope_for(owner)?;

        match self.client.get(name).await? {
            None => {
                let count = entries.len();
                self.client.create(&Container::new(name, entries)).await?;
                info!("Created preference container for {} ({} keys)", owner, count);
            }
            Some(mut container) => {
                container.replace_data(entries);
                self.client.update(&container).await?;
                info!(
                    "Replaced preference container for {} ({} keys)",
                    owner,
                    container.data.len()
                );
            }
        }

        self.read(owner).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner: &Owner) -> Result<()> {
        let name = scope_for(owner)?;
        self.client.delete(name).await?;
        info!("Deleted preference container for {}", owner);
        Ok(())
    }
}
