use anyhow::Result;
use async_trait::async_trait;
use shared_types::{Entries, Owner, PreferenceSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::BackendKind;
use super::naming::scope_for;
use super::traits::PreferenceStore;
use crate::storage::{Record, RecordClient, StorageError};

/// A single mutating call against the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Update { name: String, value: String },
    Delete { name: String },
    Create { name: String, value: String },
}

impl Change {
    /// Record the change applies to
    pub fn name(&self) -> &str {
        match self {
            Self::Update { name, .. } | Self::Delete { name } | Self::Create { name, .. } => name,
        }
    }
}

/// Ordered set of changes that turns the stored records into a desired map.
///
/// Existing records come first (updates and deletes, in listing order),
/// followed by creations for keys that had no record. Unchanged keys produce
/// no change at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    changes: Vec<Change>,
}

impl ReconcilePlan {
    pub fn compute(existing: &[Record], desired: &Entries) -> Self {
        let mut remaining = desired.clone();
        let mut changes = Vec::new();

        for record in existing {
            match remaining.remove(&record.name) {
                Some(value) if value != record.value => changes.push(Change::Update {
                    name: record.name.clone(),
                    value,
                }),
                Some(_) => {}
                None => changes.push(Change::Delete {
                    name: record.name.clone(),
                }),
            }
        }

        changes.extend(
            remaining
                .into_iter()
                .map(|(name, value)| Change::Create { name, value }),
        );

        Self { changes }
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of record mutations, scope creation not included.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn updates(&self) -> usize {
        self.count(|c| matches!(c, Change::Update { .. }))
    }

    pub fn deletions(&self) -> usize {
        self.count(|c| matches!(c, Change::Delete { .. }))
    }

    pub fn insertions(&self) -> usize {
        self.count(|c| matches!(c, Change::Create { .. }))
    }

    fn count(&self, pred: impl Fn(&Change) -> bool) -> usize {
        self.changes.iter().filter(|c| pred(c)).count()
    }
}

/// Keeps each preference as its own record in a per-owner scope.
///
/// `update` diffs the stored records against the desired map and only
/// touches keys that were added, removed or changed. The scope is created on
/// the first insertion, so owners that never stored anything leave nothing
/// behind.
pub struct MultiObjectStore {
    client: Arc<dyn RecordClient>,
}

impl MultiObjectStore {
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self { client }
    }

    async fn ensure_scope(&self, scope: &str) -> Result<()> {
        if self.client.scope_exists(scope).await? {
            return Ok(());
        }

        match self.client.create_scope(scope).await {
            Ok(()) => Ok(()),
            // Another writer created it between the check and the create
            Err(e)
                if matches!(
                    e.downcast_ref::<StorageError>(),
                    Some(StorageError::AlreadyExists(_))
                ) =>
            {
                debug!("Scope {} appeared concurrently", scope);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Stops at the first failing call; earlier changes stay applied.
    ///
    /// Every record name is checked before the first call, so a name the
    /// store would reject leaves the scope untouched.
    async fn apply(&self, scope: &str, plan: &ReconcilePlan, scope_exists: bool) -> Result<()> {
        for change in plan.changes() {
            self.client.validate_record_name(change.name())?;
        }

        let mut scope_ready = scope_exists;

        for change in plan.changes() {
            match change {
                Change::Update { name, value } => {
                    self.client
                        .update_record(scope, &Record::new(name.as_str(), value.as_str()))
                        .await?;
                }
                Change::Delete { name } => {
                    self.client.delete_record(scope, name).await?;
                }
                Change::Create { name, value } => {
                    if !scope_ready {
                        self.ensure_scope(scope).await?;
                        scope_ready = true;
                    }
                    self.client
                        .create_record(scope, &Record::new(name.as_str(), value.as_str()))
                        .await?;
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for MultiObjectStore {
    fn kind(&self) -> BackendKind {
        BackendKind::Multi
    }

    #[instrument(skip(self))]
    async fn read(&self, owner: &Owner) -> Result<PreferenceSet> {
        let scope = scope_for(owner)?;

        let entries: Entries = self
            .client
            .list_records(scope)
            .await?
            .into_iter()
            .map(|record| (record.name, record.value))
            .collect();

        debug!("Read {} preferences for {}", entries.len(), owner);
        Ok(PreferenceSet::new(owner.clone(), entries))
    }

    #[instrument(skip(self, desired))]
    async fn update(&self, owner: &Owner, desired: Entries) -> Result<PreferenceSet> {
        let scope = scope_for(owner)?;

        let existing = self.client.list_records(scope).await?;
        let plan = ReconcilePlan::compute(&existing, &desired);

        if plan.is_empty() {
            debug!("Preferences for {} already up to date", owner);
        } else {
            // Records were listed, so their scope exists.
            self.apply(scope, &plan, !existing.is_empty()).await?;
            info!(
                updated = plan.updates(),
                deleted = plan.deletions(),
                created = plan.insertions(),
                "Reconciled preferences for {}",
                owner
            );
        }

        self.read(owner).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, owner: &Owner) -> Result<()> {
        let scope = scope_for(owner)?;
        self.client.delete_scope(scope).await?;
        info!("Deleted preference scope for {}", owner);
        Ok(())
    }
}
