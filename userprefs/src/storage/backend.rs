use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::StorageConfig;
use super::error::StorageError;
use super::model::{Container, Record};
use super::traits::{ContainerClient, RecordClient};

/// Longest escaped name used as-is in a path; longer names are hashed.
const MAX_READABLE_SEGMENT: usize = 128;

/// Marker object whose presence means the scope exists
#[derive(Debug, Serialize)]
struct ScopeMarker {
    name: String,
    created_at: DateTime<Utc>,
}

/// Container and record store over any `object_store` implementation.
///
/// Names are encoded before they become path segments (see `encode_name`);
/// records carry their real name in the body. Layout:
/// - `containers/<name>.json`
/// - `scopes/<scope>/scope.json`
/// - `scopes/<scope>/records/<name>.json`
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    pub fn from_config(config: StorageConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config {
            StorageConfig::Local { path } => {
                info!("Initializing local storage at: {}", path.display());
                std::fs::create_dir_all(&path)?;
                Arc::new(LocalFileSystem::new_with_prefix(path)?)
            }
            StorageConfig::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
                allow_http,
            } => {
                info!("Initializing S3 storage in bucket: {}", bucket);
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(bucket)
                    .with_allow_http(allow_http);
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(access_key_id) = access_key_id {
                    builder = builder.with_access_key_id(access_key_id);
                }
                if let Some(secret_access_key) = secret_access_key {
                    builder = builder.with_secret_access_key(secret_access_key);
                }
                Arc::new(builder.build()?)
            }
            StorageConfig::Memory => {
                info!("Initializing in-memory storage");
                Arc::new(InMemory::new())
            }
        };

        Ok(Self { store })
    }

    /// Path-safe, injective form of a name: ASCII alphanumerics, `-` and `.`
    /// pass through, every other byte becomes `_xx`. When that exceeds
    /// `MAX_READABLE_SEGMENT` the segment is `_h` plus the SHA-256 of the name;
    /// escapes only ever put hex digits after `_`, so the two forms never meet.
    fn encode_name(name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(StorageError::InvalidName(name.to_string()).into());
        }

        let mut encoded = String::with_capacity(name.len());
        for byte in name.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
                encoded.push(char::from(byte));
            } else {
                encoded.push_str(&format!("_{byte:02x}"));
            }
        }

        if encoded.len() > MAX_READABLE_SEGMENT {
            let digest = Sha256::digest(name.as_bytes());
            return Ok(format!("_h{}", hex::encode(digest)));
        }
        Ok(encoded)
    }

    fn container_path(name: &str) -> Result<Path> {
        let name = Self::encode_name(name)?;
        Ok(Path::from("containers").child(format!("{name}.json")))
    }

    fn scope_root(scope: &str) -> Result<Path> {
        Ok(Path::from("scopes").child(Self::encode_name(scope)?))
    }

    fn scope_marker_path(scope: &str) -> Result<Path> {
        Ok(Self::scope_root(scope)?.child("scope.json"))
    }

    fn records_prefix(scope: &str) -> Result<Path> {
        Ok(Self::scope_root(scope)?.child("records"))
    }

    fn record_path(scope: &str, name: &str) -> Result<Path> {
        let name = Self::encode_name(name)?;
        Ok(Self::records_prefix(scope)?.child(format!("{name}.json")))
    }

    async fn read_json<T>(&self, path: &Path) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.store.get(path).await {
            Ok(result) => {
                let bytes = result.bytes().await?;
                Ok(Some(serde_json::from_slice(&bytes)?))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T>(&self, path: &Path, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let json = serde_json::to_vec_pretty(value)?;
        self.store.put(path, PutPayload::from(json)).await?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        match self.store.head(path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_if_present(&self, path: &Path) -> Result<()> {
        match self.store.delete(path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_locations(&self, prefix: &Path) -> Result<Vec<Path>> {
        let mut locations = Vec::new();
        let mut stream = self.store.list(Some(prefix));

        while let Some(meta) = stream.next().await.transpose()? {
            locations.push(meta.location);
        }

        Ok(locations)
    }
}

#[async_trait]
impl ContainerClient for ObjectStoreBackend {
    #[instrument(skip(self))]
    async fn get(&self, name: &str) -> Result<Option<Container>> {
        let path = Self::container_path(name)?;
        self.read_json(&path).await
    }

    #[instrument(skip(self, container), fields(name = %container.name))]
    async fn create(&self, container: &Container) -> Result<Container> {
        let path = Self::container_path(&container.name)?;
        if self.exists(&path).await? {
            return Err(StorageError::AlreadyExists(format!("container {}", container.name)).into());
        }

        self.write_json(&path, container).await?;
        debug!("Created container {}", container.name);
        Ok(container.clone())
    }

    #[instrument(skip(self, container), fields(name = %container.name))]
    async fn update(&self, container: &Container) -> Result<Container> {
        let path = Self::container_path(&container.name)?;
        if !self.exists(&path).await? {
            return Err(StorageError::NotFound(format!("container {}", container.name)).into());
        }

        self.write_json(&path, container).await?;
        debug!("Updated container {}", container.name);
        Ok(container.clone())
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<()> {
        let path = Self::container_path(name)?;
        self.delete_if_present(&path).await
    }
}

#[async_trait]
impl RecordClient for ObjectStoreBackend {
    fn validate_record_name(&self, name: &str) -> Result<()> {
        Self::encode_name(name).map(|_| ())
    }

    #[instrument(skip(self))]
    async fn scope_exists(&self, scope: &str) -> Result<bool> {
        let path = Self::scope_marker_path(scope)?;
        self.exists(&path).await
    }

    #[instrument(skip(self))]
    async fn create_scope(&self, scope: &str) -> Result<()> {
        let path = Self::scope_marker_path(scope)?;
        if self.exists(&path).await? {
            return Err(StorageError::AlreadyExists(format!("scope {scope}")).into());
        }

        let marker = ScopeMarker {
            name: scope.to_string(),
            created_at: Utc::now(),
        };
        self.write_json(&path, &marker).await?;
        info!("Created scope {}", scope);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_scope(&self, scope: &str) -> Result<()> {
        let marker = Self::scope_marker_path(scope)?;
        let locations = self.list_locations(&Self::scope_root(scope)?).await?;

        // Marker goes last so an interrupted delete still shows the scope.
        for location in locations.iter().filter(|l| **l != marker) {
            self.delete_if_present(location).await?;
        }
        self.delete_if_present(&marker).await?;

        debug!("Deleted scope {} ({} objects)", scope, locations.len());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_records(&self, scope: &str) -> Result<Vec<Record>> {
        let locations = self.list_locations(&Self::records_prefix(scope)?).await?;

        let mut records = Vec::with_capacity(locations.len());
        for location in locations {
            if !location
                .filename()
                .is_some_and(|name| name.ends_with(".json"))
            {
                continue;
            }
            // Deleted between list and get
            if let Some(record) = self.read_json::<Record>(&location).await? {
                records.push(record);
            }
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    async fn create_record(&self, scope: &str, record: &Record) -> Result<Record> {
        let path = Self::record_path(scope, &record.name)?;
        if !self.scope_exists(scope).await? {
            return Err(StorageError::NotFound(format!("scope {scope}")).into());
        }
        if self.exists(&path).await? {
            return Err(
                StorageError::AlreadyExists(format!("record {scope}/{}", record.name)).into(),
            );
        }

        self.write_json(&path, record).await?;
        debug!("Created record {}/{}", scope, record.name);
        Ok(record.clone())
    }

    #[instrument(skip(self, record), fields(name = %record.name))]
    async fn update_record(&self, scope: &str, record: &Record) -> Result<Record> {
        let path = Self::record_path(scope, &record.name)?;
        if !self.exists(&path).await? {
            return Err(StorageError::NotFound(format!("record {scope}/{}", record.name)).into());
        }

        self.write_json(&path, record).await?;
        debug!("Updated record {}/{}", scope, record.name);
        Ok(record.clone())
    }

    #[instrument(skip(self))]
    async fn delete_record(&self, scope: &str, name: &str) -> Result<()> {
        let path = Self::record_path(scope, name)?;
        self.delete_if_present(&path).await
    }
}
