use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where preference objects are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageConfig {
    /// Directory on the local filesystem, created if missing
    Local { path: PathBuf },
    /// S3 bucket, or any S3-compatible endpoint such as MinIO
    S3 {
        bucket: String,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    },
    /// Process-local store, contents are lost on exit
    Memory,
}

impl StorageConfig {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::Local { path: path.into() }
    }

    pub fn s3(
        bucket: impl Into<String>,
        region: Option<String>,
        endpoint: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        allow_http: bool,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            allow_http,
        }
    }

    pub fn memory() -> Self {
        Self::Memory
    }

    /// Reads `STORAGE_BACKEND` (`local`, `s3` or `memory`) and the settings
    /// of the chosen backend from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with variables resolved through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());

        match backend.as_str() {
            "local" => Ok(Self::local(
                lookup("STORAGE_PATH").unwrap_or_else(|| "./data".to_string()),
            )),
            "s3" => {
                let bucket =
                    lookup("AWS_BUCKET").context("AWS_BUCKET is required for S3 backend")?;
                let allow_http = match lookup("AWS_ALLOW_HTTP") {
                    Some(value) => value
                        .parse::<bool>()
                        .with_context(|| format!("AWS_ALLOW_HTTP must be true or false, got {value:?}"))?,
                    None => false,
                };

                Ok(Self::s3(
                    bucket,
                    lookup("AWS_REGION"),
                    lookup("AWS_ENDPOINT"),
                    lookup("AWS_ACCESS_KEY_ID"),
                    lookup("AWS_SECRET_ACCESS_KEY"),
                    allow_http,
                ))
            }
            "memory" => Ok(Self::memory()),
            other => bail!("Unknown storage backend: {other}. Must be 'local', 's3' or 'memory'"),
        }
    }
}
