use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PreferenceError;
use crate::storage::StorageConfig;

/// Which preference backend serves the `userpreference` resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Whole map in one container per owner, overwritten on every update
    Single,
    /// One record per key in a per-owner scope, reconciled by diff
    #[default]
    Multi,
}

impl FromStr for BackendKind {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(PreferenceError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceConfig {
    pub backend: BackendKind,
    pub storage: StorageConfig,
}

impl PreferenceConfig {
    pub fn new(backend: BackendKind, storage: StorageConfig) -> Self {
        Self { backend, storage }
    }

    /// `PREFERENCE_BACKEND` (default `multi`) plus the storage settings.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("PREFERENCE_BACKEND") {
            Some(value) => value.parse()?,
            None => BackendKind::default(),
        };

        Ok(Self::new(backend, StorageConfig::from_lookup(lookup)?))
    }
}
