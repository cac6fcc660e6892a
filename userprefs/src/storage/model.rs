use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::Entries;

/// One persisted blob holding a whole key/value map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Container {
    pub name: String,
    pub data: Entries,
    pub updated_at: DateTime<Utc>,
}

/// One persisted key/value pair inside a scope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl Container {
    pub fn new(name: impl Into<String>, data: Entries) -> Self {
        Self {
            name: name.into(),
            data,
            updated_at: Utc::now(),
        }
    }

    /// Replace the payload wholesale
    pub fn replace_data(&mut self, data: Entries) {
        self.data = data;
        self.updated_at = Utc::now();
    }
}

impl Record {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}
