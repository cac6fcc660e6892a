use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Resource type name under which preference sets are exposed
pub const PREFERENCE_TYPE: &str = "userpreference";

/// Flat preference map, keyed by preference name
pub type Entries = BTreeMap<String, String>;

/// Identity of the user a preference set belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Owner {
    pub name: String,
}

impl Owner {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// All preferences stored for one owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreferenceSet {
    pub owner: Owner,
    pub entries: Entries,
}

impl PreferenceSet {
    /// An owner that never wrote anything still has a (blank) set
    pub fn empty(owner: Owner) -> Self {
        Self {
            owner,
            entries: Entries::new(),
        }
    }

    pub fn new(owner: Owner, entries: Entries) -> Self {
        Self { owner, entries }
    }
}

/// A preference set as presented by the resource API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub data: Entries,
}

impl From<PreferenceSet> for ResourceObject {
    fn from(set: PreferenceSet) -> Self {
        Self {
            kind: PREFERENCE_TYPE.to_string(),
            id: set.owner.name,
            data: set.entries,
        }
    }
}

/// List response; for preferences this always holds the caller's own set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceCollection {
    pub objects: Vec<ResourceObject>,
}
