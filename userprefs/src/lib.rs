//! User preference storage.
//!
//! Preferences are a flat string map per owner, kept either as one container
//! per owner (`BackendKind::Single`) or as one record per key in a per-owner
//! scope (`BackendKind::Multi`). [`preferences::PreferenceResource`] exposes
//! them in the shape of the `userpreference` API resource.

pub mod preferences;
pub mod storage;
