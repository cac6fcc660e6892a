use shared_types::Owner;

use super::error::PreferenceError;

/// Name of the container (single-object backend) or scope (multi-object
/// backend) holding `owner`'s preferences.
///
/// Owner names are used as-is so existing data stays addressable; only names
/// that cannot identify a user are rejected.
pub(crate) fn scope_for(owner: &Owner) -> Result<&str, PreferenceError> {
    let name = owner.name.as_str();
    if name.trim().is_empty() || name.contains('/') || name.chars().any(char::is_control) {
        return Err(PreferenceError::InvalidOwner(owner.name.clone()));
    }
    Ok(name)
}
