//! Name validation for externally supplied identifiers.
//!
//! User, game, and plan names become path components under the data root,
//! so the character set is restricted to ASCII alphanumerics and
//! underscores. This doubles as the path-traversal guard: a valid name can
//! never escape its directory.

use crate::error::StoreError;

/// Check that a user/game/plan name is non-empty and consists only of
/// ASCII alphanumeric characters or underscores.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] otherwise.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::InvalidName(String::from(
            "name must not be empty",
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::InvalidName(format!(
            "name must consist of only alphanumeric characters or underscores (was '{name}')"
        )));
    }
    Ok(())
}

/// Check that a plan file name is a valid name plus a `.json` extension.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] otherwise.
pub fn validate_plan_filename(filename: &str) -> Result<(), StoreError> {
    let Some(stem) = filename.strip_suffix(".json") else {
        return Err(StoreError::InvalidName(format!(
            "plan file name must end in .json (was '{filename}')"
        )));
    };
    validate_name(stem)
}
