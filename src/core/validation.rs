//! Input validation for envseal operations.
//!
//! Validates secret names, roster aliases and identity file permissions.

use crate::core::constants::{METADATA_KEY, SECRETS_KEY};
use crate::error::{Result, ValidationError};

/// Longest accepted roster alias.
const MAX_ALIAS_LEN: usize = 64;

/// Normalize a secret name for lookup or removal.
///
/// Trims surrounding whitespace and rejects empty and reserved names.
///
/// # Errors
///
/// Returns `ValidationError::EmptyKey` or `ValidationError::ReservedName`.
pub fn normalize_key(key: &str) -> Result<&str> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }
    if is_reserved(key) {
        return Err(ValidationError::ReservedName(key.to_string()).into());
    }
    Ok(key)
}

/// Whether `key` collides with a reserved document key.
pub fn is_reserved(key: &str) -> bool {
    key == METADATA_KEY || key == SECRETS_KEY
}

/// Validate a secret name for writing.
///
/// On top of [`normalize_key`], names must be valid environment variable
/// names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<&str> {
    let key = normalize_key(key)?;

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: "cannot start with a digit".to_string(),
        }
        .into());
    }

    if let Some((i, ch)) = key
        .chars()
        .enumerate()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
    {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: format!(
                "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
                ch,
                i + 1
            ),
        }
        .into());
    }

    Ok(key)
}

/// Check a roster alias: letters, numbers, `_`, `.`, `-`; 2 to 64 chars;
/// must start with a letter or number.
pub fn is_valid_alias(alias: &str) -> bool {
    let mut chars = alias.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (2..=MAX_ALIAS_LEN).contains(&alias.len())
        && first.is_ascii_alphanumeric()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Validate file permissions (Unix only).
///
/// # Errors
///
/// Returns `ValidationError::InvalidPermissions` if the mode differs from
/// `expected_mode`.
#[cfg(unix)]
pub fn validate_file_permissions(path: &std::path::Path, expected_mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let actual_mode = metadata.permissions().mode() & 0o777;

    if actual_mode != expected_mode {
        return Err(ValidationError::InvalidPermissions {
            path: path.display().to_string(),
            expected: format!("{:o}", expected_mode),
            actual: format!("{:o}", actual_mode),
        }
        .into());
    }

    Ok(())
}
