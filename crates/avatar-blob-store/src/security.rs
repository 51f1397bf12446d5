//! Security utilities for key validation and sandboxing.

use crate::error::{BlobStoreError, Result};
use std::path::Path;

/// Longest key accepted. SHA-512 hex digests are 128 characters.
pub const MAX_KEY_LENGTH: usize = 128;

/// Sets secure permissions on a directory (Unix only).
pub async fn set_secure_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o700);
        tokio::fs::set_permissions(path, perms)
            .await
            .map_err(|_e| BlobStoreError::Permission {
                operation: "set secure permissions".to_string(),
                path: path.to_path_buf(),
            })?;
    }

    #[cfg(not(unix))]
    {
        if !path.exists() {
            return Err(BlobStoreError::PathValidation {
                path: path.to_path_buf(),
                reason: "Directory does not exist".to_string(),
            });
        }
    }

    Ok(())
}

/// Validates that a blob key is filename-safe.
///
/// Only lowercase ASCII alphanumerics, `-` and `_` are accepted, which rules out
/// separators, `..`, null bytes and anything the platform could reinterpret.
pub fn validate_blob_key(key: &str) -> Result<()> {
    let reject = |reason: &str| {
        Err(BlobStoreError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        })
    };

    if key.len() < 4 {
        return reject("Key must be at least 4 characters");
    }
    if key.len() > MAX_KEY_LENGTH {
        return reject("Key is too long");
    }
    if !key
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
    {
        return reject("Key may only contain [a-z0-9_-]");
    }

    Ok(())
}

/// Validates that a path lies under the sandbox base without touching the filesystem.
pub fn validate_path_within_base(path: &Path, base: &Path) -> Result<()> {
    if !path.starts_with(base) {
        return Err(BlobStoreError::PathValidation {
            path: path.to_path_buf(),
            reason: format!("Path escapes sandbox '{}'", base.display()),
        });
    }
    Ok(())
}
