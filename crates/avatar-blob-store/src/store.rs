//! Core sandboxed blob store implementation.

use crate::{
    error::{BlobStoreError, Result},
    file_types::BlobSniffer,
    security::{set_secure_permissions, validate_blob_key, validate_path_within_base},
};

use serde::Serialize;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::fs;

static PARTIAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Statistics about stored blobs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlobStoreStats {
    pub total_blobs: usize,
    pub total_size_bytes: u64,
    pub base_directory: PathBuf,
}

/// Sandboxed, sharded blob directory.
#[derive(Clone, Debug)]
pub struct BlobStore {
    base_dir: PathBuf,
    sniffer: BlobSniffer,
}

impl BlobStore {
    /// Create a new builder for configuring the store.
    #[must_use]
    pub fn builder() -> BlobStoreBuilder {
        BlobStoreBuilder::new()
    }

    /// Base directory of the store.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_dir
    }

    /// Write a blob, replacing any previous blob stored under the same key.
    ///
    /// The write goes to a partial file next to the target and is renamed into place,
    /// so readers never observe a truncated blob.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The key is invalid
    /// - The content is rejected by the configured sniffer
    /// - The underlying write or rename fails
    pub async fn write<K: AsRef<str>, C: AsRef<[u8]>>(&self, key: K, contents: C) -> Result<()> {
        let key = key.as_ref();
        let contents = contents.as_ref();
        let blob_path = self.blob_path(key)?;

        self.sniffer.check(contents)?;

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::DirectoryCreation {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let partial_path = blob_path.with_extension(format!(
            "partial-{}-{}",
            std::process::id(),
            PARTIAL_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&partial_path, contents).await?;
        if let Err(e) = fs::rename(&partial_path, &blob_path).await {
            let _ = fs::remove_file(&partial_path).await;
            return Err(e.into());
        }

        tracing::trace!("Stored blob {} ({} bytes)", key, contents.len());
        Ok(())
    }

    /// Read a blob. Returns `Ok(None)` when no blob exists for the key.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The key is invalid
    /// - The file exists but cannot be read
    /// - The content is rejected by the configured sniffer
    pub async fn read<K: AsRef<str>>(&self, key: K) -> Result<Option<Vec<u8>>> {
        let key = key.as_ref();
        let blob_path = self.blob_path(key)?;

        match fs::read(&blob_path).await {
            Ok(content) => {
                self.sniffer.check(&content)?;
                Ok(Some(content))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a blob exists.
    ///
    /// # Errors
    /// Returns an error if the key is invalid.
    pub async fn exists<K: AsRef<str>>(&self, key: K) -> Result<bool> {
        let blob_path = self.blob_path(key.as_ref())?;
        Ok(fs::try_exists(&blob_path).await.unwrap_or(false))
    }

    /// Remove a blob. Removing a missing blob is not an error.
    ///
    /// Returns whether a blob was removed.
    ///
    /// # Errors
    /// Returns an error if the key is invalid or the removal fails.
    pub async fn remove<K: AsRef<str>>(&self, key: K) -> Result<bool> {
        let blob_path = self.blob_path(key.as_ref())?;
        match fs::remove_file(&blob_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Walk the store and report blob count and total size.
    ///
    /// # Errors
    /// Returns an error if a shard directory cannot be listed.
    pub async fn stats(&self) -> Result<BlobStoreStats> {
        let mut total_blobs = 0;
        let mut total_size_bytes = 0;
        let mut pending = vec![self.base_dir.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else if file_type.is_file() && !is_partial(&entry.path()) {
                    total_blobs += 1;
                    total_size_bytes += entry.metadata().await?.len();
                }
            }
        }

        Ok(BlobStoreStats {
            total_blobs,
            total_size_bytes,
            base_directory: self.base_dir.clone(),
        })
    }

    /// Resolve the sharded on-disk path for a key.
    ///
    /// # Errors
    /// Returns an error if the key is invalid.
    pub fn blob_path(&self, key: &str) -> Result<PathBuf> {
        validate_blob_key(key)?;
        let path = self.base_dir.join(&key[0..2]).join(&key[2..4]).join(key);
        validate_path_within_base(&path, &self.base_dir)?;
        Ok(path)
    }
}

fn is_partial(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.starts_with("partial-"))
}

/// Builder for configuring a `BlobStore`.
#[derive(Debug, Default)]
pub struct BlobStoreBuilder {
    base_directory: Option<PathBuf>,
    sniffer: BlobSniffer,
}

impl BlobStoreBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the base directory for blob storage.
    #[must_use]
    pub fn base_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.base_directory = Some(path.into());
        self
    }

    /// Only accept blobs whose content sniffs as this MIME type (may be repeated).
    #[must_use]
    pub fn allow_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.sniffer = self.sniffer.allow(mime_type);
        self
    }

    /// Build the `BlobStore`.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Base directory is not set
    /// - Base directory cannot be created or secured
    pub async fn build(self) -> Result<BlobStore> {
        let base_dir = self
            .base_directory
            .ok_or_else(|| BlobStoreError::Configuration {
                message: "Base directory is required".to_string(),
            })?;

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| BlobStoreError::DirectoryCreation {
                path: base_dir.clone(),
                source: e,
            })?;

        set_secure_permissions(&base_dir).await?;

        tracing::info!(
            "BlobStore initialized - base_dir: {:?}, content restricted: {}",
            base_dir,
            self.sniffer.is_restricted()
        );

        Ok(BlobStore {
            base_dir,
            sniffer: self.sniffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[tokio::test]
    async fn test_store_and_retrieve_blob() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        store.write("abcdef0123", b"hello blob").await?;
        assert_eq!(store.read("abcdef0123").await?, Some(b"hello blob".to_vec()));
        assert!(store.exists("abcdef0123").await?);

        // Sharded layout
        assert!(temp_dir.path().join("ab/cd/abcdef0123").is_file());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_blob_is_none() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        assert_eq!(store.read("ffff0000").await?, None);
        assert!(!store.exists("ffff0000").await?);
        assert!(!store.remove("ffff0000").await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_and_remove() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        store.write("0011aabb", b"first").await?;
        store.write("0011aabb", b"second").await?;
        assert_eq!(store.read("0011aabb").await?, Some(b"second".to_vec()));

        assert!(store.remove("0011aabb").await?);
        assert_eq!(store.read("0011aabb").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_invalid_keys() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        assert!(matches!(
            store.write("../../etc/passwd", b"evil").await,
            Err(BlobStoreError::InvalidKey { .. })
        ));
        assert!(store.read("/abs/path").await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_content_restriction() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .allow_mime_type("image/png")
            .build()
            .await?;

        store.write("aaaa1111", PNG_SIGNATURE).await?;
        assert!(store.write("bbbb2222", b"not a png").await.is_err());

        // A foreign file planted under a valid key is rejected on read
        let planted = store.blob_path("cccc3333")?;
        std::fs::create_dir_all(planted.parent().ok_or("no parent")?)?;
        std::fs::write(&planted, b"garbage")?;
        assert!(matches!(
            store.read("cccc3333").await,
            Err(BlobStoreError::UnsupportedContentType { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_stats() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let store = BlobStore::builder()
            .base_directory(temp_dir.path())
            .build()
            .await?;

        store.write("aaaa0001", b"12345").await?;
        store.write("bbbb0002", b"123").await?;

        let stats = store.stats().await?;
        assert_eq!(stats.total_blobs, 2);
        assert_eq!(stats.total_size_bytes, 8);
        assert_eq!(stats.base_directory, temp_dir.path());
        Ok(())
    }

    #[tokio::test]
    async fn test_builder_requires_base_directory() {
        let result = BlobStore::builder().build().await;
        assert!(matches!(result, Err(BlobStoreError::Configuration { .. })));
    }
}
