//! Disk tier implementations of [`BitmapStore`]

use async_trait::async_trait;
use avatar_blob_store::BlobStore;
use image::RgbaImage;
use std::{collections::HashMap, path::PathBuf};
use tokio::sync::RwLock;

use crate::{
    errors::StorageResult,
    models::{decode_png, encode_png},
    services::traits::BitmapStore,
};

/// PNG blobs in a sandboxed, sharded directory
#[derive(Clone, Debug)]
pub struct SandboxedBitmapStore {
    blobs: BlobStore,
}

impl SandboxedBitmapStore {
    /// Open (creating if needed) a bitmap store rooted at `base_directory`
    pub async fn open(base_directory: impl Into<PathBuf>) -> StorageResult<Self> {
        let blobs = BlobStore::builder()
            .base_directory(base_directory)
            .allow_mime_type("image/png")
            .build()
            .await?;
        Ok(Self { blobs })
    }

    pub fn blob_store(&self) -> &BlobStore {
        &self.blobs
    }
}

#[async_trait]
impl BitmapStore for SandboxedBitmapStore {
    async fn read_bitmap(&self, key: &str) -> StorageResult<Option<RgbaImage>> {
        match self.blobs.read(key).await? {
            Some(png) => Ok(Some(decode_png(&png)?)),
            None => Ok(None),
        }
    }

    async fn write_bitmap(&self, key: &str, bitmap: &RgbaImage) -> StorageResult<()> {
        let png = encode_png(bitmap)?;
        self.blobs.write(key, png).await?;
        Ok(())
    }
}

/// Process-local bitmap store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryBitmapStore {
    bitmaps: RwLock<HashMap<String, RgbaImage>>,
}

impl MemoryBitmapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bitmaps.try_read().map(|bitmaps| bitmaps.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored bitmap
    pub async fn clear(&self) {
        self.bitmaps.write().await.clear();
    }
}

#[async_trait]
impl BitmapStore for MemoryBitmapStore {
    async fn read_bitmap(&self, key: &str) -> StorageResult<Option<RgbaImage>> {
        Ok(self.bitmaps.read().await.get(key).cloned())
    }

    async fn write_bitmap(&self, key: &str, bitmap: &RgbaImage) -> StorageResult<()> {
        self.bitmaps
            .write()
            .await
            .insert(key.to_string(), bitmap.clone());
        Ok(())
    }
}
