//! Collaborator trait definitions
//!
//! The avatar cache reads application state and persists results only through
//! these traits. Policy and profile lookups are synchronous snapshots; the two
//! stores are async because they sit on disk.

use async_trait::async_trait;
use bytes::Bytes;
use image::RgbaImage;

use crate::{
    errors::{LedgerResult, StorageResult},
    models::{Address, NameComponents, SubjectIdentity, ThemeId},
};

/// Read-only presentation policy for a subject
pub trait PolicySource: Send + Sync {
    /// Whether the subject's avatar must be replaced by a gradient
    fn should_blur(&self, subject: &SubjectIdentity) -> bool;

    fn display_theme(&self, subject: &SubjectIdentity) -> ThemeId;

    /// Display name used to derive initials
    fn display_name(&self, subject: &SubjectIdentity) -> NameComponents;
}

/// Read-only profile data
pub trait ProfileSource: Send + Sync {
    /// Encoded profile or system-contact photo for an address
    fn contact_photo(&self, address: &Address) -> Option<Bytes>;

    /// Address of the local user, when registered
    fn local_address(&self) -> Option<Address>;
}

/// Durable string key-value store backing the fingerprint ledger
///
/// # Examples
///
/// ```rust
/// use avatar_cache::services::traits::KeyValueStore;
/// use avatar_cache::storage::MemoryKeyValueStore;
///
/// # tokio_test::block_on(async {
/// let store = MemoryKeyValueStore::new();
/// store.set("avatar_fingerprint.+14155550123", "text:\"JD\":\"default\"").await.unwrap();
/// assert!(store.get("avatar_fingerprint.+14155550123").await.unwrap().is_some());
/// # });
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> LedgerResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> LedgerResult<()>;
}

/// Disk tier of the image cache, addressed by digest keys
#[async_trait]
pub trait BitmapStore: Send + Sync {
    /// Read a bitmap; `Ok(None)` when nothing is stored under the key
    async fn read_bitmap(&self, key: &str) -> StorageResult<Option<RgbaImage>>;

    /// Store a bitmap, replacing any previous one
    async fn write_bitmap(&self, key: &str, bitmap: &RgbaImage) -> StorageResult<()>;
}
