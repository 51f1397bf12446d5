//! # Avatar Blob Store
//!
//! A sandboxed, content-addressed blob directory used to persist rendered avatar
//! bitmaps between application launches.
//!
//! Blobs are addressed by an opaque, filename-safe key (typically the hex SHA-256
//! digest of a cache key). Keys are sharded into two levels of subdirectories so a
//! single directory never accumulates hundreds of thousands of entries.
//!
//! ## Features
//!
//! - **Sandboxed Operations**: every path is derived from a validated key and must
//!   resolve inside the base directory
//! - **Atomic Writes**: blobs are written to a partial file and renamed into place
//! - **Magic Number Detection**: optional content sniffing (via the `infer` crate) so
//!   a corrupt or foreign file is never handed back as a bitmap
//! - **No Eviction**: capacity is managed outside this crate; blobs live until removed
//!
//! ## Basic Usage
//!
//! ```rust
//! use avatar_blob_store::BlobStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = BlobStore::builder()
//!     .base_directory("/var/cache/avatars")
//!     .allow_mime_type("image/png")
//!     .build()
//!     .await?;
//!
//! let png_bytes: Vec<u8> = Vec::new();
//! store.write("3f5a9c", &png_bytes).await?;
//! let maybe_bytes = store.read("3f5a9c").await?;
//! # let _ = maybe_bytes;
//! # Ok(())
//! # }
//! ```
//!
//! ## Layout
//!
//! Given base `/var/cache/avatars`, the key `3f5a9c...` is stored at
//! `/var/cache/avatars/3f/5a/3f5a9c...`.

pub mod error;
pub mod file_types;
pub mod security;
pub mod store;

pub use error::{BlobStoreError, Result};
pub use file_types::{BlobSniffer, DetectedType};
pub use store::{BlobStore, BlobStoreBuilder, BlobStoreStats};
