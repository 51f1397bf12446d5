//! Two-tier, content-addressed avatar cache
//!
//! Requests are first mapped to the content they display today, then content is
//! mapped to rendered bitmaps:
//!
//! - identity tokens stand in for contact addresses inside request fingerprints
//! - a request LRU memoizes request → content, cleared on broad signals
//! - an image LRU plus a disk store memoize content → bitmap
//! - a durable ledger lets a secondary process find bitmaps without resolving content

pub mod identity;
pub mod image_cache;
pub mod ledger;
pub mod request_cache;
pub mod secondary;
pub mod service;

pub use identity::IdentityTokenCache;
pub use image_cache::{ImageCache, ImageCacheCounters, disk_key, image_key};
pub use ledger::{FingerprintLedger, ledger_key};
pub use request_cache::RequestContentCache;
pub use secondary::SecondaryAvatarService;
pub use service::{AvatarCacheStats, AvatarCollaborators, AvatarService};
