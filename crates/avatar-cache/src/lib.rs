//! # Avatar Cache
//!
//! Renders and caches small avatar bitmaps for a messaging client. Requests are
//! resolved to content descriptors, and content is rendered once per fingerprint
//! and kept in a memory LRU and a sharded on-disk PNG store. Upstream state
//! changes invalidate cheaply by rotating identity tokens or clearing the request
//! tier, never by scanning cached bitmaps.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use avatar_cache::{
//!     config::CacheConfig,
//!     models::{AvatarSubject, DisplayParams},
//!     rendering::BasicRenderer,
//!     services::{AvatarCollaborators, AvatarService, StateSnapshot},
//!     storage::{MemoryBitmapStore, MemoryKeyValueStore},
//! };
//!
//! # async fn example() -> avatar_cache::errors::AvatarResult<()> {
//! let state = Arc::new(StateSnapshot::default());
//! let mut service = AvatarService::new(
//!     &CacheConfig::default(),
//!     AvatarCollaborators {
//!         policy: state.clone(),
//!         profile: state,
//!         renderer: Arc::new(BasicRenderer::new()),
//!         bitmaps: Arc::new(MemoryBitmapStore::new()),
//!         ledger_store: Arc::new(MemoryKeyValueStore::new()),
//!     },
//! )?;
//!
//! let subject = AvatarSubject::Contact("+14155550123".to_string());
//! let avatar = service.avatar(&subject, &DisplayParams::new(48.0, 2.0)).await;
//! # let _ = avatar;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod rendering;
pub mod services;
pub mod storage;
pub mod utils;
