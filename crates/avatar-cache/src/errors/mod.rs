//! Centralized error handling for the avatar cache
//!
//! Every failure in this crate degrades to "no avatar" at the service boundary;
//! these types exist so the lower layers can report *why* before the service
//! logs the failure and moves on.
//!
//! # Error Categories
//!
//! - **Render Errors**: undecodable bytes, unrenderable text, contract violations
//! - **Storage Errors**: disk blob reads/writes and PNG encoding
//! - **Ledger Errors**: the durable key-value store behind the fingerprint ledger
//! - **Configuration Errors**: invalid capacities or display parameters
//!
//! # Usage
//!
//! ```rust
//! use avatar_cache::errors::{AvatarError, AvatarResult};
//!
//! fn example_function() -> AvatarResult<u32> {
//!     Err(AvatarError::configuration("request cache capacity must be non-zero"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AvatarError
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Convenience type alias for renderer Results
pub type RenderResult<T> = Result<T, RenderError>;

/// Convenience type alias for disk store Results
pub type StorageResult<T> = Result<T, StorageError>;

/// Convenience type alias for ledger store Results
pub type LedgerResult<T> = Result<T, LedgerError>;
