//! Blob store errors.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, BlobStoreError>;

#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key is not a lowercase `[a-z0-9_-]` token of a safe length
    #[error("Invalid blob key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// A resolved blob path escaped the base directory
    #[error("Blob path {path:?} rejected: {reason}")]
    PathValidation { path: PathBuf, reason: String },

    /// Sniffed blob content is not on the allow-list
    #[error("Blob content type {content_type} is not allowed")]
    UnsupportedContentType { content_type: String },

    #[error("Failed to create shard directory {path:?}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Permission denied: {operation} on {path:?}")]
    Permission { operation: String, path: PathBuf },

    #[error("Blob store misconfigured: {message}")]
    Configuration { message: String },
}
