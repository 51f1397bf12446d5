//! Content sniffing using magic number detection
//!
//! Blob content is classified solely by its leading bytes (via the `infer` crate),
//! never by a filename, since blob names are opaque digests.

use crate::error::{BlobStoreError, Result};
use std::collections::HashSet;

/// Configurable allow-list of MIME types checked against blob content
#[derive(Debug, Clone, Default)]
pub struct BlobSniffer {
    /// Set of allowed MIME types (empty means allow all)
    allowed_mime_types: HashSet<String>,
}

impl BlobSniffer {
    /// Create a sniffer that accepts any content
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow an additional MIME type
    #[must_use]
    pub fn allow(mut self, mime_type: impl Into<String>) -> Self {
        self.allowed_mime_types.insert(mime_type.into());
        self
    }

    /// Whether any restriction is configured
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.allowed_mime_types.is_empty()
    }

    /// Check if a MIME type is allowed (empty set means allow all)
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.is_empty() || self.allowed_mime_types.contains(mime_type)
    }

    /// Classify content and check it against the allow-list.
    ///
    /// An unrestricted sniffer accepts unknown content; a restricted one rejects it.
    ///
    /// # Errors
    /// Returns an error if the detected MIME type is not allowed, or if the content
    /// cannot be classified while a restriction is configured.
    pub fn check(&self, content: &[u8]) -> Result<Option<DetectedType>> {
        match infer::get(content) {
            Some(kind) => {
                let mime_type = kind.mime_type();
                if self.is_mime_type_allowed(mime_type) {
                    Ok(Some(DetectedType {
                        mime_type: mime_type.to_string(),
                        extension: kind.extension().to_string(),
                    }))
                } else {
                    Err(BlobStoreError::UnsupportedContentType {
                        content_type: mime_type.to_string(),
                    })
                }
            }
            None if self.is_restricted() => Err(BlobStoreError::UnsupportedContentType {
                content_type: "unknown".to_string(),
            }),
            None => Ok(None),
        }
    }
}

/// Information about detected blob content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedType {
    /// MIME type of the content
    pub mime_type: String,
    /// Conventional extension for this content type
    pub extension: String,
}
