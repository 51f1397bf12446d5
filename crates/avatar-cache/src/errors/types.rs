//! Error type definitions for the avatar cache

use thiserror::Error;

/// Top-level error type
#[derive(Error, Debug)]
pub enum AvatarError {
    /// Rendering failures
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Disk store failures
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Fingerprint ledger failures
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Failures raised while turning content into a bitmap
#[derive(Error, Debug)]
pub enum RenderError {
    /// Image bytes could not be decoded
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// A file-backed image could not be read
    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    /// Text is empty after trimming
    #[error("Cannot render empty text")]
    EmptyText,

    /// Text contains a character the renderer has no glyph for
    #[error("Unsupported character {character:?} in {text:?}")]
    UnsupportedText { text: String, character: char },

    /// Text does not fit the requested diameter
    #[error("Text {text:?} does not fit a {diameter}px avatar")]
    TextTooLarge { text: String, diameter: u32 },

    /// Requested diameter is zero
    #[error("Invalid diameter: {diameter}")]
    InvalidDiameter { diameter: u32 },

    /// Renderer produced a bitmap that is not square or exceeds the diameter
    #[error("Rendered {width}x{height} bitmap violates the {diameter}px contract")]
    ContractViolation {
        width: u32,
        height: u32,
        diameter: u32,
    },
}

/// Disk tier failures
#[derive(Error, Debug)]
pub enum StorageError {
    /// Blob store failures
    #[error("Blob store error: {0}")]
    BlobStore(#[from] avatar_blob_store::BlobStoreError),

    /// PNG encoding or decoding failures
    #[error("Bitmap codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// Durable key-value store failures
#[derive(Error, Debug)]
pub enum LedgerError {
    /// File I/O failures
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger file could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store cannot be reached
    #[error("Ledger store unavailable: {message}")]
    Unavailable { message: String },
}

/// Convenience methods for creating common error types
impl AvatarError {
    /// Create a configuration error with a custom message
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error with a custom message
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl RenderError {
    /// Whether a retry with failover content may succeed.
    ///
    /// Every render failure is content-specific except a zero diameter, which
    /// fails identically for any content.
    pub fn is_content_specific(&self) -> bool {
        !matches!(self, Self::InvalidDiameter { .. })
    }
}
