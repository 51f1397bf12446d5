use image::{ImageFormat, RgbaImage};
use std::{io::Cursor, sync::Arc};

/// A rendered avatar bitmap tagged with the content that produced it
#[derive(Debug, Clone)]
pub struct AvatarImage {
    pub bitmap: Arc<RgbaImage>,
    pub content_fingerprint: String,
}

impl AvatarImage {
    pub fn new(bitmap: RgbaImage, content_fingerprint: impl Into<String>) -> Self {
        Self {
            bitmap: Arc::new(bitmap),
            content_fingerprint: content_fingerprint.into(),
        }
    }

    /// Side length in pixels (bitmaps are square)
    pub fn side(&self) -> u32 {
        self.bitmap.width().max(self.bitmap.height())
    }

    pub fn is_square(&self) -> bool {
        self.bitmap.width() == self.bitmap.height()
    }

    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        encode_png(&self.bitmap)
    }
}

/// Encode a bitmap as PNG
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    bitmap.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Decode PNG bytes into an RGBA bitmap
pub fn decode_png(data: &[u8]) -> Result<RgbaImage, image::ImageError> {
    Ok(image::load_from_memory_with_format(data, ImageFormat::Png)?.to_rgba8())
}
