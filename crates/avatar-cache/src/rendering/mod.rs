//! Avatar rendering capability
//!
//! The cache core only ever talks to [`AvatarRenderer`]; drawing primitives live
//! behind it, one method per content variant, so tests can substitute counting
//! or failing renderers without touching the cache.

pub mod basic;
pub mod embedded_font;
pub mod fit;
pub mod palette;

pub use basic::BasicRenderer;
pub use fit::fit_to_diameter;
pub use palette::{ThemeColors, theme_colors};

use image::RgbaImage;
use std::path::Path;

use crate::{
    config::defaults::MAX_DIAMETER_PIXELS,
    errors::{RenderError, RenderResult},
    models::{AvatarGradient, ContentKind, IconGlyph, TemplateImage, ThemeId},
};

/// Draws bitmaps for content descriptors.
///
/// Implementations must be deterministic: identical inputs give identical pixels.
/// Every returned bitmap must be square with a side no larger than `diameter`.
pub trait AvatarRenderer: Send + Sync {
    /// Decode encoded image bytes and fit them to the diameter
    fn render_bytes(&self, data: &[u8], diameter: u32) -> RenderResult<RgbaImage>;

    fn render_text(&self, text: &str, theme: &ThemeId, diameter: u32) -> RenderResult<RgbaImage>;

    fn render_template(
        &self,
        template: TemplateImage,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage>;

    fn render_glyph(
        &self,
        glyph: IconGlyph,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage>;

    fn render_gradient(&self, gradient: &AvatarGradient, diameter: u32) -> RenderResult<RgbaImage>;

    /// Read an image file and render it like raw bytes
    fn render_file(&self, path: &Path, diameter: u32) -> RenderResult<RgbaImage> {
        let data = std::fs::read(path)?;
        self.render_bytes(&data, diameter)
    }

    /// Fit an externally produced bitmap
    fn render_cached(&self, image: &RgbaImage, diameter: u32) -> RenderResult<RgbaImage> {
        Ok(fit_to_diameter(image.clone(), diameter))
    }

    /// Dispatch on the content variant. Diameters outside
    /// `1..=MAX_DIAMETER_PIXELS` are rejected before any allocation.
    fn render(&self, content: &ContentKind, diameter: u32) -> RenderResult<RgbaImage> {
        if diameter == 0 || diameter > MAX_DIAMETER_PIXELS {
            return Err(RenderError::InvalidDiameter { diameter });
        }

        match content {
            ContentKind::File { path } => self.render_file(path, diameter),
            ContentKind::Bytes { data, .. } => self.render_bytes(data, diameter),
            ContentKind::Text { text, theme } => self.render_text(text, theme, diameter),
            ContentKind::Template { template, theme } => {
                self.render_template(*template, theme, diameter)
            }
            ContentKind::Glyph { glyph, theme } => self.render_glyph(*glyph, theme, diameter),
            ContentKind::CachedReference { image, .. } => self.render_cached(image, diameter),
            ContentKind::Gradient(gradient) => self.render_gradient(gradient, diameter),
        }
    }
}

/// Reject bitmaps that are not square or exceed the diameter
pub fn check_size_contract(bitmap: &RgbaImage, diameter: u32) -> RenderResult<()> {
    let (width, height) = bitmap.dimensions();
    if width != height || width > diameter || width == 0 {
        return Err(RenderError::ContractViolation {
            width,
            height,
            diameter,
        });
    }
    Ok(())
}
