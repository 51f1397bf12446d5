//! Reference renderer built on the `image` crate

use image::{Rgba, RgbaImage};

use super::{
    AvatarRenderer,
    embedded_font::{self, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH},
    fit_to_diameter,
    palette::{ThemeColors, theme_colors},
};
use crate::{
    errors::{RenderError, RenderResult},
    models::{AvatarGradient, GradientDirection, IconGlyph, TemplateImage, ThemeId},
};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Share of the diameter the initials may span horizontally
const TEXT_WIDTH_RATIO: f32 = 0.6;
/// Share of the diameter the initials may span vertically
const TEXT_HEIGHT_RATIO: f32 = 0.45;

/// Deterministic circular avatar renderer.
///
/// Generated avatars fill the full diameter and are masked to a circle; decoded
/// photos are fitted with [`fit_to_diameter`] and left unmasked.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRenderer;

impl BasicRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl AvatarRenderer for BasicRenderer {
    fn render_bytes(&self, data: &[u8], diameter: u32) -> RenderResult<RgbaImage> {
        let decoded = image::load_from_memory(data)?.to_rgba8();
        Ok(fit_to_diameter(decoded, diameter))
    }

    fn render_text(&self, text: &str, theme: &ThemeId, diameter: u32) -> RenderResult<RgbaImage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RenderError::EmptyText);
        }

        let glyphs = text
            .chars()
            .map(|character| {
                embedded_font::glyph(character).ok_or_else(|| RenderError::UnsupportedText {
                    text: text.to_string(),
                    character,
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;

        let count = u32::try_from(glyphs.len()).unwrap_or(u32::MAX);
        let text_width = embedded_font::text_width(count);
        let scale_x = (diameter as f32 * TEXT_WIDTH_RATIO / text_width as f32).floor();
        let scale_y = (diameter as f32 * TEXT_HEIGHT_RATIO / GLYPH_HEIGHT as f32).floor();
        let scale = scale_x.min(scale_y) as u32;
        if scale == 0 {
            return Err(RenderError::TextTooLarge {
                text: text.to_string(),
                diameter,
            });
        }

        let colors = theme_colors(theme);
        let mut canvas = circle_canvas(diameter, colors.background);

        let origin_x = (diameter - text_width * scale) / 2;
        let origin_y = (diameter - GLYPH_HEIGHT * scale) / 2;
        for (index, glyph) in glyphs.iter().enumerate() {
            let glyph_x = origin_x + index as u32 * (GLYPH_WIDTH + GLYPH_SPACING) * scale;
            for row in 0..GLYPH_HEIGHT {
                for column in 0..GLYPH_WIDTH {
                    if embedded_font::is_set(glyph, column, row) {
                        fill_rect(
                            &mut canvas,
                            glyph_x + column * scale,
                            origin_y + row * scale,
                            scale,
                            scale,
                            colors.foreground,
                        );
                    }
                }
            }
        }

        Ok(canvas)
    }

    fn render_template(
        &self,
        template: TemplateImage,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage> {
        let colors = theme_colors(theme);
        let mut canvas = circle_canvas(diameter, colors.background);
        match template {
            TemplateImage::DefaultContact => draw_person(&mut canvas, 0.5, 1.0, colors),
            TemplateImage::DefaultGroup => draw_group(&mut canvas, colors),
        }
        mask_circle(&mut canvas);
        Ok(canvas)
    }

    fn render_glyph(
        &self,
        glyph: IconGlyph,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage> {
        let colors = theme_colors(theme);
        let mut canvas = circle_canvas(diameter, colors.background);
        match glyph {
            IconGlyph::NoteToSelf => draw_note(&mut canvas, colors),
            IconGlyph::Person => draw_person(&mut canvas, 0.5, 0.8, colors),
            IconGlyph::Group => draw_group(&mut canvas, colors),
        }
        mask_circle(&mut canvas);
        Ok(canvas)
    }

    fn render_gradient(&self, gradient: &AvatarGradient, diameter: u32) -> RenderResult<RgbaImage> {
        let span = (diameter.max(2) - 1) as f32;
        let mut canvas = RgbaImage::from_fn(diameter, diameter, |x, y| {
            let (x, y) = (x as f32 / span, y as f32 / span);
            let t = match gradient.direction {
                GradientDirection::TopToBottom => y,
                GradientDirection::LeftToRight => x,
                GradientDirection::TopLeftToBottomRight => (x + y) / 2.0,
                GradientDirection::TopRightToBottomLeft => (1.0 - x + y) / 2.0,
            };
            lerp(gradient.start, gradient.end, t)
        });
        mask_circle(&mut canvas);
        Ok(canvas)
    }
}

fn lerp(start: [u8; 3], end: [u8; 3], t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let channel =
        |i: usize| (f32::from(start[i]) + (f32::from(end[i]) - f32::from(start[i])) * t).round() as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

fn circle_canvas(diameter: u32, background: Rgba<u8>) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(diameter, diameter, background);
    mask_circle(&mut canvas);
    canvas
}

/// Clear every pixel whose center lies outside the inscribed circle
fn mask_circle(canvas: &mut RgbaImage) {
    let radius = canvas.width() as f32 / 2.0;
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy > radius * radius {
            *pixel = TRANSPARENT;
        }
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    for py in y..(y + height).min(canvas.height()) {
        for px in x..(x + width).min(canvas.width()) {
            canvas.put_pixel(px, py, color);
        }
    }
}

/// Fill an ellipse given as fractions of the canvas side
fn fill_ellipse(canvas: &mut RgbaImage, cx: f32, cy: f32, rx: f32, ry: f32, color: Rgba<u8>) {
    let side = canvas.width() as f32;
    let (cx, cy, rx, ry) = (cx * side, cy * side, rx * side, ry * side);
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let dx = (x as f32 + 0.5 - cx) / rx;
        let dy = (y as f32 + 0.5 - cy) / ry;
        if dx * dx + dy * dy <= 1.0 {
            *pixel = color;
        }
    }
}

/// Head and shoulders silhouette centered at `cx`, sized by `size`
fn draw_person(canvas: &mut RgbaImage, cx: f32, size: f32, colors: ThemeColors) {
    fill_ellipse(canvas, cx, 0.38, 0.16 * size, 0.16 * size, colors.foreground);
    fill_ellipse(canvas, cx, 0.38 + 0.48 * size, 0.3 * size, 0.24 * size, colors.foreground);
}

fn draw_group(canvas: &mut RgbaImage, colors: ThemeColors) {
    draw_person(canvas, 0.33, 0.7, colors);
    draw_person(canvas, 0.67, 0.7, colors);
}

/// Sheet of paper with ruled lines
fn draw_note(canvas: &mut RgbaImage, colors: ThemeColors) {
    let side = canvas.width();
    let fraction = |f: f32| (side as f32 * f).round() as u32;

    fill_rect(
        canvas,
        fraction(0.3),
        fraction(0.25),
        fraction(0.4),
        fraction(0.5),
        colors.foreground,
    );

    let line_height = fraction(0.04).max(1);
    for line in 0..3 {
        fill_rect(
            canvas,
            fraction(0.36),
            fraction(0.35) + line * fraction(0.1),
            fraction(0.28),
            line_height,
            colors.background,
        );
    }
}
