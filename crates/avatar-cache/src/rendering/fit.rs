use image::{DynamicImage, RgbaImage, imageops::FilterType};

/// Fit a source bitmap into a `diameter` square.
///
/// - larger than the target in either dimension: scale to fill the target square
/// - non-square but within bounds: center-crop to the smaller side
/// - otherwise: unchanged
pub fn fit_to_diameter(source: RgbaImage, diameter: u32) -> RgbaImage {
    let (width, height) = source.dimensions();

    if width > diameter || height > diameter {
        return DynamicImage::ImageRgba8(source)
            .resize_to_fill(diameter, diameter, FilterType::Triangle)
            .to_rgba8();
    }

    if width != height {
        let side = width.min(height);
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        return image::imageops::crop_imm(&source, x, y, side, side).to_image();
    }

    source
}
