use image::Rgba;

use crate::{models::ThemeId, utils::sha256_bytes};

/// Background and foreground colors of a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: Rgba<u8>,
    pub foreground: Rgba<u8>,
}

const fn colors(background: [u8; 3], foreground: [u8; 3]) -> ThemeColors {
    ThemeColors {
        background: Rgba([background[0], background[1], background[2], 255]),
        foreground: Rgba([foreground[0], foreground[1], foreground[2], 255]),
    }
}

const NAMED_THEMES: &[(&str, ThemeColors)] = &[
    ("default", colors([0xE3, 0xE3, 0xFE], [0x3B, 0x3B, 0x6E])),
    ("ultramarine", colors([0xD0, 0xD8, 0xFE], [0x2C, 0x3E, 0xBF])),
    ("crimson", colors([0xFF, 0xD5, 0xD5], [0xA8, 0x1D, 0x2B])),
    ("vermilion", colors([0xFF, 0xDC, 0xC8], [0xB3, 0x41, 0x12])),
    ("burlap", colors([0xF2, 0xE6, 0xCC], [0x7A, 0x5C, 0x2E])),
    ("forest", colors([0xD2, 0xF1, 0xD2], [0x2B, 0x6B, 0x2B])),
    ("wintergreen", colors([0xC8, 0xF2, 0xE5], [0x1A, 0x6B, 0x55])),
    ("teal", colors([0xC6, 0xEE, 0xF2], [0x16, 0x63, 0x70])),
    ("blue", colors([0xD2, 0xE4, 0xFA], [0x1E, 0x54, 0x9A])),
    ("plum", colors([0xEC, 0xD5, 0xF2], [0x6E, 0x2A, 0x7E])),
    ("taupe", colors([0xE8, 0xE1, 0xDA], [0x5E, 0x51, 0x45])),
    ("steel", colors([0xDD, 0xE3, 0xE8], [0x3F, 0x4E, 0x5A])),
];

/// Colors for a theme. Unknown themes map onto the named palette by digest.
pub fn theme_colors(theme: &ThemeId) -> ThemeColors {
    NAMED_THEMES
        .iter()
        .find(|(name, _)| *name == theme.as_str())
        .map(|(_, colors)| *colors)
        .unwrap_or_else(|| {
            let index = usize::from(sha256_bytes(theme.as_str())[0]) % NAMED_THEMES.len();
            NAMED_THEMES[index].1
        })
}
