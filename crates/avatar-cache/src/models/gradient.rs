use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::sha256_bytes;

/// Gradient stop colors, shared by every blurred avatar
const GRADIENT_COLORS: [[u8; 3]; 12] = [
    [0x2C, 0x6B, 0xED],
    [0x7B, 0x4E, 0xE3],
    [0xC7, 0x3F, 0x9A],
    [0xE3, 0x4A, 0x4A],
    [0xE8, 0x84, 0x2D],
    [0xD4, 0xB2, 0x1E],
    [0x4C, 0xAF, 0x50],
    [0x1E, 0x9E, 0x8C],
    [0x1D, 0x8C, 0xB8],
    [0x5A, 0x6B, 0x7F],
    [0x8D, 0x5F, 0x46],
    [0x3D, 0x3D, 0x9E],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradientDirection {
    TopToBottom,
    LeftToRight,
    TopLeftToBottomRight,
    TopRightToBottomLeft,
}

impl GradientDirection {
    fn from_byte(byte: u8) -> Self {
        match byte % 4 {
            0 => Self::TopToBottom,
            1 => Self::LeftToRight,
            2 => Self::TopLeftToBottomRight,
            _ => Self::TopRightToBottomLeft,
        }
    }

    fn code(self) -> char {
        match self {
            Self::TopToBottom => 'v',
            Self::LeftToRight => 'h',
            Self::TopLeftToBottomRight => 'd',
            Self::TopRightToBottomLeft => 'a',
        }
    }
}

/// Two-stop linear gradient used in place of a blurred avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvatarGradient {
    pub start: [u8; 3],
    pub end: [u8; 3],
    pub direction: GradientDirection,
}

impl AvatarGradient {
    /// Deterministically derive a gradient from a subject seed.
    ///
    /// Equal seeds always give equal gradients; the two stops never share a color.
    pub fn derived_from(seed: &str) -> Self {
        let digest = sha256_bytes(seed);
        let count = GRADIENT_COLORS.len();
        let first = usize::from(digest[0]) % count;
        // Offset in 1..count keeps the stops distinct
        let second = (first + 1 + usize::from(digest[1]) % (count - 1)) % count;

        Self {
            start: GRADIENT_COLORS[first],
            end: GRADIENT_COLORS[second],
            direction: GradientDirection::from_byte(digest[2]),
        }
    }

    /// Stable identifier, e.g. `2c6bed-7b4ee3-v`
    pub fn id(&self) -> String {
        format!(
            "{}-{}-{}",
            hex::encode(self.start),
            hex::encode(self.end),
            self.direction.code()
        )
    }
}

impl fmt::Display for AvatarGradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}
