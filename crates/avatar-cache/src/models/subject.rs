//! Caller-facing avatar subjects and display parameters

use bytes::Bytes;

use super::{AvatarModel, LocalUserDisplayMode, ThemeId};
use crate::config::defaults::MAX_DIAMETER_PIXELS;

/// A group as the caller currently sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    pub id: String,
    /// Encoded group photo, if one is set
    pub avatar: Option<Bytes>,
}

/// The other party of a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadSnapshot {
    Contact(String),
    Group(GroupSnapshot),
}

/// What an avatar is being asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSubject {
    /// A contact by raw (unvalidated) address
    Contact(String),
    Group(GroupSnapshot),
    Thread(ThreadSnapshot),
    Model(AvatarModel),
    Text { text: String, theme: ThemeId },
    DefaultContact(ThemeId),
}

/// Presentation parameters supplied with every ask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayParams {
    pub diameter_points: f32,
    /// Device pixels per point
    pub scale: f32,
    pub local_user_display_mode: LocalUserDisplayMode,
}

impl DisplayParams {
    pub fn new(diameter_points: f32, scale: f32) -> Self {
        Self {
            diameter_points,
            scale,
            local_user_display_mode: LocalUserDisplayMode::AsUser,
        }
    }

    #[must_use]
    pub fn with_local_user_display_mode(mut self, mode: LocalUserDisplayMode) -> Self {
        self.local_user_display_mode = mode;
        self
    }

    /// Diameter in device pixels.
    ///
    /// Zero for non-finite, non-positive or oversized input (above
    /// [`MAX_DIAMETER_PIXELS`]), all of which resolve to no avatar.
    pub fn diameter_pixels(&self) -> u32 {
        let pixels = (self.diameter_points * self.scale).round();
        if pixels.is_finite() && pixels >= 1.0 && pixels <= MAX_DIAMETER_PIXELS as f32 {
            pixels as u32
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diameter_pixels_rounds() {
        assert_eq!(DisplayParams::new(48.0, 2.0).diameter_pixels(), 96);
        assert_eq!(DisplayParams::new(36.0, 1.5).diameter_pixels(), 54);
        assert_eq!(DisplayParams::new(10.3, 3.0).diameter_pixels(), 31);
        assert_eq!(DisplayParams::new(0.0, 2.0).diameter_pixels(), 0);
        assert_eq!(DisplayParams::new(f32::NAN, 2.0).diameter_pixels(), 0);
    }

    #[test]
    fn test_oversized_diameter_is_zero() {
        assert_eq!(DisplayParams::new(1024.0, 2.0).diameter_pixels(), MAX_DIAMETER_PIXELS);
        assert_eq!(DisplayParams::new(1025.0, 2.0).diameter_pixels(), 0);
        assert_eq!(DisplayParams::new(3.0e9, 1.0).diameter_pixels(), 0);
        assert_eq!(DisplayParams::new(f32::INFINITY, 1.0).diameter_pixels(), 0);
    }
}
