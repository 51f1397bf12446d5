//! Resolved avatar requests and their fingerprints

use bytes::Bytes;
use image::RgbaImage;
use std::{fmt, path::PathBuf, sync::Arc};

use super::{Address, AvatarGradient, GroupId, IconGlyph, ThemeId};
use crate::services::avatar_cache::IdentityTokenCache;

/// How the local user's own conversation is presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LocalUserDisplayMode {
    /// Shown like any other contact
    #[default]
    AsUser,
    /// Shown with the note-to-self glyph
    NoteToSelf,
    /// Shown as the local profile
    AsLocalUser,
}

impl fmt::Display for LocalUserDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AsUser => "user",
            Self::NoteToSelf => "note",
            Self::AsLocalUser => "local",
        })
    }
}

/// What a caller-supplied model avatar contains
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarModelKind {
    Icon(IconGlyph),
    /// Image file the caller may rewrite in place
    Image(PathBuf),
    Text(String),
    /// Bitmap the caller already rendered; `key` must change whenever its pixels do
    Rendered { key: String, image: Arc<RgbaImage> },
}

/// Avatar content supplied directly by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarModel {
    pub identifier: String,
    pub kind: AvatarModelKind,
    pub theme: ThemeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestVariant {
    ContactIdentity {
        address: Address,
        display_mode: LocalUserDisplayMode,
    },
    LiteralText {
        text: String,
        theme: ThemeId,
    },
    DefaultContactIcon {
        theme: ThemeId,
    },
    GroupPhoto {
        group_id: GroupId,
        data: Bytes,
        digest: String,
        theme: ThemeId,
    },
    DefaultGroupIcon {
        theme: ThemeId,
    },
    Model(AvatarModel),
    Gradient(AvatarGradient),
}

impl RequestVariant {
    /// Fingerprint of the variant, or `None` when its content may change under
    /// an identical fingerprint and must be resolved every time.
    ///
    /// Contact addresses are replaced by their identity token so that rotating
    /// the token makes every derived fingerprint unreachable.
    pub fn fingerprint(&self, tokens: &mut IdentityTokenCache) -> Option<String> {
        match self {
            Self::ContactIdentity {
                address,
                display_mode,
            } => Some(format!("contact:{}:{display_mode}", tokens.token(address))),
            Self::LiteralText { text, theme } => {
                Some(format!("text:{text:?}:{:?}", theme.as_str()))
            }
            Self::DefaultContactIcon { theme } => {
                Some(format!("default-contact:{:?}", theme.as_str()))
            }
            Self::GroupPhoto {
                group_id,
                digest,
                theme,
                ..
            } => Some(format!(
                "group:{:?}:{digest}:{:?}",
                group_id.as_str(),
                theme.as_str()
            )),
            Self::DefaultGroupIcon { theme } => Some(format!("default-group:{:?}", theme.as_str())),
            Self::Model(model) => {
                let id = model.identifier.as_str();
                let theme = model.theme.as_str();
                match &model.kind {
                    AvatarModelKind::Image(_) => None,
                    AvatarModelKind::Icon(glyph) => {
                        Some(format!("model:{id:?}:icon:{glyph}:{theme:?}"))
                    }
                    AvatarModelKind::Text(text) => {
                        Some(format!("model:{id:?}:text:{text:?}:{theme:?}"))
                    }
                    AvatarModelKind::Rendered { key, .. } => {
                        Some(format!("model:{id:?}:rendered:{key:?}"))
                    }
                }
            }
            Self::Gradient(gradient) => Some(format!("gradient:{}", gradient.id())),
        }
    }

    /// Contact address whose builds feed the fingerprint ledger
    pub fn contact_address(&self) -> Option<&Address> {
        match self {
            Self::ContactIdentity { address, .. } => Some(address),
            _ => None,
        }
    }
}

/// A variant at a concrete pixel diameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRequest {
    pub variant: RequestVariant,
    pub diameter_pixels: u32,
    pub blurred: bool,
}

impl AvatarRequest {
    pub fn new(variant: RequestVariant, diameter_pixels: u32) -> Self {
        Self {
            variant,
            diameter_pixels,
            blurred: false,
        }
    }

    pub fn fingerprint(&self, tokens: &mut IdentityTokenCache) -> Option<String> {
        self.variant
            .fingerprint(tokens)
            .map(|fingerprint| format!("{fingerprint}.{}", self.diameter_pixels))
    }
}
