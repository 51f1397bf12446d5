//! Renderable content descriptors
//!
//! A descriptor says *what* an avatar looks like, independent of who asked for it.
//! Its fingerprint is derived from the payload alone, which lets unrelated requests
//! that resolve to the same content share one rendered bitmap.

use bytes::Bytes;
use image::RgbaImage;
use std::{fmt, path::PathBuf, sync::Arc};

use super::{AvatarGradient, ThemeId};
use crate::utils::sha256_hex;

/// Built-in silhouette images tinted with the theme color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateImage {
    DefaultContact,
    DefaultGroup,
}

impl fmt::Display for TemplateImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DefaultContact => "default-contact",
            Self::DefaultGroup => "default-group",
        })
    }
}

/// Vector-style glyphs drawn on a themed background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconGlyph {
    NoteToSelf,
    Person,
    Group,
}

impl fmt::Display for IconGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoteToSelf => "note-to-self",
            Self::Person => "person",
            Self::Group => "group",
        })
    }
}

/// A single piece of renderable content
#[derive(Debug, Clone)]
pub enum ContentKind {
    /// Image file on local disk
    File { path: PathBuf },
    /// Encoded image bytes with their SHA-256 digest
    Bytes { data: Bytes, digest: String },
    /// Text (usually initials) on a themed background
    Text { text: String, theme: ThemeId },
    /// Tinted template image
    Template { template: TemplateImage, theme: ThemeId },
    /// Icon glyph on a themed background
    Glyph { glyph: IconGlyph, theme: ThemeId },
    /// Bitmap already produced elsewhere, identified by an external key
    CachedReference { key: String, image: Arc<RgbaImage> },
    /// Two-stop gradient
    Gradient(AvatarGradient),
}

impl ContentKind {
    /// Raw bytes content, digesting the payload
    pub fn bytes(data: Bytes) -> Self {
        let digest = sha256_hex(&data);
        Self::Bytes { data, digest }
    }

    pub fn text(text: impl Into<String>, theme: ThemeId) -> Self {
        Self::Text {
            text: text.into(),
            theme,
        }
    }

    /// Fingerprint of the payload. Free-form fields are quoted so that no
    /// value can forge the `:` and `|` separators.
    pub fn fingerprint(&self) -> String {
        match self {
            Self::File { path } => format!("file:{path:?}"),
            Self::Bytes { digest, .. } => format!("bytes:{digest}"),
            Self::Text { text, theme } => format!("text:{text:?}:{:?}", theme.as_str()),
            Self::Template { template, theme } => {
                format!("template:{template}:{:?}", theme.as_str())
            }
            Self::Glyph { glyph, theme } => format!("glyph:{glyph}:{:?}", theme.as_str()),
            Self::CachedReference { key, .. } => format!("cached:{key:?}"),
            Self::Gradient(gradient) => format!("gradient:{}", gradient.id()),
        }
    }
}

/// Primary content plus the optional content rendered when the primary fails
#[derive(Debug, Clone)]
pub struct ContentDescriptor {
    pub primary: ContentKind,
    pub failover: Option<Box<ContentDescriptor>>,
}

impl ContentDescriptor {
    pub fn new(primary: ContentKind) -> Self {
        Self {
            primary,
            failover: None,
        }
    }

    #[must_use]
    pub fn with_failover(mut self, failover: ContentKind) -> Self {
        self.failover = Some(Box::new(Self::new(failover)));
        self
    }

    /// Fingerprint over the whole failover chain.
    ///
    /// The failover takes part because a failing primary renders as its failover.
    pub fn fingerprint(&self) -> String {
        match &self.failover {
            Some(failover) => format!("{}|{}", self.primary.fingerprint(), failover.fingerprint()),
            None => self.primary.fingerprint(),
        }
    }

    /// Primary content followed by each failover, in render order
    pub fn chain(&self) -> impl Iterator<Item = &ContentKind> {
        std::iter::successors(Some(self), |descriptor| descriptor.failover.as_deref())
            .map(|descriptor| &descriptor.primary)
    }
}

impl PartialEq for ContentDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }
}

impl Eq for ContentDescriptor {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bytes_fingerprint_uses_digest() {
        let a = ContentKind::bytes(Bytes::from_static(b"photo"));
        let b = ContentKind::bytes(Bytes::from(b"photo".to_vec()));
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.fingerprint().starts_with("bytes:"));
    }

    #[test]
    fn test_failover_in_fingerprint_and_chain() {
        let theme = ThemeId::new("blue");
        let descriptor = ContentDescriptor::new(ContentKind::text("JD", theme.clone())).with_failover(
            ContentKind::Template {
                template: TemplateImage::DefaultContact,
                theme,
            },
        );

        assert_eq!(
            descriptor.fingerprint(),
            "text:\"JD\":\"blue\"|template:default-contact:\"blue\""
        );
        assert_eq!(descriptor.chain().count(), 2);
    }

    #[test]
    fn test_text_fingerprint_separates_themes() {
        let blue = ContentKind::text("JD", ThemeId::new("blue"));
        let red = ContentKind::text("JD", ThemeId::new("red"));
        assert_ne!(blue.fingerprint(), red.fingerprint());
    }

    #[test]
    fn test_theme_cannot_forge_failover_separator() {
        let forged = ContentDescriptor::new(ContentKind::text(
            "JD",
            ThemeId::new("a\"|template:default-contact:\"b"),
        ));
        let chained = ContentDescriptor::new(ContentKind::text("JD", ThemeId::new("a")))
            .with_failover(ContentKind::Template {
                template: TemplateImage::DefaultContact,
                theme: ThemeId::new("b"),
            });
        assert_ne!(forged.fingerprint(), chained.fingerprint());

        let plain = ContentDescriptor::new(ContentKind::text(
            "JD",
            ThemeId::new("a|template:default-contact:b"),
        ));
        assert_ne!(plain.fingerprint(), chained.fingerprint());
    }

    #[test]
    fn test_cached_reference_fingerprint_uses_key() {
        let image = Arc::new(RgbaImage::new(4, 4));
        let kind = ContentKind::CachedReference {
            key: "sticker:42".into(),
            image,
        };
        assert_eq!(kind.fingerprint(), "cached:\"sticker:42\"");
    }

    proptest! {
        #[test]
        fn prop_fingerprint_depends_only_on_payload(
            data in prop::collection::vec(any::<u8>(), 0..256),
            text in "[A-Z]{1,3}",
            theme in "[a-z]{1,10}",
        ) {
            let copied = data.clone();
            prop_assert_eq!(
                ContentKind::bytes(Bytes::from(data)).fingerprint(),
                ContentKind::bytes(Bytes::from(copied)).fingerprint()
            );
            prop_assert_eq!(
                ContentKind::text(text.clone(), ThemeId::new(theme.clone())).fingerprint(),
                ContentKind::text(text, ThemeId::new(theme)).fingerprint()
            );
        }

        #[test]
        fn prop_distinct_bytes_have_distinct_fingerprints(
            a in prop::collection::vec(any::<u8>(), 1..64),
            b in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(
                ContentKind::bytes(Bytes::from(a)).fingerprint(),
                ContentKind::bytes(Bytes::from(b)).fingerprint()
            );
        }
    }
}
