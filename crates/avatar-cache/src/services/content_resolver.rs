//! Decides what content a resolved request displays today

use std::sync::Arc;
use tracing::trace;

use super::traits::{PolicySource, ProfileSource};
use crate::models::{
    Address, AvatarModelKind, AvatarRequest, ContentDescriptor, ContentKind, IconGlyph,
    LocalUserDisplayMode, RequestVariant, SubjectIdentity, TemplateImage, ThemeId,
};

/// Resolves requests against read-only policy and profile snapshots
#[derive(Clone, Copy)]
pub struct ContentResolver<'a> {
    policy: &'a dyn PolicySource,
    profile: &'a dyn ProfileSource,
}

impl<'a> ContentResolver<'a> {
    pub fn new(policy: &'a dyn PolicySource, profile: &'a dyn ProfileSource) -> Self {
        Self { policy, profile }
    }

    pub fn resolve(&self, request: &AvatarRequest) -> ContentDescriptor {
        match &request.variant {
            RequestVariant::ContactIdentity {
                address,
                display_mode,
            } => self.contact_content(address, *display_mode),
            RequestVariant::LiteralText { text, theme } => {
                ContentDescriptor::new(ContentKind::text(text.clone(), theme.clone()))
                    .with_failover(default_contact_icon(theme))
            }
            RequestVariant::DefaultContactIcon { theme } => {
                ContentDescriptor::new(default_contact_icon(theme))
            }
            RequestVariant::DefaultGroupIcon { theme } => {
                ContentDescriptor::new(default_group_icon(theme))
            }
            RequestVariant::GroupPhoto {
                data,
                digest,
                theme,
                ..
            } => ContentDescriptor::new(ContentKind::Bytes {
                data: data.clone(),
                digest: digest.clone(),
            })
            .with_failover(default_group_icon(theme)),
            RequestVariant::Model(model) => {
                let theme = model.theme.clone();
                ContentDescriptor::new(match &model.kind {
                    AvatarModelKind::Icon(glyph) => ContentKind::Glyph {
                        glyph: *glyph,
                        theme,
                    },
                    AvatarModelKind::Image(path) => ContentKind::File { path: path.clone() },
                    AvatarModelKind::Text(text) => ContentKind::text(text.clone(), theme),
                    AvatarModelKind::Rendered { key, image } => ContentKind::CachedReference {
                        key: key.clone(),
                        image: Arc::clone(image),
                    },
                })
            }
            RequestVariant::Gradient(gradient) => {
                ContentDescriptor::new(ContentKind::Gradient(*gradient))
            }
        }
    }

    /// Note-to-self glyph, then photo, then initials, then the default icon
    fn contact_content(
        &self,
        address: &Address,
        display_mode: LocalUserDisplayMode,
    ) -> ContentDescriptor {
        let subject = SubjectIdentity::Contact(address.clone());
        let theme = self.policy.display_theme(&subject);
        let fallback = default_contact_icon(&theme);

        if display_mode == LocalUserDisplayMode::NoteToSelf {
            return ContentDescriptor::new(ContentKind::Glyph {
                glyph: IconGlyph::NoteToSelf,
                theme,
            })
            .with_failover(fallback);
        }

        if let Some(photo) = self.profile.contact_photo(address).filter(|p| !p.is_empty()) {
            trace!("Using photo for {}", address);
            return ContentDescriptor::new(ContentKind::bytes(photo)).with_failover(fallback);
        }

        if let Some(initials) = self.policy.display_name(&subject).initials() {
            trace!("Using initials {} for {}", initials, address);
            return ContentDescriptor::new(ContentKind::text(initials, theme)).with_failover(fallback);
        }

        ContentDescriptor::new(fallback)
    }
}

fn default_contact_icon(theme: &ThemeId) -> ContentKind {
    ContentKind::Template {
        template: TemplateImage::DefaultContact,
        theme: theme.clone(),
    }
}

fn default_group_icon(theme: &ThemeId) -> ContentKind {
    ContentKind::Template {
        template: TemplateImage::DefaultGroup,
        theme: theme.clone(),
    }
}
