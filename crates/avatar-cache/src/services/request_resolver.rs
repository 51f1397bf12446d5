//! Turns an avatar ask into a concrete request variant

use tracing::trace;

use super::traits::{PolicySource, ProfileSource};
use crate::{
    models::{
        Address, AvatarGradient, AvatarRequest, AvatarSubject, DisplayParams, GroupId,
        GroupSnapshot, LocalUserDisplayMode, RequestVariant, SubjectIdentity, ThreadSnapshot,
    },
    utils::sha256_hex,
};

/// Resolve a subject into a request.
///
/// Blur policy is applied first: a blurred contact or group always becomes a
/// gradient derived from its identity. Structurally invalid subjects (malformed
/// address, empty group id) and an unusable pixel diameter (zero, or above the
/// render ceiling) yield `None`.
pub fn resolve_request(
    subject: &AvatarSubject,
    params: &DisplayParams,
    policy: &dyn PolicySource,
    profile: &dyn ProfileSource,
) -> Option<AvatarRequest> {
    let diameter_pixels = params.diameter_pixels();
    if diameter_pixels == 0 {
        trace!("Ignoring avatar ask without a usable diameter");
        return None;
    }

    if let Some(identity) = subject_identity(subject)? {
        if policy.should_blur(&identity) {
            return Some(AvatarRequest {
                variant: RequestVariant::Gradient(AvatarGradient::derived_from(&identity.seed())),
                diameter_pixels,
                blurred: true,
            });
        }
    }

    let variant = match subject {
        AvatarSubject::Contact(raw) | AvatarSubject::Thread(ThreadSnapshot::Contact(raw)) => {
            contact_variant(raw, params, profile)?
        }
        AvatarSubject::Group(group) | AvatarSubject::Thread(ThreadSnapshot::Group(group)) => {
            group_variant(group, policy)?
        }
        AvatarSubject::Model(model) => RequestVariant::Model(model.clone()),
        AvatarSubject::Text { text, theme } => RequestVariant::LiteralText {
            text: text.clone(),
            theme: theme.clone(),
        },
        AvatarSubject::DefaultContact(theme) => RequestVariant::DefaultContactIcon {
            theme: theme.clone(),
        },
    };

    Some(AvatarRequest::new(variant, diameter_pixels))
}

/// Policy identity of a subject.
///
/// Outer `None` means the subject is invalid; inner `None` means it has no
/// identity for policy purposes (models, literal text, default icons).
fn subject_identity(subject: &AvatarSubject) -> Option<Option<SubjectIdentity>> {
    match subject {
        AvatarSubject::Contact(raw) | AvatarSubject::Thread(ThreadSnapshot::Contact(raw)) => {
            Address::parse(raw).map(|address| Some(SubjectIdentity::Contact(address)))
        }
        AvatarSubject::Group(group) | AvatarSubject::Thread(ThreadSnapshot::Group(group)) => {
            GroupId::new(group.id.as_str()).map(|id| Some(SubjectIdentity::Group(id)))
        }
        AvatarSubject::Model(_) | AvatarSubject::Text { .. } | AvatarSubject::DefaultContact(_) => {
            Some(None)
        }
    }
}

fn contact_variant(
    raw: &str,
    params: &DisplayParams,
    profile: &dyn ProfileSource,
) -> Option<RequestVariant> {
    let address = Address::parse(raw)?;
    let is_local = profile
        .local_address()
        .is_some_and(|local| local == address);
    let display_mode = if is_local {
        params.local_user_display_mode
    } else {
        LocalUserDisplayMode::AsUser
    };

    Some(RequestVariant::ContactIdentity {
        address,
        display_mode,
    })
}

fn group_variant(group: &GroupSnapshot, policy: &dyn PolicySource) -> Option<RequestVariant> {
    let group_id = GroupId::new(group.id.as_str())?;
    let theme = policy.display_theme(&SubjectIdentity::Group(group_id.clone()));

    Some(match &group.avatar {
        Some(data) if !data.is_empty() => RequestVariant::GroupPhoto {
            group_id,
            digest: sha256_hex(data),
            data: data.clone(),
            theme,
        },
        _ => RequestVariant::DefaultGroupIcon { theme },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{AvatarModel, AvatarModelKind, IconGlyph, ThemeId},
        services::snapshot::StateSnapshot,
    };
    use bytes::Bytes;

    const JANE: &str = "+14155550123";
    const LOCAL: &str = "+14155550100";

    fn snapshot() -> StateSnapshot {
        let mut snapshot = StateSnapshot::new(ThemeId::new("blue"));
        snapshot.local_address = Address::parse(LOCAL);
        snapshot
    }

    fn params() -> DisplayParams {
        DisplayParams::new(48.0, 2.0)
    }

    #[test]
    fn test_contact_resolves_to_identity() {
        let state = snapshot();
        let request =
            resolve_request(&AvatarSubject::Contact(JANE.into()), &params(), &state, &state).unwrap();

        assert_eq!(request.diameter_pixels, 96);
        assert!(!request.blurred);
        assert_eq!(
            request.variant,
            RequestVariant::ContactIdentity {
                address: Address::parse(JANE).unwrap(),
                display_mode: LocalUserDisplayMode::AsUser,
            }
        );
    }

    #[test]
    fn test_display_mode_only_applies_to_local_user() {
        let state = snapshot();
        let params = params().with_local_user_display_mode(LocalUserDisplayMode::NoteToSelf);

        let local = resolve_request(&AvatarSubject::Contact(LOCAL.into()), &params, &state, &state)
            .unwrap();
        let other = resolve_request(&AvatarSubject::Contact(JANE.into()), &params, &state, &state)
            .unwrap();

        assert!(matches!(
            local.variant,
            RequestVariant::ContactIdentity {
                display_mode: LocalUserDisplayMode::NoteToSelf,
                ..
            }
        ));
        assert!(matches!(
            other.variant,
            RequestVariant::ContactIdentity {
                display_mode: LocalUserDisplayMode::AsUser,
                ..
            }
        ));
    }

    #[test]
    fn test_blur_short_circuits() {
        let mut state = snapshot();
        let jane = Address::parse(JANE).unwrap();
        state.set_photo(jane.clone(), Bytes::from_static(b"photo"));
        state.set_blurred(SubjectIdentity::Contact(jane.clone()), true);

        let request =
            resolve_request(&AvatarSubject::Contact(JANE.into()), &params(), &state, &state).unwrap();
        let expected = AvatarGradient::derived_from(&SubjectIdentity::Contact(jane).seed());

        assert!(request.blurred);
        assert_eq!(request.variant, RequestVariant::Gradient(expected));
    }

    #[test]
    fn test_group_variants() {
        let state = snapshot();
        let with_photo = GroupSnapshot {
            id: "family".into(),
            avatar: Some(Bytes::from_static(b"group photo")),
        };
        let without_photo = GroupSnapshot {
            id: "family".into(),
            avatar: None,
        };

        let request =
            resolve_request(&AvatarSubject::Group(with_photo), &params(), &state, &state).unwrap();
        match request.variant {
            RequestVariant::GroupPhoto { digest, theme, .. } => {
                assert_eq!(digest, sha256_hex(b"group photo"));
                assert_eq!(theme, ThemeId::new("blue"));
            }
            other => panic!("unexpected variant {other:?}"),
        }

        let request = resolve_request(
            &AvatarSubject::Thread(ThreadSnapshot::Group(without_photo)),
            &params(),
            &state,
            &state,
        )
        .unwrap();
        assert!(matches!(request.variant, RequestVariant::DefaultGroupIcon { .. }));
    }

    #[test]
    fn test_invalid_subjects_yield_none() {
        let state = snapshot();
        let empty_group = GroupSnapshot {
            id: " ".into(),
            avatar: None,
        };

        assert!(resolve_request(&AvatarSubject::Contact("bob".into()), &params(), &state, &state).is_none());
        assert!(resolve_request(&AvatarSubject::Group(empty_group), &params(), &state, &state).is_none());
        assert!(
            resolve_request(
                &AvatarSubject::Contact(JANE.into()),
                &DisplayParams::new(0.0, 2.0),
                &state,
                &state
            )
            .is_none()
        );
    }

    #[test]
    fn test_oversized_diameter_yields_none() {
        let state = snapshot();
        let huge = DisplayParams::new(3.0e9, 1.0);

        for subject in [
            AvatarSubject::DefaultContact(ThemeId::default()),
            AvatarSubject::Contact(JANE.into()),
            AvatarSubject::Text {
                text: "JD".into(),
                theme: ThemeId::default(),
            },
        ] {
            assert!(resolve_request(&subject, &huge, &state, &state).is_none());
        }
    }

    #[test]
    fn test_model_echoed() {
        let state = snapshot();
        let model = AvatarModel {
            identifier: "release-notes".into(),
            kind: AvatarModelKind::Icon(IconGlyph::NoteToSelf),
            theme: ThemeId::default(),
        };

        let request =
            resolve_request(&AvatarSubject::Model(model.clone()), &params(), &state, &state).unwrap();
        assert_eq!(request.variant, RequestVariant::Model(model));
    }
}
