use bytes::Bytes;
use std::collections::{HashMap, HashSet};

use super::traits::{PolicySource, ProfileSource};
use crate::models::{Address, NameComponents, SubjectIdentity, ThemeId};

/// In-memory snapshot of policy and profile state.
///
/// Serves the CLI and tests; applications usually implement the traits over their
/// own stores instead.
#[derive(Debug, Clone, Default)]
pub struct StateSnapshot {
    pub default_theme: ThemeId,
    pub local_address: Option<Address>,
    pub names: HashMap<Address, NameComponents>,
    pub photos: HashMap<Address, Bytes>,
    pub themes: HashMap<SubjectIdentity, ThemeId>,
    pub blurred: HashSet<SubjectIdentity>,
}

impl StateSnapshot {
    pub fn new(default_theme: ThemeId) -> Self {
        Self {
            default_theme,
            ..Self::default()
        }
    }

    pub fn set_name(&mut self, address: Address, full_name: &str) {
        self.names
            .insert(address, NameComponents::from_full_name(full_name));
    }

    pub fn set_photo(&mut self, address: Address, photo: Bytes) {
        self.photos.insert(address, photo);
    }

    pub fn set_theme(&mut self, subject: SubjectIdentity, theme: ThemeId) {
        self.themes.insert(subject, theme);
    }

    pub fn set_blurred(&mut self, subject: SubjectIdentity, blurred: bool) {
        if blurred {
            self.blurred.insert(subject);
        } else {
            self.blurred.remove(&subject);
        }
    }
}

impl PolicySource for StateSnapshot {
    fn should_blur(&self, subject: &SubjectIdentity) -> bool {
        self.blurred.contains(subject)
    }

    fn display_theme(&self, subject: &SubjectIdentity) -> ThemeId {
        self.themes
            .get(subject)
            .cloned()
            .unwrap_or_else(|| self.default_theme.clone())
    }

    fn display_name(&self, subject: &SubjectIdentity) -> NameComponents {
        match subject {
            SubjectIdentity::Contact(address) => {
                self.names.get(address).cloned().unwrap_or_default()
            }
            SubjectIdentity::Group(_) => NameComponents::default(),
        }
    }
}

impl ProfileSource for StateSnapshot {
    fn contact_photo(&self, address: &Address) -> Option<Bytes> {
        self.photos.get(address).cloned()
    }

    fn local_address(&self) -> Option<Address> {
        self.local_address.clone()
    }
}
