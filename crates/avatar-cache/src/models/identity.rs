//! Subject identities: contact addresses, group ids and themes

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// A contact address, either a service UUID or an E.164 phone number.
///
/// Addresses are unstable as cache keys (a contact can gain a UUID, change number,
/// or re-register), which is why request fingerprints never embed them directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Parse and normalize a raw address. Malformed input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(uuid) = Uuid::parse_str(raw) {
            return Some(Self(uuid.hyphenated().to_string()));
        }

        let digits = raw.strip_prefix('+')?;
        let valid = (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit())
            && !digits.starts_with('0');
        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group identifier (opaque, non-empty)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The entity an avatar represents, as seen by policy lookups
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectIdentity {
    Contact(Address),
    Group(GroupId),
}

impl SubjectIdentity {
    /// Stable seed used to derive a blur gradient
    pub fn seed(&self) -> String {
        match self {
            Self::Contact(address) => format!("contact:{address}"),
            Self::Group(group_id) => format!("group:{group_id}"),
        }
    }
}

/// Color theme identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self(crate::config::defaults::DEFAULT_THEME.to_string())
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid_normalizes_case() {
        let address = Address::parse("  6B5F4A6E-1C2D-4E3F-8A9B-0C1D2E3F4A5B ").unwrap();
        assert_eq!(address.as_str(), "6b5f4a6e-1c2d-4e3f-8a9b-0c1d2e3f4a5b");
    }

    #[test]
    fn test_parse_phone_numbers() {
        assert!(Address::parse("+14155550123").is_some());
        assert!(Address::parse("14155550123").is_none());
        assert!(Address::parse("+1415").is_none());
        assert!(Address::parse("+0123456789").is_none());
        assert!(Address::parse("+1415555x123").is_none());
        assert!(Address::parse("").is_none());
    }

    #[test]
    fn test_group_id_rejects_empty() {
        assert!(GroupId::new("   ").is_none());
        assert_eq!(GroupId::new(" g1 ").unwrap().as_str(), "g1");
    }
}
