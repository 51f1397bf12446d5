use serde::{Deserialize, Serialize};

/// Longest abbreviation still legible inside a small avatar
pub const MAX_INITIALS_LENGTH: usize = 3;

/// Structured display name of a contact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameComponents {
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
}

impl NameComponents {
    /// Split a free-form full name: first word given, last word family, the rest middle.
    pub fn from_full_name(full_name: &str) -> Self {
        let words: Vec<&str> = full_name.split_whitespace().collect();
        match words.as_slice() {
            [] => Self::default(),
            [given] => Self {
                given_name: Some((*given).to_string()),
                ..Self::default()
            },
            [given, middle @ .., family] => Self {
                given_name: Some((*given).to_string()),
                middle_name: (!middle.is_empty()).then(|| middle.join(" ")),
                family_name: Some((*family).to_string()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        [&self.given_name, &self.middle_name, &self.family_name]
            .iter()
            .all(|part| part.as_deref().is_none_or(|s| s.trim().is_empty()))
    }

    /// Uppercased first letter of every name word, in given/middle/family order.
    pub fn abbreviation(&self) -> String {
        [&self.given_name, &self.middle_name, &self.family_name]
            .into_iter()
            .flatten()
            .flat_map(|part| part.split_whitespace())
            .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Abbreviation usable as avatar initials, or `None` when empty or too long.
    pub fn initials(&self) -> Option<String> {
        let abbreviation = self.abbreviation();
        let length = abbreviation.chars().count();
        (1..=MAX_INITIALS_LENGTH)
            .contains(&length)
            .then_some(abbreviation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Jane Doe", Some("JD"))]
    #[case("cher", Some("C"))]
    #[case("Jonathan Q. Public", Some("JQP"))]
    #[case("Mary Ann van Dyke", None)]
    #[case("Ana María de la Cruz", None)]
    #[case("   ", None)]
    #[case("(( ))", None)]
    #[case("éva ölund", Some("ÉÖ"))]
    fn test_initials(#[case] full_name: &str, #[case] expected: Option<&str>) {
        let name = NameComponents::from_full_name(full_name);
        assert_eq!(name.initials().as_deref(), expected);
    }

    #[test]
    fn test_abbreviation_length_four_rejected() {
        let name = NameComponents {
            given_name: Some("Jonathan".to_string()),
            middle_name: Some("Q. R.".to_string()),
            family_name: Some("Public".to_string()),
        };
        assert_eq!(name.abbreviation(), "JQRP");
        assert_eq!(name.initials(), None);
    }

    #[test]
    fn test_from_full_name_components() {
        let name = NameComponents::from_full_name("Jonathan Q. Public");
        assert_eq!(name.given_name.as_deref(), Some("Jonathan"));
        assert_eq!(name.middle_name.as_deref(), Some("Q."));
        assert_eq!(name.family_name.as_deref(), Some("Public"));
        assert!(NameComponents::default().is_empty());
    }
}
