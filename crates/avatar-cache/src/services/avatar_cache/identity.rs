use std::collections::HashMap;
use uuid::Uuid;

use crate::models::Address;

/// Maps unstable contact addresses to revocable opaque tokens.
///
/// Request fingerprints embed the token instead of the address. Invalidating an
/// address drops its token, so the next fingerprint differs and every request
/// cache entry built from the old token becomes unreachable without a scan.
#[derive(Debug, Default)]
pub struct IdentityTokenCache {
    tokens: HashMap<Address, String>,
}

impl IdentityTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for an address, created on first use
    pub fn token(&mut self, address: &Address) -> String {
        self.tokens
            .entry(address.clone())
            .or_insert_with(|| Uuid::new_v4().simple().to_string())
            .clone()
    }

    /// Forget an address's token. Downstream caches are untouched.
    pub fn invalidate(&mut self, address: &Address) -> bool {
        self.tokens.remove(address).is_some()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_stable_until_invalidated() {
        let mut tokens = IdentityTokenCache::new();
        let jane = Address::parse("+14155550123").unwrap();
        let john = Address::parse("+14155550124").unwrap();

        let first = tokens.token(&jane);
        assert_eq!(tokens.token(&jane), first);
        assert_ne!(tokens.token(&john), first);
        assert_eq!(tokens.len(), 2);

        assert!(tokens.invalidate(&jane));
        assert!(!tokens.invalidate(&jane));
        assert_ne!(tokens.token(&jane), first);
    }
}
