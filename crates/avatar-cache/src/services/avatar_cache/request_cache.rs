use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::trace;

use super::IdentityTokenCache;
use crate::{
    models::{AvatarRequest, ContentDescriptor},
    services::content_resolver::ContentResolver,
};

/// Request fingerprint → content descriptor LRU
pub struct RequestContentCache {
    entries: LruCache<String, ContentDescriptor>,
    hits: u64,
    misses: u64,
}

impl RequestContentCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Content for a request, resolving and storing on a miss.
    ///
    /// Requests without a fingerprint are resolved every time and never stored.
    pub fn get(
        &mut self,
        request: &AvatarRequest,
        tokens: &mut IdentityTokenCache,
        resolver: &ContentResolver<'_>,
    ) -> ContentDescriptor {
        let Some(fingerprint) = request.fingerprint(tokens) else {
            self.misses += 1;
            return resolver.resolve(request);
        };

        if let Some(content) = self.entries.get(&fingerprint) {
            self.hits += 1;
            trace!("Request cache hit: {}", fingerprint);
            return content.clone();
        }

        self.misses += 1;
        trace!("Request cache miss: {}", fingerprint);
        let content = resolver.resolve(request);
        self.entries.put(fingerprint, content.clone());
        content
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
