//! Lookup-only avatar access for memory-constrained secondary processes

use std::sync::Arc;
use tracing::{debug, trace};

use super::{FingerprintLedger, IdentityTokenCache, ImageCache, RequestContentCache, service::non_zero};
use crate::{
    config::CacheConfig,
    errors::AvatarResult,
    models::{AvatarImage, AvatarRequest, AvatarSubject, DisplayParams},
    services::{
        content_resolver::ContentResolver,
        request_resolver::resolve_request,
        signals::StateChange,
        traits::{BitmapStore, KeyValueStore, PolicySource, ProfileSource},
    },
};

/// Reads bitmaps the main process already built; never renders.
///
/// Shares the disk store and the ledger store with the main process.
pub struct SecondaryAvatarService {
    tokens: IdentityTokenCache,
    requests: RequestContentCache,
    images: ImageCache,
    ledger: FingerprintLedger,
    policy: Arc<dyn PolicySource>,
    profile: Arc<dyn ProfileSource>,
}

impl SecondaryAvatarService {
    pub fn new(
        config: &CacheConfig,
        policy: Arc<dyn PolicySource>,
        profile: Arc<dyn ProfileSource>,
        bitmaps: Arc<dyn BitmapStore>,
        ledger_store: Arc<dyn KeyValueStore>,
    ) -> AvatarResult<Self> {
        Ok(Self {
            tokens: IdentityTokenCache::new(),
            requests: RequestContentCache::new(non_zero(
                config.request_cache_capacity,
                "cache.request_cache_capacity",
            )?),
            images: ImageCache::new(
                non_zero(config.image_cache_capacity, "cache.image_cache_capacity")?,
                config.max_memory_side,
                bitmaps,
            ),
            ledger: FingerprintLedger::new(ledger_store),
            policy,
            profile,
        })
    }

    pub async fn avatar(
        &mut self,
        subject: &AvatarSubject,
        params: &DisplayParams,
    ) -> Option<AvatarImage> {
        let request = resolve_request(subject, params, self.policy.as_ref(), self.profile.as_ref())?;
        self.avatar_for_request(&request).await
    }

    /// Cached bitmap for a request.
    ///
    /// Looks up the locally resolved content first; for contact identities a miss
    /// retries with the fingerprint the main process recorded in the ledger.
    pub async fn avatar_for_request(&mut self, request: &AvatarRequest) -> Option<AvatarImage> {
        let resolver = ContentResolver::new(self.policy.as_ref(), self.profile.as_ref());
        let content = self.requests.get(request, &mut self.tokens, &resolver);
        let fingerprint = content.fingerprint();

        if let Some(image) = self
            .images
            .cached_image(&fingerprint, request.diameter_pixels, request.blurred)
            .await
        {
            return Some(image);
        }

        let Some(address) = request.variant.contact_address() else {
            trace!("No cached avatar for {}", fingerprint);
            return None;
        };

        let recorded = self.ledger.lookup(address).await?;
        if recorded == fingerprint {
            return None;
        }

        debug!("Retrying {} with ledger fingerprint {}", address, recorded);
        self.images
            .cached_image(&recorded, request.diameter_pixels, request.blurred)
            .await
    }

    pub fn apply(&mut self, change: &StateChange) {
        match change {
            StateChange::ContactsChanged | StateChange::ThemeChanged => self.requests.clear(),
            StateChange::ProfileChanged(address) => {
                self.tokens.invalidate(address);
            }
            StateChange::LocalProfileChanged => {
                if let Some(local) = self.profile.local_address() {
                    self.tokens.invalidate(&local);
                }
            }
        }
    }
}
