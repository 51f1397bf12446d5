//! Avatar service: the composition of every cache tier

use serde::Serialize;
use std::{num::NonZeroUsize, sync::Arc};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::{FingerprintLedger, IdentityTokenCache, ImageCache, RequestContentCache};
use crate::{
    config::CacheConfig,
    errors::{AvatarError, AvatarResult},
    models::{AvatarImage, AvatarRequest, AvatarSubject, DisplayParams},
    rendering::AvatarRenderer,
    services::{
        content_resolver::ContentResolver,
        request_resolver::resolve_request,
        signals::StateChange,
        traits::{BitmapStore, KeyValueStore, PolicySource, ProfileSource},
    },
};

/// Everything the service reads from or writes to outside itself
#[derive(Clone)]
pub struct AvatarCollaborators {
    pub policy: Arc<dyn PolicySource>,
    pub profile: Arc<dyn ProfileSource>,
    pub renderer: Arc<dyn AvatarRenderer>,
    pub bitmaps: Arc<dyn BitmapStore>,
    pub ledger_store: Arc<dyn KeyValueStore>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AvatarCacheStats {
    pub identity_tokens: usize,
    pub request_entries: usize,
    pub request_hits: u64,
    pub request_misses: u64,
    pub image_memory_entries: usize,
    pub image_memory_hits: u64,
    pub image_disk_hits: u64,
    pub builds: u64,
    pub failovers: u64,
    pub absences: u64,
    pub disk_write_failures: u64,
}

pub(crate) fn non_zero(value: usize, name: &str) -> AvatarResult<NonZeroUsize> {
    NonZeroUsize::new(value)
        .ok_or_else(|| AvatarError::configuration(format!("{name} must be greater than zero")))
}

/// Avatar rendering service owned by the application's composition root.
///
/// All caches are confined to the owner: every operation takes `&mut self`.
pub struct AvatarService {
    tokens: IdentityTokenCache,
    requests: RequestContentCache,
    images: ImageCache,
    ledger: FingerprintLedger,
    policy: Arc<dyn PolicySource>,
    profile: Arc<dyn ProfileSource>,
    renderer: Arc<dyn AvatarRenderer>,
    signals: Option<broadcast::Receiver<StateChange>>,
}

impl AvatarService {
    pub fn new(config: &CacheConfig, collaborators: AvatarCollaborators) -> AvatarResult<Self> {
        let requests = RequestContentCache::new(non_zero(
            config.request_cache_capacity,
            "cache.request_cache_capacity",
        )?);
        let images = ImageCache::new(
            non_zero(config.image_cache_capacity, "cache.image_cache_capacity")?,
            config.max_memory_side,
            collaborators.bitmaps,
        );

        info!(
            "Avatar service initialized - request cache: {}, image cache: {}, max memory side: {}px",
            config.request_cache_capacity, config.image_cache_capacity, config.max_memory_side
        );

        Ok(Self {
            tokens: IdentityTokenCache::new(),
            requests,
            images,
            ledger: FingerprintLedger::new(collaborators.ledger_store),
            policy: collaborators.policy,
            profile: collaborators.profile,
            renderer: collaborators.renderer,
            signals: None,
        })
    }

    /// Apply state changes from this receiver on every [`drain_signals`](Self::drain_signals)
    #[must_use]
    pub fn with_signals(mut self, receiver: broadcast::Receiver<StateChange>) -> Self {
        self.signals = Some(receiver);
        self
    }

    /// Avatar for a subject, or `None` when the subject is invalid or nothing renders
    pub async fn avatar(
        &mut self,
        subject: &AvatarSubject,
        params: &DisplayParams,
    ) -> Option<AvatarImage> {
        let request = resolve_request(subject, params, self.policy.as_ref(), self.profile.as_ref())?;
        self.avatar_for_request(&request).await
    }

    pub async fn avatar_for_request(&mut self, request: &AvatarRequest) -> Option<AvatarImage> {
        let resolver = ContentResolver::new(self.policy.as_ref(), self.profile.as_ref());
        let content = self.requests.get(request, &mut self.tokens, &resolver);

        let image = self
            .images
            .image(
                &content,
                request.diameter_pixels,
                request.blurred,
                self.renderer.as_ref(),
            )
            .await?;

        if let Some(address) = request.variant.contact_address() {
            self.ledger.record(address, &image.content_fingerprint);
        }
        Some(image)
    }

    /// React to one upstream state change
    pub fn apply(&mut self, change: &StateChange) {
        match change {
            StateChange::ContactsChanged | StateChange::ThemeChanged => {
                debug!("{:?}: clearing request cache ({} entries)", change, self.requests.len());
                self.requests.clear();
            }
            StateChange::ProfileChanged(address) => {
                if self.tokens.invalidate(address) {
                    debug!("Rotated identity token for {}", address);
                }
            }
            StateChange::LocalProfileChanged => {
                if let Some(local) = self.profile.local_address() {
                    self.tokens.invalidate(&local);
                    debug!("Rotated identity token for local user");
                }
            }
        }
    }

    /// Apply every pending signal; returns how many were applied.
    ///
    /// A lagged receiver has missed events it cannot name, so every request cache
    /// entry and identity token is dropped instead.
    pub fn drain_signals(&mut self) -> usize {
        let mut applied = 0;
        loop {
            let Some(receiver) = self.signals.as_mut() else {
                return applied;
            };
            match receiver.try_recv() {
                Ok(change) => {
                    self.apply(&change);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => return applied,
                Err(TryRecvError::Lagged(missed)) => {
                    warn!("Missed {} avatar state changes; clearing request cache", missed);
                    self.requests.clear();
                    self.tokens.clear();
                }
                Err(TryRecvError::Closed) => {
                    debug!("State change channel closed");
                    self.signals = None;
                    return applied;
                }
            }
        }
    }

    pub fn stats(&self) -> AvatarCacheStats {
        let counters = self.images.counters();
        AvatarCacheStats {
            identity_tokens: self.tokens.len(),
            request_entries: self.requests.len(),
            request_hits: self.requests.hits(),
            request_misses: self.requests.misses(),
            image_memory_entries: self.images.memory_len(),
            image_memory_hits: counters.memory_hits,
            image_disk_hits: counters.disk_hits,
            builds: counters.builds,
            failovers: counters.failovers,
            absences: counters.absences,
            disk_write_failures: counters.disk_write_failures,
        }
    }

    /// Drop the in-memory image tier (memory pressure); disk stays intact
    pub fn trim_memory(&mut self) {
        self.images.clear_memory();
    }

    /// Wait for outstanding ledger writes
    pub async fn shutdown(&mut self) {
        self.ledger.flush().await;
        info!("Avatar service stopped");
    }
}
