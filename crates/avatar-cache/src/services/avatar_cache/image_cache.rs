//! Content fingerprint → bitmap cache (memory LRU over an unbounded disk store)

use image::RgbaImage;
use lru::LruCache;
use std::{num::NonZeroUsize, sync::Arc};
use tracing::{debug, trace, warn};

use crate::{
    models::{AvatarImage, ContentDescriptor},
    rendering::{AvatarRenderer, check_size_contract},
    services::traits::BitmapStore,
    utils::sha256_hex,
};

/// Counters for the image tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageCacheCounters {
    pub memory_hits: u64,
    pub disk_hits: u64,
    pub builds: u64,
    pub failovers: u64,
    pub absences: u64,
    pub disk_write_failures: u64,
}

/// Memory key: `fingerprint.diameter.blur`
pub fn image_key(content_fingerprint: &str, diameter: u32, blurred: bool) -> String {
    format!("{content_fingerprint}.{diameter}.{}", u8::from(blurred))
}

/// Filename-safe disk key for a memory key
pub fn disk_key(image_key: &str) -> String {
    sha256_hex(image_key)
}

pub struct ImageCache {
    memory: LruCache<String, AvatarImage>,
    disk: Arc<dyn BitmapStore>,
    /// Bitmaps with a larger side are only kept on disk
    max_memory_side: u32,
    counters: ImageCacheCounters,
}

impl ImageCache {
    pub fn new(capacity: NonZeroUsize, max_memory_side: u32, disk: Arc<dyn BitmapStore>) -> Self {
        Self {
            memory: LruCache::new(capacity),
            disk,
            max_memory_side,
            counters: ImageCacheCounters::default(),
        }
    }

    /// Bitmap for content at a diameter, building it on a miss.
    ///
    /// Tries memory, then disk, then renders the primary content and each failover
    /// in turn. Returns `None` only when every descriptor in the chain fails.
    pub async fn image(
        &mut self,
        content: &ContentDescriptor,
        diameter: u32,
        blurred: bool,
        renderer: &dyn AvatarRenderer,
    ) -> Option<AvatarImage> {
        let fingerprint = content.fingerprint();
        let key = image_key(&fingerprint, diameter, blurred);

        if let Some(image) = self.lookup(&key, &fingerprint, diameter).await {
            return Some(image);
        }

        let Some(bitmap) = self.build(content, diameter, renderer) else {
            self.counters.absences += 1;
            warn!("Could not build avatar for {} at {}px", fingerprint, diameter);
            return None;
        };

        let image = AvatarImage::new(bitmap, fingerprint);
        self.persist(&key, &image).await;
        self.remember(key, image.clone());
        Some(image)
    }

    /// Lookup-only variant: memory then disk, never renders
    pub async fn cached_image(
        &mut self,
        content_fingerprint: &str,
        diameter: u32,
        blurred: bool,
    ) -> Option<AvatarImage> {
        let key = image_key(content_fingerprint, diameter, blurred);
        self.lookup(&key, content_fingerprint, diameter).await
    }

    /// Memory then disk. A disk entry that breaks the size contract is a miss,
    /// so the caller rebuilds and overwrites it.
    async fn lookup(&mut self, key: &str, fingerprint: &str, diameter: u32) -> Option<AvatarImage> {
        if let Some(image) = self.memory.get(key) {
            self.counters.memory_hits += 1;
            trace!("Image memory hit: {}", key);
            return Some(image.clone());
        }

        let digest = disk_key(key);
        match self.disk.read_bitmap(&digest).await {
            Ok(Some(bitmap)) => {
                if let Err(e) = check_size_contract(&bitmap, diameter) {
                    debug!("Treating disk entry {} as a miss: {}", digest, e);
                    return None;
                }
                self.counters.disk_hits += 1;
                trace!("Image disk hit: {} ({})", key, digest);
                let image = AvatarImage::new(bitmap, fingerprint);
                self.remember(key.to_string(), image.clone());
                Some(image)
            }
            Ok(None) => None,
            Err(e) => {
                debug!("Treating unreadable disk entry {} as a miss: {}", digest, e);
                None
            }
        }
    }

    fn build(
        &mut self,
        content: &ContentDescriptor,
        diameter: u32,
        renderer: &dyn AvatarRenderer,
    ) -> Option<RgbaImage> {
        for (attempt, kind) in content.chain().enumerate() {
            let rendered = renderer
                .render(kind, diameter)
                .and_then(|bitmap| check_size_contract(&bitmap, diameter).map(|()| bitmap));

            match rendered {
                Ok(bitmap) => {
                    self.counters.builds += 1;
                    if attempt > 0 {
                        self.counters.failovers += 1;
                        debug!("Rendered failover {} for {}", kind.fingerprint(), content.fingerprint());
                    } else {
                        debug!("Rendered {} at {}px", kind.fingerprint(), diameter);
                    }
                    return Some(bitmap);
                }
                Err(e) if e.is_content_specific() => {
                    debug!("Render of {} failed: {}", kind.fingerprint(), e);
                }
                Err(e) => {
                    debug!("Render of {} failed: {}", kind.fingerprint(), e);
                    break;
                }
            }
        }
        None
    }

    async fn persist(&mut self, key: &str, image: &AvatarImage) {
        let digest = disk_key(key);
        if let Err(e) = self.disk.write_bitmap(&digest, &image.bitmap).await {
            self.counters.disk_write_failures += 1;
            warn!("Failed to persist avatar {} to disk: {}", key, e);
        } else {
            debug!("Persisted avatar {} as {}", key, digest);
        }
    }

    fn remember(&mut self, key: String, image: AvatarImage) {
        if image.side() <= self.max_memory_side {
            self.memory.put(key, image);
        } else {
            trace!("Keeping {}px avatar {} on disk only", image.side(), key);
        }
    }

    /// Drop the memory tier; disk entries are untouched
    pub fn clear_memory(&mut self) {
        self.memory.clear();
    }

    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    pub fn counters(&self) -> ImageCacheCounters {
        self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{RenderError, RenderResult, StorageError, StorageResult},
        models::{AvatarGradient, ContentKind, IconGlyph, TemplateImage, ThemeId},
        rendering::BasicRenderer,
        storage::MemoryBitmapStore,
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use tracing_test::traced_test;

    fn cache(max_memory_side: u32, disk: Arc<dyn BitmapStore>) -> ImageCache {
        ImageCache::new(NonZeroUsize::new(16).unwrap(), max_memory_side, disk)
    }

    fn icon() -> ContentDescriptor {
        ContentDescriptor::new(ContentKind::Glyph {
            glyph: IconGlyph::Person,
            theme: ThemeId::default(),
        })
    }

    struct FailingDisk;

    #[async_trait]
    impl BitmapStore for FailingDisk {
        async fn read_bitmap(&self, _key: &str) -> StorageResult<Option<RgbaImage>> {
            Ok(None)
        }

        async fn write_bitmap(&self, _key: &str, _bitmap: &RgbaImage) -> StorageResult<()> {
            Err(StorageError::BlobStore(avatar_blob_store::BlobStoreError::Permission {
                operation: "write".into(),
                path: "/read-only".into(),
            }))
        }
    }

    /// Returns a bitmap larger than requested
    struct OversizedRenderer;

    impl AvatarRenderer for OversizedRenderer {
        fn render_bytes(&self, _data: &[u8], diameter: u32) -> RenderResult<RgbaImage> {
            Ok(RgbaImage::new(diameter + 1, diameter + 1))
        }
        fn render_text(&self, _: &str, _: &ThemeId, d: u32) -> RenderResult<RgbaImage> {
            Ok(RgbaImage::new(d, d / 2))
        }
        fn render_template(&self, _: TemplateImage, _: &ThemeId, d: u32) -> RenderResult<RgbaImage> {
            Ok(RgbaImage::new(d, d))
        }
        fn render_glyph(&self, _: IconGlyph, _: &ThemeId, _: u32) -> RenderResult<RgbaImage> {
            Err(RenderError::EmptyText)
        }
        fn render_gradient(&self, _: &AvatarGradient, _: u32) -> RenderResult<RgbaImage> {
            Err(RenderError::EmptyText)
        }
    }

    #[test]
    fn test_keys() {
        assert_eq!(image_key("text:\"JD\":blue", 96, false), "text:\"JD\":blue.96.0");
        assert_eq!(image_key("gradient:x", 48, true), "gradient:x.48.1");
        assert_eq!(disk_key("a.96.0"), sha256_hex("a.96.0"));
        assert_eq!(disk_key("a.96.0").len(), 64);
    }

    #[tokio::test]
    async fn test_memory_then_disk() {
        let disk = Arc::new(MemoryBitmapStore::new());
        let mut cache = cache(200, disk.clone());
        let renderer = BasicRenderer::new();

        let built = cache.image(&icon(), 96, false, &renderer).await.unwrap();
        assert_eq!(disk.len(), 1);
        assert_eq!(cache.counters().builds, 1);

        cache.image(&icon(), 96, false, &renderer).await.unwrap();
        assert_eq!(cache.counters().memory_hits, 1);

        cache.clear_memory();
        let reloaded = cache.image(&icon(), 96, false, &renderer).await.unwrap();
        assert_eq!(cache.counters().disk_hits, 1);
        assert_eq!(cache.counters().builds, 1);
        assert_eq!(*reloaded.bitmap, *built.bitmap);
        assert_eq!(reloaded.content_fingerprint, built.content_fingerprint);
    }

    #[tokio::test]
    async fn test_large_bitmaps_stay_on_disk() {
        let disk = Arc::new(MemoryBitmapStore::new());
        let mut cache = cache(64, disk.clone());
        let renderer = BasicRenderer::new();

        cache.image(&icon(), 96, false, &renderer).await.unwrap();
        assert_eq!(cache.memory_len(), 0);
        assert_eq!(disk.len(), 1);

        cache.image(&icon(), 48, false, &renderer).await.unwrap();
        assert_eq!(cache.memory_len(), 1);
    }

    #[tokio::test]
    async fn test_failover_on_corrupt_bytes() {
        let mut cache = cache(200, Arc::new(MemoryBitmapStore::new()));
        let renderer = BasicRenderer::new();
        let fallback = ContentKind::Template {
            template: TemplateImage::DefaultContact,
            theme: ThemeId::new("crimson"),
        };
        let content = ContentDescriptor::new(ContentKind::bytes(Bytes::from_static(b"\x89PNG\r\n\x1a\ncorrupt")))
            .with_failover(fallback.clone());

        let image = cache.image(&content, 96, false, &renderer).await.unwrap();
        let expected = renderer.render(&fallback, 96).unwrap();
        assert_eq!(*image.bitmap, expected);
        assert_eq!(cache.counters().failovers, 1);
    }

    #[tokio::test]
    async fn test_absence_when_chain_fails() {
        let mut cache = cache(200, Arc::new(MemoryBitmapStore::new()));
        let content = ContentDescriptor::new(ContentKind::bytes(Bytes::from_static(b"junk")))
            .with_failover(ContentKind::text("ÉÖ", ThemeId::default()));

        assert!(cache.image(&content, 96, false, &BasicRenderer::new()).await.is_none());
        assert_eq!(cache.counters().absences, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_absence_is_logged() {
        let mut cache = cache(200, Arc::new(MemoryBitmapStore::new()));
        let content = ContentDescriptor::new(ContentKind::bytes(Bytes::from_static(b"junk")));

        assert!(cache.image(&content, 40, false, &BasicRenderer::new()).await.is_none());
        assert!(logs_contain("Could not build avatar"));
        assert!(logs_contain("at 40px"));
    }

    #[tokio::test]
    async fn test_contract_violations_fail_over() {
        let mut cache = cache(200, Arc::new(MemoryBitmapStore::new()));
        let content = ContentDescriptor::new(ContentKind::bytes(Bytes::from_static(b"x")))
            .with_failover(ContentKind::Template {
                template: TemplateImage::DefaultContact,
                theme: ThemeId::default(),
            });

        let image = cache.image(&content, 32, false, &OversizedRenderer).await.unwrap();
        assert_eq!(image.bitmap.dimensions(), (32, 32));

        let non_square = ContentDescriptor::new(ContentKind::text("AB", ThemeId::default()));
        assert!(cache.image(&non_square, 32, false, &OversizedRenderer).await.is_none());
    }

    #[tokio::test]
    async fn test_disk_write_failure_still_returns_image() {
        let mut cache = cache(200, Arc::new(FailingDisk));
        let image = cache.image(&icon(), 48, false, &BasicRenderer::new()).await;

        assert!(image.is_some());
        assert_eq!(cache.counters().disk_write_failures, 1);
        assert_eq!(cache.memory_len(), 1);
    }

    #[tokio::test]
    async fn test_cached_image_never_renders() {
        let disk = Arc::new(MemoryBitmapStore::new());
        let mut primary = cache(200, disk.clone());
        let mut secondary = cache(200, disk);
        let fingerprint = icon().fingerprint();

        assert!(secondary.cached_image(&fingerprint, 48, false).await.is_none());
        primary.image(&icon(), 48, false, &BasicRenderer::new()).await.unwrap();

        let image = secondary.cached_image(&fingerprint, 48, false).await.unwrap();
        assert_eq!(image.content_fingerprint, fingerprint);
        assert_eq!(secondary.counters().builds, 0);
    }

    #[tokio::test]
    async fn test_oversized_disk_entry_is_rebuilt() {
        let disk = Arc::new(MemoryBitmapStore::new());
        let key = disk_key(&image_key(&icon().fingerprint(), 48, false));
        disk.write_bitmap(&key, &RgbaImage::new(100, 100)).await.unwrap();

        let mut cache = cache(200, disk.clone());
        assert!(cache.cached_image(&icon().fingerprint(), 48, false).await.is_none());

        let image = cache.image(&icon(), 48, false, &BasicRenderer::new()).await.unwrap();
        assert_eq!(image.bitmap.dimensions(), (48, 48));
        assert_eq!(cache.counters().disk_hits, 0);
        assert_eq!(cache.counters().builds, 1);

        let stored = disk.read_bitmap(&key).await.unwrap().unwrap();
        assert_eq!(stored.dimensions(), (48, 48));
    }
}
