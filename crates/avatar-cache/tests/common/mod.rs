//! Shared fixtures for integration tests

#![allow(dead_code)]

use bytes::Bytes;
use image::{ImageFormat, RgbaImage};
use std::{
    io::Cursor,
    path::Path,
    sync::{
        Arc, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use avatar_cache::{
    config::CacheConfig,
    errors::RenderResult,
    models::{
        Address, AvatarGradient, IconGlyph, NameComponents, SubjectIdentity, TemplateImage, ThemeId,
    },
    rendering::{AvatarRenderer, BasicRenderer},
    services::{
        AvatarCollaborators, AvatarService, BitmapStore, KeyValueStore, PolicySource,
        ProfileSource, StateSnapshot,
    },
};

pub const JANE: &str = "+14155550123";
pub const JOHN: &str = "+14155550124";

pub fn address(raw: &str) -> Address {
    Address::parse(raw).expect("valid test address")
}

/// Policy/profile state the test can change between asks
#[derive(Default)]
pub struct LiveState(RwLock<StateSnapshot>);

impl LiveState {
    pub fn new(snapshot: StateSnapshot) -> Arc<Self> {
        Arc::new(Self(RwLock::new(snapshot)))
    }

    pub fn update(&self, change: impl FnOnce(&mut StateSnapshot)) {
        let mut snapshot = self.0.write().unwrap();
        change(&mut *snapshot);
    }
}

impl PolicySource for LiveState {
    fn should_blur(&self, subject: &SubjectIdentity) -> bool {
        self.0.read().unwrap().should_blur(subject)
    }

    fn display_theme(&self, subject: &SubjectIdentity) -> ThemeId {
        self.0.read().unwrap().display_theme(subject)
    }

    fn display_name(&self, subject: &SubjectIdentity) -> NameComponents {
        self.0.read().unwrap().display_name(subject)
    }
}

impl ProfileSource for LiveState {
    fn contact_photo(&self, address: &Address) -> Option<Bytes> {
        self.0.read().unwrap().contact_photo(address)
    }

    fn local_address(&self) -> Option<Address> {
        self.0.read().unwrap().local_address()
    }
}

/// Basic renderer that counts every render call
#[derive(Default)]
pub struct CountingRenderer {
    inner: BasicRenderer,
    calls: AtomicUsize,
}

impl CountingRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl AvatarRenderer for CountingRenderer {
    fn render_bytes(&self, data: &[u8], diameter: u32) -> RenderResult<RgbaImage> {
        self.count();
        self.inner.render_bytes(data, diameter)
    }

    fn render_text(&self, text: &str, theme: &ThemeId, diameter: u32) -> RenderResult<RgbaImage> {
        self.count();
        self.inner.render_text(text, theme, diameter)
    }

    fn render_template(
        &self,
        template: TemplateImage,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage> {
        self.count();
        self.inner.render_template(template, theme, diameter)
    }

    fn render_glyph(
        &self,
        glyph: IconGlyph,
        theme: &ThemeId,
        diameter: u32,
    ) -> RenderResult<RgbaImage> {
        self.count();
        self.inner.render_glyph(glyph, theme, diameter)
    }

    fn render_gradient(&self, gradient: &AvatarGradient, diameter: u32) -> RenderResult<RgbaImage> {
        self.count();
        self.inner.render_gradient(gradient, diameter)
    }
}

pub fn build_service(
    state: Arc<LiveState>,
    renderer: Arc<CountingRenderer>,
    bitmaps: Arc<dyn BitmapStore>,
    ledger_store: Arc<dyn KeyValueStore>,
    config: &CacheConfig,
) -> AvatarService {
    AvatarService::new(
        config,
        AvatarCollaborators {
            policy: state.clone(),
            profile: state,
            renderer,
            bitmaps,
            ledger_store,
        },
    )
    .expect("valid cache config")
}

/// Solid-color photo encoded as PNG
pub fn photo_bytes(width: u32, height: u32, color: [u8; 4]) -> Bytes {
    let bitmap = RgbaImage::from_pixel(width, height, image::Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    bitmap
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode test photo");
    Bytes::from(buffer.into_inner())
}

pub fn write_photo(path: &Path, width: u32, height: u32, color: [u8; 4]) {
    std::fs::write(path, photo_bytes(width, height, color)).expect("write test photo");
}
