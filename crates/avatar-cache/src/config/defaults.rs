/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Cache defaults
pub const DEFAULT_REQUEST_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_IMAGE_CACHE_CAPACITY: usize = 128;
// Bitmaps with a side above this stay on disk only
pub const DEFAULT_MAX_MEMORY_SIDE: u32 = 200;

// Storage defaults
pub const DEFAULT_BLOB_DIRECTORY: &str = "./data/avatars";
pub const DEFAULT_LEDGER_FILE: &str = "./data/avatar-ledger.json";

// Rendering defaults
pub const DEFAULT_DIAMETER_POINTS: f32 = 36.0;
pub const DEFAULT_DISPLAY_SCALE: f32 = 2.0;
pub const DEFAULT_THEME: &str = "default";
// Largest avatar side ever rendered; larger asks get no avatar
pub const MAX_DIAMETER_PIXELS: u32 = 2048;

// Ledger key namespace
pub const LEDGER_KEY_PREFIX: &str = "avatar_fingerprint.";

// Signal bus
pub const STATE_CHANGE_CHANNEL_CAPACITY: usize = 100;
