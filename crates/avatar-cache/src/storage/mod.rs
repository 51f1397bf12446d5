//! Concrete stores for the disk tier and the fingerprint ledger

pub mod bitmap_store;
pub mod key_value;

pub use bitmap_store::{MemoryBitmapStore, SandboxedBitmapStore};
pub use key_value::{JsonFileKeyValueStore, MemoryKeyValueStore};
