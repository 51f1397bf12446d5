pub mod digest;

pub use digest::{sha256_bytes, sha256_hex};
