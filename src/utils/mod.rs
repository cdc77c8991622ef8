//! Shared helpers: text decoding and content hashing

pub mod encoding;
pub mod hashing;

pub use encoding::{detect_encoding, read_source_text};
pub use hashing::sha256_hex;
