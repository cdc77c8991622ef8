//! Output rendering beyond the merged file itself

pub mod manifest;

pub use manifest::{write_manifest, ManifestOptions};
