//! merge-sources: concatenate an ordered list of source files into one bundle
//!
//! Each configured file is looked up under a source directory and appended to a
//! single output file behind a `// --- <name> ---` header. Missing files are
//! reported and skipped.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod merge;
pub mod render;
pub mod utils;

pub use domain::{MergeConfig, MergeReport, SourceEntry};
pub use error::MergeError;
pub use merge::{entries, merge_into, run};
