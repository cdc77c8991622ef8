//! Error types for a merge run.
//!
//! A missing source file is not represented here: it is reported and skipped.
//! Everything below aborts the run and may leave a partially written output.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MergeError>;

#[derive(Error, Debug)]
pub enum MergeError {
    /// Output could not be created or truncated
    #[error("Failed to create output file {}: {source}", path.display())]
    CreateOutput { path: PathBuf, source: std::io::Error },

    /// A source that exists could not be read
    #[error("Failed to read source file {}: {source}", path.display())]
    ReadSource { path: PathBuf, source: std::io::Error },

    /// A source is not valid UTF-8 and lossy decoding is off
    #[error("Source file {} is not valid UTF-8: {source}", path.display())]
    Decode { path: PathBuf, source: std::str::Utf8Error },

    #[error("Failed to write output file {}: {source}", path.display())]
    WriteOutput { path: PathBuf, source: std::io::Error },

    /// Warnings or the completion line could not be written
    #[error("Failed to write diagnostics: {source}")]
    Diagnostic { source: std::io::Error },

    #[error("Failed to write manifest {}: {source}", path.display())]
    Manifest { path: PathBuf, source: std::io::Error },

    #[error("Failed to serialize manifest: {0}")]
    Serialization(#[from] serde_json::Error),
}
