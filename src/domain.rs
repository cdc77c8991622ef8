//! Core types shared by the merger, the config loader and the CLI.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SRC_DIR: &str = "src";
pub const DEFAULT_OUTPUT: &str = "merged_output.txt";

/// Files bundled when no list is configured, in output order.
pub const DEFAULT_FILES: &[&str] = &[
    "Board.cpp",
    "Board.hpp",
    "DrawUtils.cpp",
    "DrawUtils.hpp",
    "Game.cpp",
    "Game.hpp",
    "InputHandler.cpp",
    "InputHandler.hpp",
    "main.cpp",
    "Shape.cpp",
    "Shape.hpp",
    "SoundManager.cpp",
    "SoundManager.hpp",
];

pub const MANIFEST_SCHEMA_VERSION: &str = "1.0.0";

/// Everything one merge run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// Directory every configured name is resolved against
    pub src_dir: PathBuf,
    /// File that is truncated and rewritten on every run
    pub output: PathBuf,
    /// Names to include; order is output order and duplicates are kept
    #[serde(deserialize_with = "deserialize_string_or_list")]
    pub files: Vec<String>,
    /// Decode non-UTF-8 sources with a detected encoding instead of failing
    pub lossy: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from(DEFAULT_SRC_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            files: DEFAULT_FILES.iter().map(|s| s.to_string()).collect(),
            lossy: false,
        }
    }
}

impl MergeConfig {
    pub fn new(
        src_dir: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        files: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            src_dir: src_dir.into(),
            output: output.into(),
            files: files.into_iter().map(Into::into).collect(),
            lossy: false,
        }
    }

    pub fn with_lossy(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    /// Path a configured name resolves to.
    ///
    /// Uses platform join semantics, so an absolute name replaces the directory.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.src_dir.join(name)
    }
}

/// Accept either `["a", "b"]` or `"a, b"`.
fn deserialize_string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::String(s) => split_names(&s),
        StringOrList::List(items) => {
            items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
        }
    })
}

/// Split a comma-separated list of names, trimming whitespace and dropping empties.
pub fn split_names(value: &str) -> Vec<String> {
    value.split(',').map(str::trim).filter(|part| !part.is_empty()).map(String::from).collect()
}

/// One configured name after lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEntry {
    Present { name: String, path: PathBuf, content: String },
    /// The name did not resolve to anything on disk.
    Missing { name: String, path: PathBuf },
}

/// A block that made it into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub name: String,
    /// Length of the source content in bytes, excluding header and separator
    pub bytes: usize,
    pub sha256: String,
}

/// What a finished run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub blocks: Vec<BlockSummary>,
    pub missing: Vec<String>,
    /// Bytes written to the output, headers and separators included
    pub total_bytes: u64,
}

impl MergeReport {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self { output: output.into(), ..Self::default() }
    }

    pub fn blocks_written(&self) -> usize {
        self.blocks.len()
    }
}
