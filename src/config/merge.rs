//! Apply command-line (and environment) overrides on top of a loaded config.

use crate::domain::MergeConfig;
use std::path::PathBuf;

/// Values supplied on the command line or through the environment.
///
/// `None` (or an empty `files`) means "not given", leaving the file value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub src_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub files: Vec<String>,
    pub lossy: bool,
}

pub fn merge_cli_with_config(mut config: MergeConfig, cli: CliOverrides) -> MergeConfig {
    if let Some(src_dir) = cli.src_dir {
        config.src_dir = src_dir;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if !cli.files.is_empty() {
        config.files = cli.files;
    }
    // A flag can switch lossy decoding on but never off.
    config.lossy |= cli.lossy;
    config
}
