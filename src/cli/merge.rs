//! Merge command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::MergeConfig;
use crate::render::{write_manifest, ManifestOptions};

/// Where the sources come from and where the bundle goes.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Directory the configured files are looked up in [default: src]
    #[arg(short = 'd', long, value_name = "DIR", env = "MERGE_SOURCES_SRC_DIR")]
    pub src_dir: Option<PathBuf>,

    /// File to (over)write with the merged sources [default: merged_output.txt]
    #[arg(short, long, value_name = "FILE", env = "MERGE_SOURCES_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Files to merge, in order (repeatable or comma-separated; replaces the configured list)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "NAMES",
        value_delimiter = ',',
        env = "MERGE_SOURCES_FILES"
    )]
    pub files: Vec<String>,

    /// Path to config file (merge-sources.toml or .merge-sources.yml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Decode non-UTF-8 sources with a detected encoding instead of failing
    #[arg(long)]
    pub lossy: bool,
}

impl SourceArgs {
    /// Resolve the effective config: flags and env over the config file over defaults.
    pub fn resolve(&self) -> Result<MergeConfig> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        let file_config = load_config(&cwd, self.config.as_deref())?;

        let overrides = CliOverrides {
            src_dir: self.src_dir.clone(),
            output: self.output.clone(),
            files: self
                .files
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            lossy: self.lossy,
        };
        let config = merge_cli_with_config(file_config, overrides);
        tracing::debug!(
            "Resolved config: src_dir={} output={} files={}",
            config.src_dir.display(),
            config.output.display(),
            config.files.len()
        );
        Ok(config)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct MergeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Also write a JSON manifest of the merged blocks to this path
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Omit the timestamp from the manifest for reproducible diffs
    #[arg(long)]
    pub no_timestamp: bool,
}

pub fn run(args: MergeArgs) -> Result<()> {
    let config = args.source.resolve()?;

    let stdout = std::io::stdout();
    let mut diag = stdout.lock();
    let report = crate::merge::run(&config, &mut diag)?;

    if let Some(manifest_path) = &args.manifest {
        let options = ManifestOptions { include_timestamp: !args.no_timestamp };
        write_manifest(manifest_path, &config, &report, options)?;
    }

    Ok(())
}
