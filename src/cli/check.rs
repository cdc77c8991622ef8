//! Check command implementation

use anyhow::Result;
use clap::Args;

use super::merge::SourceArgs;
use crate::domain::MergeConfig;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// What a merge would do with one configured name, without reading its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileState {
    /// Regular file of this many bytes; it becomes a block
    Present(u64),
    /// Nothing at the resolved path; the merge warns and skips it
    Missing,
    /// Something exists but is not a readable file; the merge would abort on it
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub name: String,
    pub state: FileState,
}

pub fn file_statuses(config: &MergeConfig) -> Vec<FileStatus> {
    config
        .files
        .iter()
        .map(|name| {
            let path = config.resolve(name);
            let state = if !path.exists() {
                FileState::Missing
            } else {
                match std::fs::metadata(&path) {
                    Ok(meta) if meta.is_file() => FileState::Present(meta.len()),
                    Ok(_) => FileState::Unreadable("not a regular file".to_string()),
                    Err(e) => FileState::Unreadable(e.to_string()),
                }
            };
            FileStatus { name: name.clone(), state }
        })
        .collect()
}

pub fn run(args: CheckArgs) -> Result<()> {
    let config = args.source.resolve()?;
    let statuses = file_statuses(&config);

    println!("Source directory: {}", config.src_dir.display());
    println!("Output file: {}", config.output.display());
    for status in &statuses {
        match &status.state {
            FileState::Present(bytes) => println!("ok         {} ({} bytes)", status.name, bytes),
            FileState::Missing => println!("missing    {}", status.name),
            FileState::Unreadable(reason) => println!("unreadable {} ({})", status.name, reason),
        }
    }
    let present = statuses.iter().filter(|s| matches!(s.state, FileState::Present(_))).count();
    println!("{} of {} files present", present, statuses.len());

    Ok(())
}
