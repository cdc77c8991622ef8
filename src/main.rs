//! merge-sources: bundle a fixed list of source files into a single text file

use anyhow::Result;

fn main() -> Result<()> {
    merge_sources::cli::run()
}
