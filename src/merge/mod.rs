//! The file merger.
//!
//! Walks the configured names in order, appends a block per existing file to
//! the output and reports every name that does not resolve to a file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::{BlockSummary, MergeConfig, MergeReport, SourceEntry};
use crate::error::{MergeError, Result};
use crate::utils::{read_source_text, sha256_hex};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Lazy lookup of every configured name, in configured order.
///
/// Each item is produced on demand, so at most one source is held in memory
/// and one input handle open at a time.
pub struct SourceEntries<'a> {
    config: &'a MergeConfig,
    names: std::slice::Iter<'a, String>,
}

impl Iterator for SourceEntries<'_> {
    type Item = Result<SourceEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(lookup(self.config, name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

pub fn entries(config: &MergeConfig) -> SourceEntries<'_> {
    SourceEntries { config, names: config.files.iter() }
}

fn lookup(config: &MergeConfig, name: &str) -> Result<SourceEntry> {
    let path = config.resolve(name);
    if !path.exists() {
        return Ok(SourceEntry::Missing { name: name.to_string(), path });
    }
    let content = read_source_text(&path, config.lossy)?;
    Ok(SourceEntry::Present { name: name.to_string(), path, content })
}

/// Write one `// --- name ---` block and return the number of bytes written.
pub fn write_block<W: Write>(out: &mut W, name: &str, content: &str) -> std::io::Result<u64> {
    let header = format!("// --- {name} ---\n");
    out.write_all(header.as_bytes())?;
    out.write_all(content.as_bytes())?;
    out.write_all(BLOCK_SEPARATOR.as_bytes())?;
    Ok((header.len() + content.len() + BLOCK_SEPARATOR.len()) as u64)
}

/// Merge every configured source into `out`, reporting missing names to `diag`.
///
/// `out` is flushed before returning. The caller owns creating (and truncating)
/// whatever `out` writes to; see [`run`].
pub fn merge_into<W: Write, D: Write>(
    config: &MergeConfig,
    mut out: W,
    diag: &mut D,
) -> Result<MergeReport> {
    let output_path = config.output.clone();
    let write_err =
        |source: std::io::Error| MergeError::WriteOutput { path: output_path.clone(), source };

    let mut report = MergeReport::new(&config.output);
    for entry in entries(config) {
        match entry? {
            SourceEntry::Missing { name, path } => {
                tracing::debug!("Skipping {} (no file at {})", name, path.display());
                writeln!(diag, "Warning: {name} not found.")
                    .map_err(|source| MergeError::Diagnostic { source })?;
                report.missing.push(name);
            }
            SourceEntry::Present { name, path, content } => {
                tracing::debug!("Appending {} ({} bytes)", path.display(), content.len());
                report.total_bytes += write_block(&mut out, &name, &content).map_err(write_err)?;
                report.blocks.push(BlockSummary {
                    sha256: sha256_hex(content.as_bytes()),
                    bytes: content.len(),
                    name,
                });
            }
        }
    }
    out.flush().map_err(write_err)?;

    Ok(report)
}

/// Run a full merge: truncate the output, merge, then confirm on `diag`.
///
/// The output file is created before any source is looked up, so an empty or
/// entirely missing list still leaves an empty file behind. A failure midway
/// leaves whatever was written so far.
pub fn run<D: Write>(config: &MergeConfig, diag: &mut D) -> Result<MergeReport> {
    let file = create_output(&config.output)?;
    let report = merge_into(config, BufWriter::new(file), diag)?;

    writeln!(diag, "All files merged into {}", config.output.display())
        .map_err(|source| MergeError::Diagnostic { source })?;
    tracing::info!(
        blocks = report.blocks_written(),
        missing = report.missing.len(),
        bytes = report.total_bytes,
        "Merged sources into {}",
        config.output.display()
    );
    Ok(report)
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|source| MergeError::CreateOutput { path: PathBuf::from(path), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().expect("tmp");
        let src = tmp.path().join("src");
        fs::create_dir(&src).expect("mkdir src");
        for (name, content) in files {
            fs::write(src.join(name), content).expect("write source");
        }
        tmp
    }

    fn config_for(tmp: &TempDir, names: &[&str]) -> MergeConfig {
        let src = tmp.path().join("src");
        MergeConfig::new(src, tmp.path().join("merged.txt"), names.iter().copied())
    }

    fn run_captured(config: &MergeConfig) -> (MergeReport, String) {
        let mut diag = Vec::new();
        let report = run(config, &mut diag).expect("merge");
        (report, String::from_utf8(diag).expect("utf8 diag"))
    }

    #[test]
    fn write_block_layout() {
        let mut out = Vec::new();
        let n = write_block(&mut out, "a.cpp", "int x;").expect("write");
        assert_eq!(String::from_utf8(out).unwrap(), "// --- a.cpp ---\nint x;\n\n");
        assert_eq!(n, 25);
    }

    #[test]
    fn skips_missing_and_keeps_order() {
        let tmp = fixture(&[("A.txt", "hello"), ("C.txt", "world")]);
        let config = config_for(&tmp, &["A.txt", "B.txt", "C.txt"]);

        let (report, diag) = run_captured(&config);

        let merged = fs::read_to_string(&config.output).expect("read output");
        similar_asserts::assert_eq!(
            merged.as_str(),
            "// --- A.txt ---\nhello\n\n// --- C.txt ---\nworld\n\n"
        );
        assert_eq!(
            diag,
            format!("Warning: B.txt not found.\nAll files merged into {}\n", config.output.display())
        );
        assert_eq!(report.missing, vec!["B.txt"]);
        assert_eq!(report.blocks_written(), 2);
        assert_eq!(report.total_bytes, merged.len() as u64);
    }

    #[test]
    fn duplicates_produce_duplicate_blocks() {
        let tmp = fixture(&[("a", "1"), ("b", "2")]);
        let config = config_for(&tmp, &["b", "a", "b"]);

        run_captured(&config);

        let merged = fs::read_to_string(&config.output).unwrap();
        similar_asserts::assert_eq!(
            merged.as_str(),
            "// --- b ---\n2\n\n// --- a ---\n1\n\n// --- b ---\n2\n\n"
        );
    }

    #[test]
    fn empty_list_leaves_empty_output() {
        let tmp = fixture(&[("a", "1")]);
        let config = config_for(&tmp, &[]);

        let (report, diag) = run_captured(&config);

        assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
        assert_eq!(diag, format!("All files merged into {}\n", config.output.display()));
        assert_eq!(report.total_bytes, 0);
    }

    #[test]
    fn all_missing_warns_in_list_order() {
        let tmp = fixture(&[]);
        let config = config_for(&tmp, &["z", "y", "x"]);

        let (report, diag) = run_captured(&config);

        assert_eq!(fs::read_to_string(&config.output).unwrap(), "");
        let warnings: Vec<&str> = diag.lines().filter(|l| l.starts_with("Warning:")).collect();
        assert_eq!(
            warnings,
            vec!["Warning: z not found.", "Warning: y not found.", "Warning: x not found."]
        );
        assert_eq!(report.missing, vec!["z", "y", "x"]);
        assert!(report.blocks.is_empty());
    }

    #[test]
    fn existing_output_is_truncated() {
        let tmp = fixture(&[("a", "new")]);
        let config = config_for(&tmp, &["a"]);
        fs::write(&config.output, "stale content that is much longer than the merge").unwrap();

        run_captured(&config);

        assert_eq!(fs::read_to_string(&config.output).unwrap(), "// --- a ---\nnew\n\n");
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let tmp = fixture(&[("a.cpp", "int a;\n"), ("a.hpp", "#pragma once\n")]);
        let config = config_for(&tmp, &["a.hpp", "missing.cpp", "a.cpp"]);

        run_captured(&config);
        let first = fs::read(&config.output).unwrap();
        run_captured(&config);
        let second = fs::read(&config.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn content_is_copied_verbatim() {
        let body = "line one\r\nno trailing newline\t// --- fake ---";
        let tmp = fixture(&[("odd.txt", body)]);
        let config = config_for(&tmp, &["odd.txt"]);

        let (report, _) = run_captured(&config);

        let merged = fs::read_to_string(&config.output).unwrap();
        similar_asserts::assert_eq!(merged, format!("// --- odd.txt ---\n{body}\n\n"));
        assert_eq!(report.blocks[0].bytes, body.len());
        assert_eq!(report.blocks[0].sha256, sha256_hex(body.as_bytes()));
    }

    #[test]
    fn entries_are_lazy_and_ordered() {
        let tmp = fixture(&[("present", "x")]);
        let config = config_for(&tmp, &["gone", "present"]);

        let mut iter = entries(&config);
        assert_eq!(iter.size_hint(), (2, Some(2)));
        match iter.next().unwrap().unwrap() {
            SourceEntry::Missing { name, path } => {
                assert_eq!(name, "gone");
                assert_eq!(path, tmp.path().join("src").join("gone"));
            }
            other => panic!("expected missing entry, got {other:?}"),
        }
        match iter.next().unwrap().unwrap() {
            SourceEntry::Present { name, content, .. } => {
                assert_eq!(name, "present");
                assert_eq!(content, "x");
            }
            other => panic!("expected present entry, got {other:?}"),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn directory_entry_aborts_run() {
        let tmp = fixture(&[("a", "1")]);
        fs::create_dir(tmp.path().join("src").join("subdir")).unwrap();
        let config = config_for(&tmp, &["a", "subdir"]);

        let mut diag = Vec::new();
        let err = run(&config, &mut diag).unwrap_err();

        assert!(matches!(err, MergeError::ReadSource { .. }));
        // Blocks written before the failure stay on disk.
        assert_eq!(fs::read_to_string(&config.output).unwrap(), "// --- a ---\n1\n\n");
        assert!(String::from_utf8(diag).unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8_aborts_unless_lossy() {
        let tmp = fixture(&[]);
        fs::write(tmp.path().join("src").join("latin.txt"), [b'o', b'l', 0xe9]).unwrap();
        let config = config_for(&tmp, &["latin.txt"]);

        let err = run(&config, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, MergeError::Decode { .. }));

        let lossy = config.clone().with_lossy(true);
        let report = run(&lossy, &mut Vec::new()).expect("lossy merge");
        assert_eq!(report.blocks_written(), 1);
        let merged = fs::read_to_string(&lossy.output).unwrap();
        assert!(merged.starts_with("// --- latin.txt ---\nol"));
    }

    #[test]
    fn unwritable_output_fails_before_reading() {
        let tmp = fixture(&[("a", "1")]);
        let mut config = config_for(&tmp, &["a"]);
        config.output = tmp.path().join("no-such-dir").join("out.txt");

        let err = run(&config, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, MergeError::CreateOutput { .. }));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn diagnostic_failure_is_not_blamed_on_output() {
        let tmp = fixture(&[("a", "1")]);

        let missing = config_for(&tmp, &["a", "gone"]);
        let err = run(&missing, &mut FailingWriter).unwrap_err();
        assert!(matches!(err, MergeError::Diagnostic { .. }), "got {err:?}");

        // Completion line is the only diagnostic here; the merged file is complete.
        let present = config_for(&tmp, &["a"]);
        let err = run(&present, &mut FailingWriter).unwrap_err();
        assert!(matches!(err, MergeError::Diagnostic { .. }), "got {err:?}");
        assert_eq!(fs::read_to_string(&present.output).unwrap(), "// --- a ---\n1\n\n");
    }
}
