//! Source text decoding.
//!
//! Sources are read whole and must be UTF-8. With lossy decoding enabled the
//! encoding is detected instead:
//! - BOM markers (UTF-8, UTF-16 LE/BE)
//! - strict UTF-8 validation
//! - chardetng guess for everything else
//!
//! and invalid sequences are replaced rather than rejected.

use crate::error::{MergeError, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::path::Path;

const DETECTION_SAMPLE_SIZE: usize = 8192;

/// Read the full text of a source file.
///
/// The file handle lives only for the duration of the read. In strict mode the
/// bytes are returned verbatim (a UTF-8 BOM stays part of the content).
pub fn read_source_text(path: &Path, lossy: bool) -> Result<String> {
    let bytes = std::fs::read(path)
        .map_err(|source| MergeError::ReadSource { path: path.to_path_buf(), source })?;

    if lossy {
        let encoding = detect_encoding(&bytes);
        tracing::debug!("Decoding {} as {}", path.display(), encoding.name());
        let (decoded, _used, had_errors) = encoding.decode(&bytes);
        if had_errors {
            tracing::warn!("Replaced invalid sequences while decoding {}", path.display());
        }
        return Ok(decoded.into_owned());
    }

    String::from_utf8(bytes).map_err(|e| MergeError::Decode {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}

/// Guess the encoding of a byte buffer.
///
/// Only the first few kilobytes are inspected for the chardetng fallback.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if bytes.starts_with(&[0xef, 0xbb, 0xbf]) {
        return UTF_8;
    }
    if bytes.starts_with(&[0xff, 0xfe]) {
        return UTF_16LE;
    }
    if bytes.starts_with(&[0xfe, 0xff]) {
        return UTF_16BE;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    let sample = &bytes[..bytes.len().min(DETECTION_SAMPLE_SIZE)];
    let mut detector = EncodingDetector::new();
    detector.feed(sample, true);
    detector.guess(None, true)
}
