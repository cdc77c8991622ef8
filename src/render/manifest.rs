//! Manifest JSON generation.

use crate::domain::{MergeConfig, MergeReport, MANIFEST_SCHEMA_VERSION};
use crate::error::{MergeError, Result};
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
pub struct ManifestOptions {
    pub include_timestamp: bool,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self { include_timestamp: true }
    }
}

pub fn build_manifest(
    config: &MergeConfig,
    report: &MergeReport,
    options: ManifestOptions,
) -> Value {
    let blocks = report
        .blocks
        .iter()
        .map(|b| json!({ "name": b.name, "bytes": b.bytes, "sha256": b.sha256 }))
        .collect::<Vec<_>>();

    let mut manifest = Map::new();
    manifest
        .insert("schema_version".to_string(), Value::String(MANIFEST_SCHEMA_VERSION.to_string()));
    if options.include_timestamp {
        manifest.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    manifest.insert("src_dir".to_string(), json!(config.src_dir.display().to_string()));
    manifest.insert("output".to_string(), json!(report.output.display().to_string()));
    manifest.insert("blocks".to_string(), Value::Array(blocks));
    manifest.insert("missing".to_string(), json!(report.missing));
    manifest.insert("total_bytes".to_string(), json!(report.total_bytes));
    Value::Object(manifest)
}

pub fn write_manifest(
    manifest_path: &Path,
    config: &MergeConfig,
    report: &MergeReport,
    options: ManifestOptions,
) -> Result<()> {
    let manifest = build_manifest(config, report, options);
    let manifest_err =
        |source: std::io::Error| MergeError::Manifest { path: manifest_path.to_path_buf(), source };

    if let Some(parent) = manifest_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(manifest_err)?;
        }
    }
    std::fs::write(manifest_path, serde_json::to_string_pretty(&manifest)?)
        .map_err(manifest_err)?;
    tracing::debug!("Wrote manifest {}", manifest_path.display());
    Ok(())
}
