//! Config file loading

use crate::domain::MergeConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name the keys may be nested under instead of sitting at top level.
const SECTION: &str = "merge-sources";

const CANDIDATES: &[&str] = &[
    "merge-sources.toml",
    ".merge-sources.toml",
    "merge-sources.yml",
    ".merge-sources.yml",
    "merge-sources.yaml",
    ".merge-sources.yaml",
];

/// Load the config from `config_path`, or from the first candidate found in `base_dir`.
///
/// An explicit file that cannot be parsed is an error. A discovered one only
/// logs a warning and yields the defaults.
pub fn load_config(base_dir: &Path, config_path: Option<&Path>) -> Result<MergeConfig> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(base_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(MergeConfig::default());
    };
    tracing::debug!("Loading config from {}", config_file.display());

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => Ok(cfg),
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(MergeConfig::default())
        }
    }
}

/// Parse TOML config, supporting a nested [merge-sources] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<MergeConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested merge-sources mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<MergeConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        // An empty document parses as null; treat it as "no keys set".
        None if raw.is_null() => serde_yaml::Value::Mapping(Default::default()),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(base_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|candidate| base_dir.join(candidate)).find(|path| path.is_file())
}
