//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

use crate::env::resolve_env_vars;
use crate::schema::LiftLensConfig;

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the LiftLens config directory.
/// Priority: `LIFTLENS_CONFIG_DIR` env > `~/.liftlens/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LIFTLENS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".liftlens"))
        .unwrap_or_else(|| PathBuf::from(".liftlens"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read, env-substitute and deserialize a config file.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<LiftLensConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(LiftLensConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Parse YAML text, substituting `${VAR}` references from the environment.
pub fn parse_config(raw: &str) -> Result<LiftLensConfig> {
    if raw.trim().is_empty() {
        return Ok(LiftLensConfig::default());
    }
    let value: Value = serde_yaml::from_str(raw).context("Failed to parse config YAML")?;
    // A comment-only file parses as null.
    if value.is_null() {
        return Ok(LiftLensConfig::default());
    }
    let value = resolve_env_vars(&value)?;
    serde_json::from_value(value).context("Config does not match the expected schema")
}
