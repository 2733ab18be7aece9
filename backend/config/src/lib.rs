//! `liftlens-config`: LiftLens runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, model provider, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - `LIFTLENS_*` environment overrides and API key fallback
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::{apply_env_overrides, apply_env_overrides_with};
pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use schema::{LiftLensConfig, LoggingConfig, ModelConfig, ModelProviderKind, ServerConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load a config file, apply environment overrides, and validate it.
///
/// This is the main entry point for loading a config at runtime. Warnings are
/// logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<LiftLensConfig> {
    let config = apply_env_overrides(load_config(path).await?);
    ensure_valid(&config)?;
    Ok(config)
}

/// Log the validation report and fail on the first error.
///
/// Use after loading when the logger is configured from the loaded
/// `logging` section, so the report reaches the right sinks.
pub fn ensure_valid(config: &LiftLensConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.first() {
        bail!("{} ({} error(s) total)", first, report.errors.len());
    }
    Ok(())
}
