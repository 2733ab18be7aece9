//! Config defaults and environment overrides applied after the file is read.

use std::collections::HashMap;

use tracing::debug;

use crate::schema::LiftLensConfig;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// 20 MiB: two full-resolution phone screenshots with room to spare.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_CLASSIFICATION_MAX_TOKENS: u32 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply `LIFTLENS_*` overrides and the provider API key fallback from the process environment.
pub fn apply_env_overrides(config: LiftLensConfig) -> LiftLensConfig {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Same as [`apply_env_overrides`] with an explicit environment.
pub fn apply_env_overrides_with(
    mut config: LiftLensConfig,
    env: &HashMap<String, String>,
) -> LiftLensConfig {
    let get = |name: &str| env.get(name).filter(|v| !v.trim().is_empty());

    if let Some(bind) = get("LIFTLENS_BIND") {
        config.server.bind_address = bind.clone();
    }
    if let Some(port) = get("LIFTLENS_PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }
    if let Some(level) = get("LIFTLENS_LOG") {
        config.logging.level = level.clone();
    }

    if config.model.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        let var = config.model.provider.api_key_env_var();
        if let Some(key) = get(var) {
            debug!(var, "Using API key from environment");
            config.model.api_key = Some(key.clone());
        }
    }
    config
}
