//! Config validation with user-friendly error messages.

use crate::schema::LiftLensConfig;
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &LiftLensConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_model(config, &mut report);
    report
}

fn validate_server(config: &LiftLensConfig, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if config.server.bind_address.trim().is_empty() {
        report.error("server.bindAddress", "Bind address cannot be empty");
    }
    if config.server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Upload limit must be greater than zero");
    }
}

fn validate_model(config: &LiftLensConfig, report: &mut ValidationReport) {
    let model = &config.model;
    if model.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
        report.error(
            "model.apiKey",
            format!(
                "No API key configured; set model.apiKey or {}",
                model.provider.api_key_env_var()
            ),
        );
    }
    if model.classification_max_tokens == 0 {
        report.error("model.classificationMaxTokens", "Token budget must be greater than zero");
    }
    if model.request_timeout_secs == Some(0) {
        report.error("model.requestTimeoutSecs", "Timeout must be greater than zero; omit it to disable");
    }
    if model.model.trim().is_empty() {
        report.warn("model.model", "No model name set; using the provider default");
    }
}
