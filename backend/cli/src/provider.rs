//! Vision model construction from the `model` config section.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use liftlens_config::{ModelConfig, ModelProviderKind};
use liftlens_core::VisionModel;
use liftlens_understanding::{GeminiVision, OpenAiVision};

pub fn build_model(config: &ModelConfig) -> Result<Arc<dyn VisionModel>> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .with_context(|| {
            format!(
                "No API key: set model.apiKey or {}",
                config.provider.api_key_env_var()
            )
        })?;

    let mut builder = Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().context("Failed to build HTTP client")?;

    let model: Arc<dyn VisionModel> = match config.provider {
        ModelProviderKind::OpenAi => {
            let mut provider = OpenAiVision::new(api_key).with_client(client);
            if !config.model.is_empty() {
                provider = provider.with_model(&config.model);
            }
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
        ModelProviderKind::Gemini => {
            let mut provider = GeminiVision::new(api_key).with_client(client);
            if !config.model.is_empty() {
                provider = provider.with_model(&config.model);
            }
            if let Some(url) = &config.base_url {
                provider = provider.with_base_url(url);
            }
            Arc::new(provider)
        }
    };

    Ok(model)
}
