use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, instrument, warn};

use liftlens_core::{ModelError, SubmittedImage, VisionModel, VisionRequest};
use liftlens_logging::truncate_for_log;

/// Shared entry point to the vision model for the classifier and the extractors.
///
/// Holds an injected, shareable model handle; never retries.
#[derive(Clone)]
pub struct ModelInvoker {
    model: Arc<dyn VisionModel>,
}

impl ModelInvoker {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self { model }
    }

    pub fn provider(&self) -> &str {
        self.model.name()
    }

    /// Encode the image, send it with `prompt`, and return the reply text.
    #[instrument(skip_all, fields(file = %image.filename, provider = %self.model.name(), max_tokens = max_tokens))]
    pub async fn invoke(
        &self,
        image: &SubmittedImage,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ModelError> {
        let request = VisionRequest {
            prompt: prompt.to_string(),
            image_base64: STANDARD.encode(&image.data),
            media_type: image.media_type.clone(),
            max_tokens,
        };

        match self.model.complete(&request).await {
            Ok(response) => {
                debug!(
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    reply = %truncate_for_log(&response.content, 200),
                    "Model replied"
                );
                Ok(response.content)
            }
            Err(e) => {
                warn!(error = %e, "Model invocation failed");
                Err(e)
            }
        }
    }
}
