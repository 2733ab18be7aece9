use async_trait::async_trait;

use crate::error::ModelError;

/// A multimodal completion service: one image plus instructions in, text out.
///
/// Implementations must be stateless enough to share behind an `Arc` across requests.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Provider name (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Submit a single-turn request and return the first completion's text.
    async fn complete(&self, request: &VisionRequest) -> Result<VisionResponse, ModelError>;
}

/// Request to a vision model.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    pub prompt: String,
    /// Base64 (standard alphabet) encoded image bytes.
    pub image_base64: String,
    pub media_type: String,
    pub max_tokens: u32,
}

impl VisionRequest {
    /// `data:` URL form used by OpenAI-compatible APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.image_base64)
    }
}

/// Response from a vision model.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Text of the first choice. Empty when the model returned no content.
    pub content: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}
