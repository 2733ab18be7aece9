use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use liftlens_core::{ModelError, VisionModel, VisionRequest, VisionResponse};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail(ModelError),
}

/// A vision model that plays back scripted replies in order and records
/// every request it receives.
///
/// When the script runs out, the fixed response is returned if one was set,
/// otherwise the call fails.
#[derive(Default)]
pub struct MockVisionModel {
    script: Mutex<VecDeque<MockReply>>,
    fixed_response: Option<String>,
    requests: Mutex<Vec<VisionRequest>>,
}

impl MockVisionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` whenever the script is empty.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    pub fn then_fail(self, error: ModelError) -> Self {
        self.push(MockReply::Fail(error));
        self
    }

    pub fn push(&self, reply: MockReply) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(reply);
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl VisionModel for MockVisionModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<VisionResponse, ModelError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        let content = match next {
            Some(MockReply::Text(text)) => text,
            Some(MockReply::Fail(error)) => return Err(error),
            None => self
                .fixed_response
                .clone()
                .ok_or_else(|| ModelError::MalformedResponse("mock script exhausted".into()))?,
        };

        Ok(VisionResponse {
            content,
            provider: "mock".to_string(),
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}
