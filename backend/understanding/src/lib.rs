pub mod classifier;
pub mod invoker;
pub mod mock;
pub mod normalizer;
pub mod prompts;
pub mod vision;

pub use classifier::{Classification, ClassificationBasis, ImageTypeClassifier};
pub use invoker::ModelInvoker;
pub use mock::{MockReply, MockVisionModel};
pub use normalizer::{normalize, strip_code_fence};
pub use prompts::{build_prompt, output_token_budget};
pub use vision::{GeminiVision, OpenAiVision};
