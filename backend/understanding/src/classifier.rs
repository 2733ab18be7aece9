//! Screenshot classification: asks the model for a one-word category.
//!
//! Never fails. When the model is unreachable the filename is checked for
//! "muscle"; that fallback is a low-confidence guess and is logged as such.

use liftlens_core::{ImageCategory, SubmittedImage};
use tracing::{info, warn};

use crate::invoker::ModelInvoker;
use crate::prompts::{CLASSIFICATION_MAX_TOKENS, CLASSIFICATION_PROMPT};

/// Category used when the model answer cannot be mapped.
pub const DEFAULT_CATEGORY: ImageCategory = ImageCategory::WorkoutSummary;

/// How a category was arrived at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationBasis {
    /// The model answered with one of the two labels.
    ModelAnswer,
    /// The model answered with something else; the default was used.
    UnrecognizedAnswer(String),
    /// The model call failed and the filename mentioned "muscle".
    FilenameFallback,
    /// The model call failed and the filename gave no hint.
    DefaultAfterFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: ImageCategory,
    pub basis: ClassificationBasis,
}

impl Classification {
    pub fn is_confident(&self) -> bool {
        self.basis == ClassificationBasis::ModelAnswer
    }
}

/// Map a raw model answer onto a category (trimmed, lowercased, exact match).
pub fn interpret_answer(answer: &str) -> Classification {
    let normalized = answer.trim().to_lowercase();
    match ImageCategory::from_label(&normalized) {
        Some(category) => Classification {
            category,
            basis: ClassificationBasis::ModelAnswer,
        },
        None => Classification {
            category: DEFAULT_CATEGORY,
            basis: ClassificationBasis::UnrecognizedAnswer(normalized),
        },
    }
}

/// Last-resort guess from the filename, used only when the model call failed.
pub fn classify_by_filename(filename: &str) -> Classification {
    if filename.to_lowercase().contains("muscle") {
        Classification {
            category: ImageCategory::MuscleGroups,
            basis: ClassificationBasis::FilenameFallback,
        }
    } else {
        Classification {
            category: DEFAULT_CATEGORY,
            basis: ClassificationBasis::DefaultAfterFailure,
        }
    }
}

pub struct ImageTypeClassifier {
    invoker: ModelInvoker,
    max_tokens: u32,
}

impl ImageTypeClassifier {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self {
            invoker,
            max_tokens: CLASSIFICATION_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub async fn classify(&self, image: &SubmittedImage) -> ImageCategory {
        self.classify_with_basis(image).await.category
    }

    pub async fn classify_with_basis(&self, image: &SubmittedImage) -> Classification {
        let classification = match self
            .invoker
            .invoke(image, CLASSIFICATION_PROMPT, self.max_tokens)
            .await
        {
            Ok(answer) => interpret_answer(&answer),
            Err(e) => {
                warn!(file = %image.filename, error = %e, "Classification call failed; guessing from filename");
                classify_by_filename(&image.filename)
            }
        };

        if classification.is_confident() {
            info!(file = %image.filename, category = %classification.category, "Classified image");
        } else {
            warn!(
                file = %image.filename,
                category = %classification.category,
                basis = ?classification.basis,
                "Low-confidence classification"
            );
        }
        classification
    }
}
