use thiserror::Error;

use crate::types::ImageCategory;

/// Rejected input. Always raised before any model call is made.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No files provided")]
    NoFiles,

    #[error("Please upload exactly 2 images: one workout summary and one muscle group summary")]
    WrongCount(usize),

    #[error("Only non-empty image files are accepted")]
    InvalidImage(String),

    #[error("Expected a multipart/form-data upload")]
    MalformedUpload(String),

    #[error("Upload exceeds the maximum allowed size")]
    UploadTooLarge,
}

/// Any failure reaching the vision model or reading its reply.
///
/// Callers treat every variant the same way; the split only exists for logs.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("model transport error: {0}")]
    Transport(String),

    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// The two uploads did not cover both required categories.
#[derive(Debug, Error)]
#[error("Could not identify both a workout summary and a muscle group image. Please upload one of each.")]
pub struct CategoryMismatchError {
    pub found: Vec<ImageCategory>,
}

/// Errors that escape a request.
///
/// Model failures and category mismatches never appear here: the pipeline
/// folds them into the response body.
#[derive(Debug, Error)]
pub enum LiftLensError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}
