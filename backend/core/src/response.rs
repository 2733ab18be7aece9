use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CategoryMismatchError;
use crate::record::NormalizedRecord;
use crate::types::{ImageCategory, SubmittedImage};

/// Result of running one image through classify, extract and normalize.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub filename: String,
    pub category: ImageCategory,
    pub status: OutcomeStatus,
    /// Raw extraction reply, kept for diagnostics.
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone)]
pub enum OutcomeStatus {
    /// The model replied; the record may still be degraded.
    Analyzed(NormalizedRecord),
    /// The extraction call failed.
    Failed(String),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Analyzed(_))
    }

    pub fn record(&self) -> Option<&NormalizedRecord> {
        match &self.status {
            OutcomeStatus::Analyzed(record) => Some(record),
            OutcomeStatus::Failed(_) => None,
        }
    }
}

/// Per-image entry of the response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub name: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub media_type: String,
    pub image_type: ImageCategory,
    pub received_at: DateTime<Utc>,
    pub status: String,
    pub message: String,
    pub analysis: Option<NormalizedRecord>,
    pub raw_response: Option<String>,
}

impl ProcessedFile {
    /// `image` supplies the upload metadata; the outcome supplies the name and result.
    pub fn from_outcome(image: &SubmittedImage, outcome: AnalysisOutcome, received_at: DateTime<Utc>) -> Self {
        let AnalysisOutcome {
            filename,
            category,
            status,
            raw_response,
        } = outcome;
        let kb = image.size() as f64 / 1024.0;
        let (status, message, analysis) = match status {
            OutcomeStatus::Analyzed(record) => (
                "analyzed",
                format!("Analyzed {} as {} ({:.1} KB)", filename, category, kb),
                Some(record),
            ),
            OutcomeStatus::Failed(error) => (
                "error",
                format!("Failed to analyze {}: {}", filename, error),
                None,
            ),
        };

        Self {
            name: filename,
            size: image.size(),
            media_type: image.media_type.clone(),
            image_type: category,
            received_at,
            status: status.to_string(),
            message,
            analysis,
            raw_response,
        }
    }
}

/// Response body for one upload request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ProcessedFile>>,
}

impl AggregatedResponse {
    pub fn analyzed(files: Vec<ProcessedFile>) -> Self {
        Self {
            success: true,
            message: Some(format!("Successfully analyzed {} images", files.len())),
            error: None,
            files: Some(files),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
            files: None,
        }
    }
}

impl From<CategoryMismatchError> for AggregatedResponse {
    fn from(err: CategoryMismatchError) -> Self {
        AggregatedResponse::failure(err.to_string())
    }
}
