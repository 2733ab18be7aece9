//! Core types, error kinds and the vision model trait shared by every LiftLens crate.

pub mod error;
pub mod record;
pub mod response;
pub mod traits;
pub mod types;

pub use error::{CategoryMismatchError, LiftLensError, ModelError, ValidationError};
pub use record::{
    ExerciseEntry, ExtractedFields, MuscleGroupsSummary, NormalizedRecord, UnparsedResponse,
    WorkoutSummary,
};
pub use response::{AggregatedResponse, AnalysisOutcome, OutcomeStatus, ProcessedFile};
pub use traits::{VisionModel, VisionRequest, VisionResponse};
pub use types::{ImageCategory, ImagePair, SubmittedImage};
