use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One uploaded screenshot, alive only for the duration of a single request.
#[derive(Debug, Clone)]
pub struct SubmittedImage {
    pub filename: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    pub data: Bytes,
}

impl SubmittedImage {
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Size of the uploaded buffer in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether this upload can be sent to the model: non-empty and `image/*`.
    pub fn is_valid_image(&self) -> bool {
        !self.data.is_empty() && self.media_type.starts_with("image/")
    }
}

/// The two kinds of fitness-app screenshot a request must contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    WorkoutSummary,
    MuscleGroups,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 2] = [ImageCategory::WorkoutSummary, ImageCategory::MuscleGroups];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageCategory::WorkoutSummary => "workout_summary",
            ImageCategory::MuscleGroups => "muscle_groups",
        }
    }

    /// Exact match against the wire name. Callers normalize case and whitespace first.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exactly two validated uploads, kept in submission order.
#[derive(Debug, Clone)]
pub struct ImagePair {
    pub first: SubmittedImage,
    pub second: SubmittedImage,
}

impl ImagePair {
    pub fn iter(&self) -> impl Iterator<Item = &SubmittedImage> {
        [&self.first, &self.second].into_iter()
    }
}

impl TryFrom<Vec<SubmittedImage>> for ImagePair {
    type Error = ValidationError;

    fn try_from(images: Vec<SubmittedImage>) -> Result<Self, Self::Error> {
        if images.is_empty() {
            return Err(ValidationError::NoFiles);
        }
        if images.len() != 2 {
            return Err(ValidationError::WrongCount(images.len()));
        }
        if let Some(bad) = images.iter().find(|img| !img.is_valid_image()) {
            return Err(ValidationError::InvalidImage(bad.filename.clone()));
        }

        let mut images = images.into_iter();
        match (images.next(), images.next()) {
            (Some(first), Some(second)) => Ok(Self { first, second }),
            _ => Err(ValidationError::WrongCount(0)),
        }
    }
}
