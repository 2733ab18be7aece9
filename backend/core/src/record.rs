//! Structured analysis records produced from model text.
//!
//! Values stay as the display strings the model read off the screenshot
//! ("185 lb", "1h 12m"); nothing here parses quantities.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of normalizing one model reply.
///
/// Serialized untagged: `Parsed` is emitted as the model's JSON object itself,
/// `Unparsed` as `{ "rawAnalysis", "error", "extractedData" }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Parsed(Value),
    Unparsed(UnparsedResponse),
}

/// A reply that could not be read as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnparsedResponse {
    /// Original model text. `None` when the model returned nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_analysis: Option<String>,
    pub error: String,
    /// Fields recovered by pattern matching, when any were found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<ExtractedFields>,
}

/// Best-effort workout fields pulled out of malformed JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<ExerciseEntry>,
}

impl ExtractedFields {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.duration.is_none() && self.exercises.is_empty()
    }
}

/// One row of a workout summary screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub name: String,
    pub highest_weight: String,
    pub volume: String,
    pub estimated_strength: String,
}

/// Typed view of a `workout_summary` analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub date: String,
    pub duration: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

/// Typed view of a `muscle_groups` analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupsSummary {
    pub muscle_groups: String,
    pub calories: String,
    pub calories_unit: String,
    pub volume: String,
    pub volume_unit: String,
    pub exercises: String,
}

impl NormalizedRecord {
    pub fn unparsed(raw_analysis: Option<String>, error: impl Into<String>) -> Self {
        NormalizedRecord::Unparsed(UnparsedResponse {
            raw_analysis,
            error: error.into(),
            extracted_data: None,
        })
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, NormalizedRecord::Parsed(_))
    }

    pub fn parsed(&self) -> Option<&Value> {
        match self {
            NormalizedRecord::Parsed(value) => Some(value),
            NormalizedRecord::Unparsed(_) => None,
        }
    }

    /// Typed view, if the parsed object has the workout summary shape.
    pub fn as_workout_summary(&self) -> Option<WorkoutSummary> {
        self.parsed()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Typed view, if the parsed object has the muscle groups shape.
    pub fn as_muscle_groups(&self) -> Option<MuscleGroupsSummary> {
        self.parsed()
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsed_serializes_as_the_object_itself() {
        let value = json!({"date": "Oct 3", "duration": "58 min", "exercises": []});
        let record = NormalizedRecord::Parsed(value.clone());
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn unparsed_serializes_with_camel_case_keys() {
        let record = NormalizedRecord::Unparsed(UnparsedResponse {
            raw_analysis: Some("garbled".into()),
            error: "Could not parse structured data".into(),
            extracted_data: Some(ExtractedFields {
                date: Some("Oct 3".into()),
                ..Default::default()
            }),
        });
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "rawAnalysis": "garbled",
                "error": "Could not parse structured data",
                "extractedData": {"date": "Oct 3"}
            })
        );
    }

    #[test]
    fn empty_reply_serializes_error_only() {
        let record = NormalizedRecord::unparsed(None, "No response from AI");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"error": "No response from AI"})
        );
    }

    #[test]
    fn typed_views() {
        let record = NormalizedRecord::Parsed(json!({
            "muscleGroups": "Glutes, Calves",
            "calories": "262",
            "caloriesUnit": "kcal",
            "volume": "23,700",
            "volumeUnit": "lb",
            "exercises": "Barbell Hip Thrust"
        }));
        let muscles = record.as_muscle_groups().unwrap();
        assert_eq!(muscles.calories_unit, "kcal");
        assert!(record.as_workout_summary().is_none());
    }
}
