use std::sync::Arc;

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use liftlens_core::{
    AggregatedResponse, AnalysisOutcome, CategoryMismatchError, ImageCategory, ImagePair,
    OutcomeStatus, ProcessedFile, SubmittedImage, ValidationError, VisionModel,
};
use liftlens_understanding::{
    build_prompt, normalize, output_token_budget, ImageTypeClassifier, ModelInvoker,
};

/// Runs a screenshot pair through classify → prompt → invoke → normalize and
/// checks that both categories are covered.
///
/// Stateless between requests; share it behind an `Arc`.
pub struct AnalysisPipeline {
    classifier: ImageTypeClassifier,
    invoker: ModelInvoker,
}

impl AnalysisPipeline {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        let invoker = ModelInvoker::new(model);
        Self {
            classifier: ImageTypeClassifier::new(invoker.clone()),
            invoker,
        }
    }

    pub fn with_classification_max_tokens(mut self, max_tokens: u32) -> Self {
        self.classifier = self.classifier.with_max_tokens(max_tokens);
        self
    }

    pub fn provider(&self) -> &str {
        self.invoker.provider()
    }

    /// Validate the uploads, then analyze them. Invalid input never reaches the model.
    pub async fn process(
        &self,
        images: Vec<SubmittedImage>,
    ) -> Result<AggregatedResponse, ValidationError> {
        let pair = ImagePair::try_from(images)?;
        Ok(self.process_pair(pair).await)
    }

    pub async fn process_pair(&self, pair: ImagePair) -> AggregatedResponse {
        let span = info_span!("analysis", request_id = %Uuid::new_v4());
        async move {
            let received_at = Utc::now();
            info!(first = %pair.first.filename, second = %pair.second.filename, "Analyzing screenshot pair");

            // One image at a time, in upload order.
            let first = self.analyze_image(&pair.first).await;
            let second = self.analyze_image(&pair.second).await;

            if let Err(mismatch) = check_coverage(&[&first, &second]) {
                warn!(found = ?mismatch.found, "Screenshot pair does not cover both categories");
                return AggregatedResponse::from(mismatch);
            }

            let files = vec![
                ProcessedFile::from_outcome(&pair.first, first, received_at),
                ProcessedFile::from_outcome(&pair.second, second, received_at),
            ];
            info!("Screenshot pair analyzed");
            AggregatedResponse::analyzed(files)
        }
        .instrument(span)
        .await
    }

    /// Full cycle for one image. Model failures become a failed outcome.
    pub async fn analyze_image(&self, image: &SubmittedImage) -> AnalysisOutcome {
        let category = self.classifier.classify(image).await;
        let prompt = build_prompt(category);

        match self
            .invoker
            .invoke(image, prompt, output_token_budget(category))
            .await
        {
            Ok(text) => AnalysisOutcome {
                filename: image.filename.clone(),
                category,
                status: OutcomeStatus::Analyzed(normalize(Some(&text), category)),
                raw_response: Some(text),
            },
            Err(e) => {
                warn!(file = %image.filename, %category, error = %e, "Extraction failed");
                AnalysisOutcome {
                    filename: image.filename.clone(),
                    category,
                    status: OutcomeStatus::Failed(e.to_string()),
                    raw_response: None,
                }
            }
        }
    }
}

/// Both required categories must appear among the outcomes.
pub fn check_coverage(outcomes: &[&AnalysisOutcome]) -> Result<(), CategoryMismatchError> {
    let covered = ImageCategory::ALL
        .iter()
        .all(|required| outcomes.iter().any(|o| o.category == *required));

    if covered {
        Ok(())
    } else {
        Err(CategoryMismatchError {
            found: outcomes.iter().map(|o| o.category).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftlens_core::{ModelError, NormalizedRecord};
    use liftlens_understanding::MockVisionModel;
    use serde_json::json;

    const MUSCLE_JSON: &str = r#"{"muscleGroups":"Glutes, Calves","calories":"262","caloriesUnit":"kcal","volume":"23,700","volumeUnit":"lb","exercises":"Barbell Hip Thrust"}"#;
    const WORKOUT_JSON: &str = r#"{"date":"Oct 3, 2025","duration":"1h 2m","exercises":[{"name":"Hip Thrust","highestWeight":"315 lb","volume":"9,450 lb","estimatedStrength":"360 lb"}]}"#;

    fn png(name: &str) -> SubmittedImage {
        SubmittedImage::new(name, "image/png", vec![0x89, b'P', b'N', b'G', 1, 2, 3])
    }

    fn pipeline(mock: &Arc<MockVisionModel>) -> AnalysisPipeline {
        AnalysisPipeline::new(mock.clone())
    }

    #[tokio::test]
    async fn invalid_input_never_calls_the_model() {
        let mock = Arc::new(MockVisionModel::new().with_response("workout_summary"));
        let pipeline = pipeline(&mock);

        let cases = vec![
            vec![],
            vec![png("a.png")],
            vec![png("a.png"), png("b.png"), png("c.png")],
            vec![png("a.png"), SubmittedImage::new("b.txt", "text/plain", vec![1])],
            vec![png("a.png"), SubmittedImage::new("b.png", "image/png", Vec::new())],
        ];
        for images in cases {
            assert!(pipeline.process(images).await.is_err());
        }
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn analyzes_one_of_each_category() {
        let mock = Arc::new(
            MockVisionModel::new()
                .then_reply("workout_summary")
                .then_reply(format!("```json\n{WORKOUT_JSON}\n```"))
                .then_reply("muscle_groups")
                .then_reply(MUSCLE_JSON),
        );
        let response = pipeline(&mock)
            .process(vec![png("summary.png"), png("muscles.png")])
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some("Successfully analyzed 2 images"));
        let files = response.files.unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].image_type, ImageCategory::WorkoutSummary);
        assert_eq!(files[1].image_type, ImageCategory::MuscleGroups);
        assert_eq!(
            files[1].analysis,
            Some(NormalizedRecord::Parsed(serde_json::from_str(MUSCLE_JSON).unwrap()))
        );
        assert_eq!(files[1].raw_response.as_deref(), Some(MUSCLE_JSON));

        let workout = files[0].analysis.as_ref().unwrap().as_workout_summary().unwrap();
        assert_eq!(workout.exercises[0].name, "Hip Thrust");

        // Classification, then extraction, per image in upload order.
        let budgets: Vec<u32> = mock.requests().iter().map(|r| r.max_tokens).collect();
        assert_eq!(budgets, vec![10, 1500, 10, 1000]);
    }

    #[tokio::test]
    async fn muscle_groups_outcome_matches_model_object() {
        let mock = Arc::new(MockVisionModel::new().then_reply("muscle_groups").then_reply(MUSCLE_JSON));
        let outcome = pipeline(&mock).analyze_image(&png("IMG_2231.png")).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.category, ImageCategory::MuscleGroups);
        assert_eq!(
            outcome.record().and_then(|r| r.parsed()).cloned(),
            Some(json!({
                "muscleGroups": "Glutes, Calves",
                "calories": "262",
                "caloriesUnit": "kcal",
                "volume": "23,700",
                "volumeUnit": "lb",
                "exercises": "Barbell Hip Thrust"
            }))
        );
    }

    #[tokio::test]
    async fn same_category_twice_fails_the_request() {
        let mock = Arc::new(
            MockVisionModel::new()
                .then_reply("workout_summary")
                .then_reply(WORKOUT_JSON)
                .then_reply("workout_summary")
                .then_reply(WORKOUT_JSON),
        );
        let response = pipeline(&mock)
            .process(vec![png("a.png"), png("b.png")])
            .await
            .unwrap();

        assert!(!response.success);
        assert!(response.files.is_none());
        assert_eq!(
            response.error.as_deref(),
            Some("Could not identify both a workout summary and a muscle group image. Please upload one of each.")
        );
        assert_eq!(mock.calls(), 4);
    }

    #[tokio::test]
    async fn classification_failure_uses_filename_hint() {
        let mock = Arc::new(
            MockVisionModel::new()
                .then_reply("workout_summary")
                .then_reply(WORKOUT_JSON)
                .then_fail(ModelError::Transport("connection refused".into()))
                .then_reply(MUSCLE_JSON),
        );
        let response = pipeline(&mock)
            .process(vec![png("IMG_0001.png"), png("IMG_muscle_01.png")])
            .await
            .unwrap();

        assert!(response.success);
        let files = response.files.unwrap();
        assert_eq!(files[1].image_type, ImageCategory::MuscleGroups);
        assert_eq!(mock.requests()[3].max_tokens, 1000);
    }

    #[tokio::test]
    async fn extraction_failure_is_reported_per_file() {
        let mock = Arc::new(
            MockVisionModel::new()
                .then_reply("workout_summary")
                .then_fail(ModelError::Api { status: 500, body: "upstream".into() })
                .then_reply("muscle_groups")
                .then_reply("not json at all"),
        );
        let response = pipeline(&mock)
            .process(vec![png("a.png"), png("b.png")])
            .await
            .unwrap();

        assert!(response.success);
        let files = response.files.unwrap();
        assert_eq!(files[0].status, "error");
        assert!(files[0].analysis.is_none());
        assert!(files[0].message.contains("upstream"));

        assert_eq!(files[1].status, "analyzed");
        assert!(!files[1].analysis.as_ref().unwrap().is_parsed());
        assert_eq!(files[1].raw_response.as_deref(), Some("not json at all"));
    }

    #[test]
    fn coverage_requires_both_categories() {
        let outcome = |category| AnalysisOutcome {
            filename: "x.png".into(),
            category,
            status: OutcomeStatus::Failed("n/a".into()),
            raw_response: None,
        };
        let w = outcome(ImageCategory::WorkoutSummary);
        let m = outcome(ImageCategory::MuscleGroups);

        assert!(check_coverage(&[&w, &m]).is_ok());
        assert!(check_coverage(&[&m, &w]).is_ok());
        let err = check_coverage(&[&m, &m]).unwrap_err();
        assert_eq!(err.found, vec![ImageCategory::MuscleGroups, ImageCategory::MuscleGroups]);
    }
}
