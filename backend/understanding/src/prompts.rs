//! Model instructions for screenshot classification and extraction.
//!
//! The JSON field names in these templates are what the normalizer and the
//! typed record views expect. Changing the wording changes the output schema.

use liftlens_core::ImageCategory;

/// Placeholder the model is told to use for unreadable fields.
pub const NOT_VISIBLE: &str = "not visible";

/// Output budget for the one-word classification answer.
pub const CLASSIFICATION_MAX_TOKENS: u32 = 10;

pub const CLASSIFICATION_PROMPT: &str = "\
You are looking at a screenshot from a fitness tracking app. Decide which kind of screen it is.

- workout_summary: a workout log showing the date, the duration and a list of exercises with weights, volume or estimated strength.
- muscle_groups: a summary of trained muscle groups, usually with a body diagram, calories burned and total volume.

Answer with exactly one word and nothing else: workout_summary or muscle_groups";

const WORKOUT_SUMMARY_PROMPT: &str = r#"Extract the workout data from this fitness app workout summary screenshot.

Return ONLY a JSON object with exactly this structure:
{
  "date": "the workout date exactly as shown",
  "duration": "the workout duration exactly as shown",
  "exercises": [
    {
      "name": "exercise name",
      "highestWeight": "heaviest weight lifted, with unit",
      "volume": "total volume, with unit",
      "estimatedStrength": "estimated strength or 1RM, with unit"
    }
  ]
}

Rules:
- Copy every value verbatim from the screenshot, including units (lb, kg, min, etc.).
- Include every exercise visible, in the order shown.
- Preserve the exact spelling and capitalization of exercise names.
- If a field cannot be read, use "not visible" as its value.
- Do not add commentary, explanations or markdown; output the JSON object only."#;

const MUSCLE_GROUPS_PROMPT: &str = r#"Extract the training summary from this fitness app muscle groups screenshot.

Return ONLY a JSON object with exactly this structure:
{
  "muscleGroups": "comma-separated list of the muscle groups shown",
  "calories": "calories burned, number only as shown",
  "caloriesUnit": "calorie unit as shown (e.g. kcal, cal)",
  "volume": "total volume, number only as shown",
  "volumeUnit": "volume unit as shown (e.g. lb, kg)",
  "exercises": "comma-separated list of exercise names shown"
}

Rules:
- Copy every value verbatim from the screenshot, keeping number formatting such as thousands separators.
- Preserve the exact spelling and capitalization of muscle group and exercise names.
- If a field cannot be read, use "not visible" as its value.
- Do not add commentary, explanations or markdown; output the JSON object only."#;

/// Extraction instructions for one category.
pub fn build_prompt(category: ImageCategory) -> &'static str {
    match category {
        ImageCategory::WorkoutSummary => WORKOUT_SUMMARY_PROMPT,
        ImageCategory::MuscleGroups => MUSCLE_GROUPS_PROMPT,
    }
}

/// Output-token budget for the extraction call of one category.
pub fn output_token_budget(category: ImageCategory) -> u32 {
    match category {
        ImageCategory::WorkoutSummary => 1500,
        ImageCategory::MuscleGroups => 1000,
    }
}
