//! Turns free-form model text into a [`NormalizedRecord`].
//!
//! Cascade, first match wins:
//! 1. empty text → error record
//! 2. strip a markdown code fence
//! 3. strict JSON parse of the stripped text
//! 4. strict JSON parse of the first `{` .. last `}` span of the original text
//! 5. raw passthrough with fields recovered by regex
//!
//! Only JSON objects and arrays count as structured data; a bare scalar falls
//! through the cascade like any other unparseable reply.

use liftlens_core::{ExerciseEntry, ExtractedFields, ImageCategory, NormalizedRecord, UnparsedResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

pub const NO_RESPONSE_ERROR: &str = "No response from AI";
pub const PARSE_FAILURE_ERROR: &str = "Could not parse structured data";

// --- Compiled regexes ---

/// Opening fence: optional backticks then `json`, or a backtick-only line.
static FENCE_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\A`*[ \t]*json[ \t]*(?:\r?\n|\z)|\A`+[ \t]*(?:\r?\n|\z)").unwrap()
});

/// Closing fence: a trailing backtick-only line.
static FENCE_CLOSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n|\A)[ \t]*`+[ \t]*\z").unwrap());

/// First `{` through the last `}`, across lines.
static EMBEDDED_OBJECT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""date"\s*:\s*"([^"]*)""#).unwrap());

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""duration"\s*:\s*"([^"]*)""#).unwrap());

static EXERCISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#""name"\s*:\s*"([^"]*)"\s*,\s*"#,
        r#""highestWeight"\s*:\s*"([^"]*)"\s*,\s*"#,
        r#""volume"\s*:\s*"([^"]*)"\s*,\s*"#,
        r#""estimatedStrength"\s*:\s*"([^"]*)""#,
    ))
    .unwrap()
});

/// Normalize one model reply. Pure; never fails.
pub fn normalize(raw_text: Option<&str>, category: ImageCategory) -> NormalizedRecord {
    let Some(raw) = raw_text.filter(|t| !t.trim().is_empty()) else {
        warn!(%category, "Model returned no text");
        return NormalizedRecord::unparsed(None, NO_RESPONSE_ERROR);
    };

    if let Some(value) = parse_structured(strip_code_fence(raw)) {
        return NormalizedRecord::Parsed(value);
    }

    if let Some(value) = EMBEDDED_OBJECT_RE
        .find(raw)
        .and_then(|m| parse_structured(m.as_str()))
    {
        debug!(%category, "Parsed JSON embedded in surrounding text");
        return NormalizedRecord::Parsed(value);
    }

    let extracted = extract_fields(raw);
    warn!(
        %category,
        recovered_fields = !extracted.is_empty(),
        "Model reply is not valid JSON; passing raw text through"
    );
    NormalizedRecord::Unparsed(UnparsedResponse {
        raw_analysis: Some(raw.to_string()),
        error: PARSE_FAILURE_ERROR.to_string(),
        extracted_data: Some(extracted),
    })
}

/// Remove a leading ```` ```json ```` line and a trailing ```` ``` ```` line, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(m) = FENCE_OPEN_RE.find(body) {
        body = &body[m.end()..];
    }
    if let Some(m) = FENCE_CLOSE_RE.find(body) {
        body = &body[..m.start()];
    }
    body.trim()
}

fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Pull `date`, `duration` and complete exercise blocks out of malformed JSON.
pub fn extract_fields(raw: &str) -> ExtractedFields {
    let capture = |re: &Regex| re.captures(raw).map(|c| c[1].to_string());

    ExtractedFields {
        date: capture(&*DATE_RE),
        duration: capture(&*DURATION_RE),
        exercises: EXERCISE_RE
            .captures_iter(raw)
            .map(|c| ExerciseEntry {
                name: c[1].to_string(),
                highest_weight: c[2].to_string(),
                volume: c[3].to_string(),
                estimated_strength: c[4].to_string(),
            })
            .collect(),
    }
}
