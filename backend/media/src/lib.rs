//! Screenshot pair analysis: validation, per-image classification and
//! extraction, and the category coverage check.

pub mod mime_detect;
pub mod pipeline;

pub use mime_detect::{detect_media_type, resolve_media_type};
pub use pipeline::{check_coverage, AnalysisPipeline};
