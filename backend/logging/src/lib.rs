//! Structured logging for LiftLens.
//!
//! Console and rolling NDJSON output, plus scrubbing of credentials that can
//! leak into error strings from model providers.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LogOptions};
pub use redact::{redact_sensitive_data, truncate_for_log};
