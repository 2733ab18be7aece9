//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings before they are logged or
//! returned to clients. Provider error strings can carry request URLs and
//! echoed headers.

use once_cell::sync::Lazy;
use regex::Regex;

static OPENAI_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{16,}").unwrap());
static GOOGLE_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"AIza[0-9A-Za-z_\-]{30,}").unwrap());
static BEARER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-\._~+/]+=*").unwrap());
static KEY_PARAM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());

/// Redacts credential-shaped substrings.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BEARER_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = OPENAI_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    let redacted = GOOGLE_KEY_RE.replace_all(&redacted, "[REDACTED_KEY]");
    KEY_PARAM_RE
        .replace_all(&redacted, "${1}[REDACTED_KEY]")
        .into_owned()
}

/// Cut long model output down for debug logs, on a char boundary.
pub fn truncate_for_log(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}… ({} bytes total)", &text[..idx], text.len()),
        None => text.to_string(),
    }
}
