//! Media type detection for uploads that arrive without a usable content type.

use std::path::Path;

/// Guess a media type from the filename extension.
pub fn detect_media_type(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "json" => "application/json",
        _ => "application/octet-stream",
    }
}

/// Use the declared type as given; infer from the filename only when none was sent.
pub fn resolve_media_type(declared: Option<&str>, filename: &str) -> String {
    match declared.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => detect_media_type(filename).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_screenshot_formats() {
        assert_eq!(detect_media_type("IMG_0001.PNG"), "image/png");
        assert_eq!(detect_media_type("photo.jpeg"), "image/jpeg");
        assert_eq!(detect_media_type("shot.heic"), "image/heic");
    }

    #[test]
    fn unknown_extension_fallback() {
        assert_eq!(detect_media_type("file.xyz"), "application/octet-stream");
        assert_eq!(detect_media_type("noext"), "application/octet-stream");
    }

    #[test]
    fn declared_type_always_wins() {
        assert_eq!(resolve_media_type(Some("image/webp"), "a.png"), "image/webp");
        assert_eq!(
            resolve_media_type(Some("application/octet-stream"), "notes.png"),
            "application/octet-stream"
        );
        assert_eq!(resolve_media_type(None, "a.jpg"), "image/jpeg");
        assert_eq!(resolve_media_type(Some("  "), "notes.txt"), "text/plain");
    }
}
