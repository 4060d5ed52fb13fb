use anyhow::{Result, anyhow};
use std::path::Path;

/// Image MIME types accepted for sketch and image uploads
pub const ALLOWED_IMAGE_MIME_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp"];

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Sniffs the MIME type from the leading bytes of an upload
pub fn sniff_mime(header: &[u8]) -> Option<&'static str> {
    infer::get(header).map(|kind| kind.mime_type())
}

/// Verifies that an upload claimed to be an image actually carries the
/// magic bytes of an allowed image format. The claimed extension is
/// irrelevant here, only the content counts.
pub fn verify_image_upload(header: &[u8]) -> Result<()> {
    if header.is_empty() {
        return Err(anyhow!(ValidationError {
            code: "EMPTY_FILE",
            message: "File appears to be empty".to_string(),
        }));
    }

    match sniff_mime(header) {
        Some(mime) if ALLOWED_IMAGE_MIME_TYPES.contains(&mime) => Ok(()),
        Some(mime) => Err(anyhow!(ValidationError {
            code: "INVALID_IMAGE_TYPE",
            message: format!(
                "Detected type '{}' is not allowed. Only JPEG, PNG, GIF and WebP images are permitted.",
                mime
            ),
        })),
        None => Err(anyhow!(ValidationError {
            code: "UNRECOGNIZED_IMAGE",
            message: "File content is not a recognized image format".to_string(),
        })),
    }
}

/// Extracts a lowercased, sanitized extension from the original filename.
/// Only alphanumeric extensions survive; anything else is treated as absent.
pub fn file_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension().and_then(|e| e.to_str())?;

    if ext.is_empty() || ext.len() > 10 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_lowercase())
}
