//! Image references - File to `data:` URL Conversion
//!
//! Product images are stored inline as `data:<mime>;base64,<payload>`
//! strings, so the catalog needs no separate asset storage.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;
use tokio::fs;
use tracing::debug;

/// MIME type for an image path, by extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Encode raw image bytes as a `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Read an image file into a `data:` URL.
pub async fn data_url_from_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read image file: {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Encoded image");
    Ok(encode_data_url(mime_for(path), &bytes))
}
