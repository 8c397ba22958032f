use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A file selected for upload: name, media type and contents, as a file
/// picker would hand it over.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Reads a file from disk. The media type comes from the extension only,
    /// matching what a browser reports for a picked file.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, media_type_for(path), content))
    }
}

/// Maps a file extension to the media type a browser would report.
pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MEDIA_TYPE,
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => FALLBACK_MEDIA_TYPE,
    }
}
