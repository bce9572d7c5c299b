//! Resume upload. Client-side file validation and the upload endpoint client.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::DashboardError;

pub mod http;

pub use http::HttpUploader;

pub const PDF_MIME: &str = "application/pdf";
/// Largest accepted resume, 5 MiB.
pub const MAX_RESUME_BYTES: u64 = 5 * 1024 * 1024;

pub const NOT_PDF_MESSAGE: &str = "Please upload a PDF file";
pub const TOO_LARGE_MESSAGE: &str = "File size should be less than 5MB";

/// A file picked by the user, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, taking the MIME type from its extension.
    pub async fn from_path(path: &Path) -> Result<Self, DashboardError> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self::new(name, mime_for_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// MIME type for a path, by extension. Anything unrecognized is
/// `application/octet-stream`.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Checks a selection before anything is sent: PDF only, at most 5 MiB.
pub fn validate_selection(file: &SelectedFile) -> Result<(), DashboardError> {
    if file.mime_type != PDF_MIME {
        return Err(DashboardError::validation(NOT_PDF_MESSAGE));
    }
    if file.size() > MAX_RESUME_BYTES {
        return Err(DashboardError::validation(TOO_LARGE_MESSAGE));
    }
    Ok(())
}

/// Sends a resume to the hosting endpoint and returns the hosted file URL.
#[async_trait]
pub trait ResumeUploader: Send + Sync {
    async fn upload(&self, file: &SelectedFile, user_id: &str) -> Result<String, DashboardError>;
}
