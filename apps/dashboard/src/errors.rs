use thiserror::Error;

/// Error type shared by the store, upload and session clients.
///
/// The dashboard never shows these verbatim; it maps them to banner text via
/// [`DashboardError::user_message`] and logs the full error.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Client-side validation failure. The text is shown to the user as-is.
    #[error("{0}")]
    Validation(String),

    #[error("No signed-in user")]
    NotSignedIn,

    #[error("Document store error (status {status}): {message}")]
    Store { status: u16, message: String },

    #[error("Document not found")]
    DocumentNotFound,

    /// The stored profile was never loaded, so a full-form save would
    /// overwrite it with blanks.
    #[error("Profile could not be loaded; stored fields were left unchanged")]
    ProfileNotLoaded,

    #[error("Failed to upload resume")]
    UploadRejected { status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Banner text for this error. Falls back to `fallback` when the error
    /// carries nothing a user could act on.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::UploadRejected { .. } => self.to_string(),
            Self::Store { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
