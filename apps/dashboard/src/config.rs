use std::path::PathBuf;

use anyhow::{bail, Context, Result};

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_SESSION_FILE: &str = ".nerv-session.json";

/// Dashboard configuration loaded from environment variables (and `.env`).
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub firebase_project_id: String,
    pub firestore_base_url: String,
    pub resume_upload_url: String,
    pub session_file: PathBuf,
    pub require_resume_for_interview: bool,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let resume_upload_url = require("RESUME_UPLOAD_URL")?;
        url::Url::parse(&resume_upload_url)
            .with_context(|| format!("RESUME_UPLOAD_URL is not a valid URL: {resume_upload_url}"))?;

        let require_resume_for_interview = match lookup("REQUIRE_RESUME_FOR_INTERVIEW") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| "REQUIRE_RESUME_FOR_INTERVIEW must be a boolean")?,
            None => false,
        };

        Ok(Config {
            firebase_project_id: require("FIREBASE_PROJECT_ID")?,
            firestore_base_url: lookup("FIRESTORE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FIRESTORE_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            resume_upload_url,
            session_file: lookup("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
            require_resume_for_interview,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("unrecognized boolean '{other}'"),
    }
}
