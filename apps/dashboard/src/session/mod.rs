//! Session and identity: who is signed in, and how to sign them out.
//!
//! The dashboard only consumes this capability; signing in happens elsewhere.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::DashboardError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_user(&self) -> Option<CurrentUser>;

    async fn logout(&self) -> Result<(), DashboardError>;
}

/// On-disk session written by the sign-in flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// Session backed by a JSON file. A missing file means nobody is signed in;
/// logging out deletes the file.
pub struct FileSession {
    path: PathBuf,
    record: RwLock<Option<SessionRecord>>,
}

impl FileSession {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, DashboardError> {
        let path = path.into();
        let record = read_record(&path).await?;
        match &record {
            Some(r) => debug!("Loaded session for {} from {}", r.uid, path.display()),
            None => debug!("No session file at {}", path.display()),
        }
        Ok(Self {
            path,
            record: RwLock::new(record),
        })
    }

    /// Token for authenticating store requests, if the session has one.
    pub async fn id_token(&self) -> Option<String> {
        self.record
            .read()
            .await
            .as_ref()
            .and_then(|r| r.id_token.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_record(path: &Path) -> Result<Option<SessionRecord>, DashboardError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let record: SessionRecord = serde_json::from_str(&raw).map_err(|e| {
        DashboardError::Session(format!("malformed session file {}: {e}", path.display()))
    })?;
    if record.uid.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(record))
}

#[async_trait]
impl SessionProvider for FileSession {
    async fn current_user(&self) -> Option<CurrentUser> {
        self.record.read().await.as_ref().map(|r| CurrentUser {
            uid: r.uid.clone(),
            email: r.email.clone(),
        })
    }

    async fn logout(&self) -> Result<(), DashboardError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DashboardError::Session(format!(
                    "failed to remove {}: {e}",
                    self.path.display()
                )))
            }
        }
        let previous = self.record.write().await.take();
        if let Some(r) = previous {
            info!("Signed out {}", r.uid);
        }
        Ok(())
    }
}
