use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::DashboardError;
use crate::upload::{ResumeUploader, SelectedFile};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_url: String,
}

/// Posts resumes to the external hosting endpoint as multipart form data
/// (`resume` file part plus `userId` text part).
#[derive(Clone)]
pub struct HttpUploader {
    client: Client,
    endpoint: Url,
}

impl HttpUploader {
    pub fn new(endpoint: &str) -> Result<Self, DashboardError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            DashboardError::Internal(anyhow::anyhow!("invalid upload endpoint '{endpoint}': {e}"))
        })?;
        Ok(Self {
            client: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ResumeUploader for HttpUploader {
    async fn upload(&self, file: &SelectedFile, user_id: &str) -> Result<String, DashboardError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        let form = Form::new()
            .part("resume", part)
            .text("userId", user_id.to_string());

        debug!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.size(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Upload endpoint returned {}: {}", status, body);
            return Err(DashboardError::UploadRejected {
                status: status.as_u16(),
            });
        }

        let body: UploadResponse = response.json().await?;
        Ok(body.file_url)
    }
}
