use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::errors::DashboardError;
use crate::models::{ProfilePatch, UserProfile};
use crate::store::value::{decode_fields, encode_fields};
use crate::store::ProfileStore;

const USERS_COLLECTION: &str = "users";
const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreDocument {
    name: Option<String>,
    #[serde(default)]
    fields: Map<String, Value>,
    update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct FirestoreError {
    error: FirestoreErrorBody,
}

#[derive(Debug, Deserialize)]
struct FirestoreErrorBody {
    message: String,
}

/// Profile store backed by the Firestore REST API (v1).
///
/// Reads are `GET .../documents/users/{uid}`; writes are `PATCH` with an
/// `updateMask` listing exactly the patched fields and an `exists`
/// precondition, so a missing document is never created here.
#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    base_url: Url,
    project_id: String,
    id_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(base_url: &str, project_id: impl Into<String>) -> Result<Self, DashboardError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            let reason = anyhow::anyhow!("invalid Firestore base URL '{base_url}': {e}");
            DashboardError::Internal(reason)
        })?;
        Ok(Self {
            client: Client::new(),
            base_url,
            project_id: project_id.into(),
            id_token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn with_id_token(mut self, id_token: Option<String>) -> Self {
        self.id_token = id_token;
        self
    }

    fn document_url(&self, user_id: &str) -> Result<Url, DashboardError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                DashboardError::Internal(anyhow::anyhow!(
                    "Firestore base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                DEFAULT_DATABASE,
                "documents",
                USERS_COLLECTION,
                user_id,
            ]);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl ProfileStore for FirestoreStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, DashboardError> {
        let url = self.document_url(user_id)?;
        let response = self.authorize(self.client.get(url)).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(store_error(response).await);
        }

        let document: FirestoreDocument = response.json().await?;
        debug!(
            "Fetched {} (updated {:?})",
            document.name.as_deref().unwrap_or(user_id),
            document.update_time
        );

        let mut fields = decode_fields(&document.fields)?;
        // A stored null reads the same as an absent field.
        fields.retain(|_, v| !v.is_null());
        let profile = serde_json::from_value(Value::Object(fields))?;
        Ok(Some(profile))
    }

    async fn update(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), DashboardError> {
        if patch.is_empty() {
            return Ok(());
        }
        let fields = patch.fields();

        let mut query: Vec<(&str, &str)> = fields
            .keys()
            .map(|path| ("updateMask.fieldPaths", path.as_str()))
            .collect();
        query.push(("currentDocument.exists", "true"));

        let url = self.document_url(user_id)?;
        let response = self
            .authorize(self.client.patch(url))
            .query(&query)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DashboardError::DocumentNotFound);
        }
        if !status.is_success() {
            return Err(store_error(response).await);
        }

        debug!("Updated {} field(s) on users/{user_id}", fields.len());
        Ok(())
    }
}

async fn store_error(response: Response) -> DashboardError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!("Firestore returned {}: {}", status, body);
    let message = serde_json::from_str::<FirestoreError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    DashboardError::Store {
        status: status.as_u16(),
        message,
    }
}
