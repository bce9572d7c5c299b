use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::DashboardError;
use crate::models::{ProfilePatch, UserProfile};
use crate::store::ProfileStore;

/// In-process profile store. Mirrors the hosted store's semantics: updates to
/// a missing document fail, and every accepted write is kept in `writes`.
#[derive(Default)]
pub struct MemoryStore {
    pub documents: Mutex<HashMap<String, UserProfile>>,
    pub writes: Mutex<Vec<(String, ProfilePatch)>>,
    pub read_calls: AtomicU64,
    pub write_calls: AtomicU64,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub write_delay: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(user_id: &str, profile: UserProfile) -> Self {
        let documents = HashMap::from([(user_id.to_string(), profile)]);
        Self {
            documents: Mutex::new(documents),
            ..Self::default()
        }
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = delay;
        self
    }

    pub async fn profile(&self, user_id: &str) -> Option<UserProfile> {
        self.documents.lock().await.get(user_id).cloned()
    }

    pub async fn write_log(&self) -> Vec<(String, ProfilePatch)> {
        self.writes.lock().await.clone()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, DashboardError> {
        self.read_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_reads.load(Ordering::Relaxed) {
            return Err(DashboardError::Store {
                status: 403,
                message: "Missing or insufficient permissions.".to_string(),
            });
        }
        Ok(self.documents.lock().await.get(user_id).cloned())
    }

    async fn update(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), DashboardError> {
        self.write_calls.fetch_add(1, Ordering::Relaxed);
        if !self.write_delay.is_zero() {
            tokio::time::sleep(self.write_delay).await;
        }
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(DashboardError::Store {
                status: 503,
                message: "The service is currently unavailable.".to_string(),
            });
        }

        let mut documents = self.documents.lock().await;
        let profile = documents
            .get_mut(user_id)
            .ok_or(DashboardError::DocumentNotFound)?;
        patch.apply_to(profile);
        self.writes
            .lock()
            .await
            .push((user_id.to_string(), patch.clone()));
        Ok(())
    }
}
