//! Profile store. Reads and partially updates the `users/{uid}` document.
//!
//! `FirestoreStore` talks to the hosted database over REST; `MemoryStore`
//! keeps documents in process and records every write.

use async_trait::async_trait;

use crate::errors::DashboardError;
use crate::models::{ProfilePatch, UserProfile};

pub mod firestore;
pub mod memory;
pub mod value;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// The document operations the dashboard needs. Carried as
/// `Arc<dyn ProfileStore>` so backends can be swapped without touching the
/// controller.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns `None` when the document does not exist.
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, DashboardError>;

    /// Writes only the fields present in `patch`. No concurrency token is
    /// sent, so the last write wins.
    async fn update(&self, user_id: &str, patch: &ProfilePatch) -> Result<(), DashboardError>;
}
