//! Remote collaborators: the session store and the emotion classifier.

mod http;
pub mod types;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Classification, SessionDetail, SessionSummary};

pub use http::HttpBackend;
pub use types::{BackendStatus, ModelStatus};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the id assigned to the new session.
    async fn create_session(&self) -> Result<String, StoreError>;

    async fn stop_session(&self, session_id: &str) -> Result<(), StoreError>;

    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError>;

    async fn session_detail(&self, session_id: &str) -> Result<SessionDetail, StoreError>;

    async fn delete_session(&self, session_id: &str) -> Result<(), StoreError>;

    /// Display-only availability probe.
    async fn model_status(&self) -> Result<ModelStatus, StoreError>;
}

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classifies one still frame (a `data:image/jpeg;base64,...` URL) and
    /// records it against `session_id`.
    async fn classify(
        &self,
        session_id: &str,
        image_data_url: &str,
    ) -> Result<Classification, StoreError>;
}
