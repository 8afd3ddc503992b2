//! Store trait — the abstraction over the relational persistence layer.
//!
//! Projects, assets, generation jobs, the per-project chat log, and the
//! timeline manifest all live behind this trait. The manifest is persisted
//! as an opaque JSON blob plus a numeric duration field; its shape is owned
//! by the timeline crate, not the store.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::Message;
use crate::project::{Asset, AssetKind, GenerationJob, JobStatus, Project};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

/// The persistence contract for the studio agent.
///
/// All reads and writes are scoped to the single (user, project) named by the
/// caller; ownership checks are the caller's responsibility (the executor
/// compares `user_id` fields before acting).
#[async_trait]
pub trait StudioStore: Send + Sync {
    fn name(&self) -> &str;

    // --- Projects ---

    async fn create_project(&self, project: &Project) -> Result<(), StoreError>;

    /// Look up a project by id.
    async fn project(&self, project_id: &str) -> Result<Option<Project>, StoreError>;

    /// The user's preferred completion model, if they set one.
    async fn preferred_model(&self, user_id: &str) -> Result<Option<String>, StoreError>;

    async fn set_preferred_model(&self, user_id: &str, model: &str) -> Result<(), StoreError>;

    // --- Assets ---

    async fn asset(&self, asset_id: &str) -> Result<Option<Asset>, StoreError>;

    async fn create_asset(&self, asset: &Asset) -> Result<(), StoreError>;

    /// Most recent assets for a project, newest first, capped by `limit`.
    async fn list_assets(
        &self,
        user_id: &str,
        project_id: &str,
        kind: Option<AssetKind>,
        limit: usize,
    ) -> Result<Vec<Asset>, StoreError>;

    // --- Generation jobs ---

    async fn create_job(&self, job: &GenerationJob) -> Result<(), StoreError>;

    /// Transition a job's status and attach provider/output details.
    async fn update_job(
        &self,
        job_id: &str,
        status: JobStatus,
        external_id: Option<&str>,
        output: Option<&serde_json::Value>,
        error: Option<&str>,
    ) -> Result<(), StoreError>;

    // --- Timeline manifest ---

    /// The project's manifest blob, or `None` when no mutation has happened yet.
    async fn manifest(&self, project_id: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Persist the manifest blob and its recomputed duration in one write.
    async fn save_manifest(
        &self,
        project_id: &str,
        manifest: &serde_json::Value,
        duration_frames: u32,
    ) -> Result<(), StoreError>;

    // --- Chat log ---

    /// Append one message to the project's chat log. Append-only.
    async fn append_message(&self, project_id: &str, message: &Message) -> Result<(), StoreError>;

    /// The last `limit` messages in causal order (oldest of the window first).
    async fn recent_messages(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError>;

    /// Explicit clear-history operation; returns the number of deleted rows.
    async fn clear_messages(&self, project_id: &str) -> Result<u64, StoreError>;
}
