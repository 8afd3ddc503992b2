//! In-memory store — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use reelforge_core::message::Message;
use reelforge_core::project::{Asset, AssetKind, GenerationJob, JobStatus, Project};
use reelforge_core::store::{StoreError, StudioStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    projects: HashMap<String, Project>,
    manifests: HashMap<String, (serde_json::Value, u32)>,
    preferred_models: HashMap<String, String>,
    assets: Vec<Asset>,
    jobs: HashMap<String, GenerationJob>,
    messages: HashMap<String, Vec<Message>>,
}

/// A store backed by in-process maps. Not persistent.
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }

    /// Snapshot a job by id (test helper).
    pub async fn job(&self, job_id: &str) -> Option<GenerationJob> {
        self.tables.read().await.jobs.get(job_id).cloned()
    }

    /// Total persisted messages for a project (test helper).
    pub async fn message_count(&self, project_id: &str) -> usize {
        self.tables
            .read()
            .await
            .messages
            .get(project_id)
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudioStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn create_project(&self, project: &Project) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.tables.read().await.projects.get(project_id).cloned())
    }

    async fn preferred_model(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .preferred_models
            .get(user_id)
            .cloned())
    }

    async fn set_preferred_model(&self, user_id: &str, model: &str) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .preferred_models
            .insert(user_id.into(), model.into());
        Ok(())
    }

    async fn asset(&self, asset_id: &str) -> Result<Option<Asset>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .assets
            .iter()
            .find(|a| a.id == asset_id)
            .cloned())
    }

    async fn create_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        self.tables.write().await.assets.push(asset.clone());
        Ok(())
    }

    async fn list_assets(
        &self,
        user_id: &str,
        project_id: &str,
        kind: Option<AssetKind>,
        limit: usize,
    ) -> Result<Vec<Asset>, StoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Asset> = tables
            .assets
            .iter()
            .filter(|a| {
                a.user_id == user_id
                    && a.project_id == project_id
                    && kind.is_none_or(|k| a.kind == k)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn create_job(&self, job: &GenerationJob) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .jobs
            .insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn update_job(
        &self,
        job_id: &str,
        status: JobStatus,
        external_id: Option<&str>,
        output: Option<&serde_json::Value>,
        error: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| StoreError::QueryFailed(format!("no such job: {job_id}")))?;
        job.status = status;
        if let Some(id) = external_id {
            job.external_id = Some(id.into());
        }
        if let Some(output) = output {
            job.output = Some(output.clone());
        }
        if let Some(error) = error {
            job.error = Some(error.into());
        }
        job.updated_at = chrono::Utc::now();
        Ok(())
    }

    async fn manifest(&self, project_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .manifests
            .get(project_id)
            .map(|(blob, _)| blob.clone()))
    }

    async fn save_manifest(
        &self,
        project_id: &str,
        manifest: &serde_json::Value,
        duration_frames: u32,
    ) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .manifests
            .insert(project_id.into(), (manifest.clone(), duration_frames));
        Ok(())
    }

    async fn append_message(&self, project_id: &str, message: &Message) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .messages
            .entry(project_id.into())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn recent_messages(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        let tables = self.tables.read().await;
        let log = match tables.messages.get(project_id) {
            Some(log) => log,
            None => return Ok(Vec::new()),
        };
        let start = log.len().saturating_sub(limit);
        Ok(log[start..].to_vec())
    }

    async fn clear_messages(&self, project_id: &str) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .messages
            .remove(project_id)
            .map(|log| log.len() as u64)
            .unwrap_or(0))
    }
}
