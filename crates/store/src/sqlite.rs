//! SQLite store backend.
//!
//! One database file holds five tables:
//! - `projects` — project metadata plus the manifest JSON blob and its
//!   recomputed duration (persisted together in one UPDATE)
//! - `user_settings` — per-user model preference
//! - `assets` — generated/uploaded media records
//! - `jobs` — generation job records
//! - `messages` — the append-only per-project chat log, ordered by an
//!   autoincrement sequence column

use async_trait::async_trait;
use chrono::Utc;
use reelforge_core::message::{Message, MessageToolCall, Role};
use reelforge_core::project::{Asset, AssetKind, GenerationJob, JobStatus, Project};
use reelforge_core::store::{StoreError, StudioStore};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A production SQLite store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        // A :memory: database lives inside a single connection; pooling more
        // would hand each caller its own empty database.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                name            TEXT NOT NULL,
                width           INTEGER NOT NULL,
                height          INTEGER NOT NULL,
                fps             INTEGER NOT NULL,
                manifest        TEXT,
                duration_frames INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("projects table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_settings (
                user_id         TEXT PRIMARY KEY,
                preferred_model TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("user_settings table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                id              TEXT PRIMARY KEY,
                user_id         TEXT NOT NULL,
                project_id      TEXT NOT NULL,
                kind            TEXT NOT NULL,
                url             TEXT NOT NULL,
                duration_secs   REAL,
                word_timestamps TEXT,
                created_at      TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("assets table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_assets_project ON assets(project_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("assets index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                project_id  TEXT NOT NULL,
                kind        TEXT NOT NULL,
                status      TEXT NOT NULL,
                external_id TEXT,
                output      TEXT,
                error       TEXT,
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("jobs table: {e}")))?;

        // seq orders the chat log; it is never exposed outside this module
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                seq          INTEGER PRIMARY KEY AUTOINCREMENT,
                id           TEXT UNIQUE NOT NULL,
                project_id   TEXT NOT NULL,
                role         TEXT NOT NULL,
                content      TEXT NOT NULL,
                tool_calls   TEXT NOT NULL DEFAULT '[]',
                tool_call_id TEXT,
                created_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("messages table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_project ON messages(project_id, seq)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("messages index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, StoreError> {
        let width: i64 = column(row, "width")?;
        let height: i64 = column(row, "height")?;
        let fps: i64 = column(row, "fps")?;
        Ok(Project {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            name: column(row, "name")?,
            width: width as u32,
            height: height as u32,
            fps: fps as u32,
            created_at: parse_timestamp(&column::<String>(row, "created_at")?),
        })
    }

    fn row_to_asset(row: &sqlx::sqlite::SqliteRow) -> Result<Asset, StoreError> {
        let kind: String = column(row, "kind")?;
        let kind = AssetKind::parse(&kind)
            .ok_or_else(|| StoreError::QueryFailed(format!("unknown asset kind: {kind}")))?;
        let word_timestamps: Option<String> = column(row, "word_timestamps")?;
        Ok(Asset {
            id: column(row, "id")?,
            user_id: column(row, "user_id")?,
            project_id: column(row, "project_id")?,
            kind,
            url: column(row, "url")?,
            duration_secs: column(row, "duration_secs")?,
            word_timestamps: word_timestamps.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: parse_timestamp(&column::<String>(row, "created_at")?),
        })
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<Message, StoreError> {
        let role: String = column(row, "role")?;
        let role = Role::parse(&role)
            .ok_or_else(|| StoreError::QueryFailed(format!("unknown role: {role}")))?;
        let tool_calls_json: String = column(row, "tool_calls")?;
        let tool_calls: Vec<MessageToolCall> =
            serde_json::from_str(&tool_calls_json).unwrap_or_default();
        Ok(Message {
            id: column(row, "id")?,
            role,
            content: column(row, "content")?,
            tool_calls,
            tool_call_id: column(row, "tool_call_id")?,
            timestamp: parse_timestamp(&column::<String>(row, "created_at")?),
        })
    }
}

fn column<'r, T>(row: &'r sqlx::sqlite::SqliteRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|e| StoreError::QueryFailed(format!("{name} column: {e}")))
}

fn parse_timestamp(s: &str) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[async_trait]
impl StudioStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn create_project(&self, project: &Project) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, user_id, name, width, height, fps, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&project.id)
        .bind(&project.user_id)
        .bind(&project.name)
        .bind(project.width as i64)
        .bind(project.height as i64)
        .bind(project.fps as i64)
        .bind(project.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT project: {e}")))?;
        Ok(())
    }

    async fn project(&self, project_id: &str) -> Result<Option<Project>, StoreError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT project: {e}")))?;
        row.as_ref().map(Self::row_to_project).transpose()
    }

    async fn preferred_model(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT preferred_model FROM user_settings WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT user_settings: {e}")))?;
        Ok(row.and_then(|r| r.try_get("preferred_model").ok()))
    }

    async fn set_preferred_model(&self, user_id: &str, model: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_settings (user_id, preferred_model) VALUES (?1, ?2)
            ON CONFLICT(user_id) DO UPDATE SET preferred_model = excluded.preferred_model
            "#,
        )
        .bind(user_id)
        .bind(model)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("UPSERT user_settings: {e}")))?;
        Ok(())
    }

    async fn asset(&self, asset_id: &str) -> Result<Option<Asset>, StoreError> {
        let row = sqlx::query("SELECT * FROM assets WHERE id = ?1")
            .bind(asset_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT asset: {e}")))?;
        row.as_ref().map(Self::row_to_asset).transpose()
    }

    async fn create_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let word_timestamps = asset
            .word_timestamps
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Storage(format!("timestamps serialization: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO assets (id, user_id, project_id, kind, url, duration_secs, word_timestamps, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&asset.id)
        .bind(&asset.user_id)
        .bind(&asset.project_id)
        .bind(asset.kind.as_str())
        .bind(&asset.url)
        .bind(asset.duration_secs)
        .bind(word_timestamps)
        .bind(asset.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT asset: {e}")))?;
        Ok(())
    }

    async fn list_assets(
        &self,
        user_id: &str,
        project_id: &str,
        kind: Option<AssetKind>,
        limit: usize,
    ) -> Result<Vec<Asset>, StoreError> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query(
                    r#"
                    SELECT * FROM assets
                    WHERE user_id = ?1 AND project_id = ?2 AND kind = ?3
                    ORDER BY created_at DESC LIMIT ?4
                    "#,
                )
                .bind(user_id)
                .bind(project_id)
                .bind(kind.as_str())
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT * FROM assets
                    WHERE user_id = ?1 AND project_id = ?2
                    ORDER BY created_at DESC LIMIT ?3
                    "#,
                )
                .bind(user_id)
                .bind(project_id)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| StoreError::QueryFailed(format!("SELECT assets: {e}")))?;

        rows.iter().map(Self::row_to_asset).collect()
    }

    async fn create_job(&self, job: &GenerationJob) -> Result<(), StoreError> {
        let output = job
            .output
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Storage(format!("output serialization: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO jobs (id, user_id, project_id, kind, status, external_id, output, error, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&job.id)
        .bind(&job.user_id)
        .bind(&job.project_id)
        .bind(job.kind.as_str())
        .bind(job.status.as_str())
        .bind(&job.external_id)
        .bind(output)
        .bind(&job.error)
        .bind(job.created_at.to_rfc3339())
        .bind(job.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT job: {e}")))?;
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
        let output = output
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StoreError::Storage(format!("output serialization: {e}")))?;
        sqlx::query(
            r#"
            UPDATE jobs SET
                status = ?2,
                external_id = COALESCE(?3, external_id),
                output = COALESCE(?4, output),
                error = COALESCE(?5, error),
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(job_id)
        .bind(status.as_str())
        .bind(external_id)
        .bind(output)
        .bind(error)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("UPDATE job: {e}")))?;
        Ok(())
    }

    async fn manifest(&self, project_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query("SELECT manifest FROM projects WHERE id = ?1")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("SELECT manifest: {e}")))?;
        let blob: Option<String> = match row {
            Some(r) => r
                .try_get("manifest")
                .map_err(|e| StoreError::QueryFailed(format!("manifest column: {e}")))?,
            None => None,
        };
        Ok(blob.and_then(|s| serde_json::from_str(&s).ok()))
    }

    async fn save_manifest(
        &self,
        project_id: &str,
        manifest: &serde_json::Value,
        duration_frames: u32,
    ) -> Result<(), StoreError> {
        let blob = serde_json::to_string(manifest)
            .map_err(|e| StoreError::Storage(format!("manifest serialization: {e}")))?;
        // One write covers both the blob and the duration
        sqlx::query("UPDATE projects SET manifest = ?2, duration_frames = ?3 WHERE id = ?1")
            .bind(project_id)
            .bind(blob)
            .bind(duration_frames as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("UPDATE manifest: {e}")))?;
        Ok(())
    }

    async fn append_message(&self, project_id: &str, message: &Message) -> Result<(), StoreError> {
        let tool_calls = serde_json::to_string(&message.tool_calls)
            .map_err(|e| StoreError::Storage(format!("tool_calls serialization: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO messages (id, project_id, role, content, tool_calls, tool_call_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&message.id)
        .bind(project_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(tool_calls)
        .bind(&message.tool_call_id)
        .bind(message.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("INSERT message: {e}")))?;
        Ok(())
    }

    async fn recent_messages(
        &self,
        project_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>, StoreError> {
        // Last `limit` rows, returned in causal (ascending) order
        let rows = sqlx::query(
            r#"
            SELECT * FROM (
                SELECT * FROM messages WHERE project_id = ?1 ORDER BY seq DESC LIMIT ?2
            ) ORDER BY seq ASC
            "#,
        )
        .bind(project_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("SELECT messages: {e}")))?;

        rows.iter().map(Self::row_to_message).collect()
    }

    async fn clear_messages(&self, project_id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM messages WHERE project_id = ?1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("DELETE messages: {e}")))?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelforge_core::project::{JobKind, WordTimestamp};

    async fn store() -> SqliteStore {
        SqliteStore::new(":memory:").await.unwrap()
    }

    fn project(id: &str, user: &str) -> Project {
        Project {
            id: id.into(),
            user_id: user.into(),
            name: "Launch video".into(),
            width: 1920,
            height: 1080,
            fps: 30,
            created_at: Utc::now(),
        }
    }

    fn asset(id: &str, project_id: &str, kind: AssetKind) -> Asset {
        Asset {
            id: id.into(),
            user_id: "user-1".into(),
            project_id: project_id.into(),
            kind,
            url: format!("https://cdn.example/{id}"),
            duration_secs: Some(5.0),
            word_timestamps: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn project_roundtrip() {
        let store = store().await;
        store.create_project(&project("p1", "user-1")).await.unwrap();

        let loaded = store.project("p1").await.unwrap().unwrap();
        assert_eq!(loaded.user_id, "user-1");
        assert_eq!(loaded.fps, 30);

        assert!(store.project("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn preferred_model_upsert() {
        let store = store().await;
        assert!(store.preferred_model("user-1").await.unwrap().is_none());

        store.set_preferred_model("user-1", "gpt-4o").await.unwrap();
        store
            .set_preferred_model("user-1", "gpt-4o-mini")
            .await
            .unwrap();
        assert_eq!(
            store.preferred_model("user-1").await.unwrap().as_deref(),
            Some("gpt-4o-mini")
        );
    }

    #[tokio::test]
    async fn asset_roundtrip_with_timestamps() {
        let store = store().await;
        let mut a = asset("a1", "p1", AssetKind::Audio);
        a.word_timestamps = Some(vec![WordTimestamp {
            word: "hello".into(),
            start_secs: 0.0,
            end_secs: 0.4,
        }]);
        store.create_asset(&a).await.unwrap();

        let loaded = store.asset("a1").await.unwrap().unwrap();
        assert_eq!(loaded.kind, AssetKind::Audio);
        assert_eq!(loaded.word_timestamps.unwrap()[0].word, "hello");
    }

    #[tokio::test]
    async fn list_assets_filters_and_caps() {
        let store = store().await;
        store
            .create_asset(&asset("a1", "p1", AssetKind::Image))
            .await
            .unwrap();
        store
            .create_asset(&asset("a2", "p1", AssetKind::Video))
            .await
            .unwrap();
        store
            .create_asset(&asset("a3", "p2", AssetKind::Image))
            .await
            .unwrap();

        let all = store.list_assets("user-1", "p1", None, 50).await.unwrap();
        assert_eq!(all.len(), 2);

        let images = store
            .list_assets("user-1", "p1", Some(AssetKind::Image), 50)
            .await
            .unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "a1");

        let capped = store.list_assets("user-1", "p1", None, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[tokio::test]
    async fn job_status_transition() {
        let store = store().await;
        let job = GenerationJob::pending("user-1", "p1", JobKind::Image);
        let job_id = job.id.clone();
        store.create_job(&job).await.unwrap();

        store
            .update_job(&job_id, JobStatus::Processing, Some("ext-42"), None, None)
            .await
            .unwrap();

        // COALESCE keeps external_id when a later update omits it
        store
            .update_job(
                &job_id,
                JobStatus::Completed,
                None,
                Some(&serde_json::json!({"url": "https://cdn.example/out.png"})),
                None,
            )
            .await
            .unwrap();

        let row = sqlx::query("SELECT status, external_id FROM jobs WHERE id = ?1")
            .bind(&job_id)
            .fetch_one(&store.pool)
            .await
            .unwrap();
        let status: String = row.try_get("status").unwrap();
        let external: Option<String> = row.try_get("external_id").unwrap();
        assert_eq!(status, "completed");
        assert_eq!(external.as_deref(), Some("ext-42"));
    }

    #[tokio::test]
    async fn manifest_blob_and_duration_persist_together() {
        let store = store().await;
        store.create_project(&project("p1", "user-1")).await.unwrap();
        assert!(store.manifest("p1").await.unwrap().is_none());

        let blob = serde_json::json!({"videoClips": [], "backgroundColor": "#000000"});
        store.save_manifest("p1", &blob, 150).await.unwrap();

        let loaded = store.manifest("p1").await.unwrap().unwrap();
        assert_eq!(loaded["backgroundColor"], "#000000");

        let row = sqlx::query("SELECT duration_frames FROM projects WHERE id = 'p1'")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        let duration: i64 = row.try_get("duration_frames").unwrap();
        assert_eq!(duration, 150);
    }

    #[tokio::test]
    async fn chat_log_is_ordered_and_windowed() {
        let store = store().await;
        for i in 0..5 {
            store
                .append_message("p1", &Message::user(format!("message {i}")))
                .await
                .unwrap();
        }

        let window = store.recent_messages("p1", 3).await.unwrap();
        assert_eq!(window.len(), 3);
        // Last 3, in causal order
        assert_eq!(window[0].content, "message 2");
        assert_eq!(window[2].content, "message 4");
    }

    #[tokio::test]
    async fn tool_call_messages_roundtrip() {
        let store = store().await;
        let mut msg = Message::assistant("");
        msg.tool_calls = vec![MessageToolCall {
            id: "call_1".into(),
            name: "updateTimeline".into(),
            arguments: r##"{"action":"setBackground","backgroundColor":"#111111"}"##.into(),
        }];
        store.append_message("p1", &msg).await.unwrap();
        store
            .append_message("p1", &Message::tool_result("call_1", r#"{"success":true}"#))
            .await
            .unwrap();

        let messages = store.recent_messages("p1", 50).await.unwrap();
        assert_eq!(messages[0].tool_calls[0].name, "updateTimeline");
        assert_eq!(messages[1].tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn clear_messages_reports_count() {
        let store = store().await;
        store.append_message("p1", &Message::user("a")).await.unwrap();
        store.append_message("p1", &Message::user("b")).await.unwrap();
        store.append_message("p2", &Message::user("c")).await.unwrap();

        let deleted = store.clear_messages("p1").await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.recent_messages("p1", 50).await.unwrap().is_empty());
        assert_eq!(store.recent_messages("p2", 50).await.unwrap().len(), 1);
    }
}
