//! Project, asset, and generation-job domain types.
//!
//! A `Project` owns one timeline manifest and a chat log. `Asset` rows
//! reference generated or uploaded media on the CDN. `GenerationJob` rows
//! record that an async generation was started; polling and completion
//! handling live outside this subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A studio project: the unit of ownership for assets, jobs, chat history,
/// and the timeline manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Frames per second of the timeline's frame axis
    pub fps: u32,
    pub created_at: DateTime<Utc>,
}

/// The media type of a stored asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Video,
    Audio,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
            AssetKind::Audio => "audio",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(AssetKind::Image),
            "video" => Some(AssetKind::Video),
            "audio" => Some(AssetKind::Audio),
            _ => None,
        }
    }
}

/// A generated or uploaded media asset, scoped to one (user, project).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub kind: AssetKind,
    /// Storage URL on the CDN
    pub url: String,
    /// Media duration, when known (video/audio)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    /// Word-level timestamps for voiceover audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_timestamps: Option<Vec<WordTimestamp>>,
    pub created_at: DateTime<Utc>,
}

/// One word of synthesized speech with its position in the audio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordTimestamp {
    pub word: String,
    pub start_secs: f64,
    pub end_secs: f64,
}

/// What kind of generation a job performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Image,
    Video,
    Voiceover,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Image => "image",
            JobKind::Video => "video",
            JobKind::Voiceover => "voiceover",
        }
    }
}

/// Lifecycle status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// An async unit of generation work.
///
/// The agent subsystem only records that a job was started and returns its id
/// to the caller. There is no rollback when a provider call fails mid-flight;
/// the row keeps whatever status it had (known gap, preserved deliberately).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    /// Provider-assigned id, set once the provider accepts the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Output payload for completed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Failure reason for failed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GenerationJob {
    /// Create a fresh job in `pending` status.
    pub fn pending(
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        kind: JobKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            project_id: project_id.into(),
            kind,
            status: JobStatus::Pending,
            external_id: None,
            output: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_job_starts_clean() {
        let job = GenerationJob::pending("user-1", "proj-1", JobKind::Image);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.external_id.is_none());
        assert!(job.output.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn asset_kind_roundtrip() {
        for kind in [AssetKind::Image, AssetKind::Video, AssetKind::Audio] {
            assert_eq!(AssetKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(AssetKind::parse("model3d"), None);
    }

    #[test]
    fn job_status_roundtrip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn word_timestamp_uses_camel_case_wire_form() {
        let ts = WordTimestamp {
            word: "hello".into(),
            start_secs: 0.0,
            end_secs: 0.4,
        };
        let json = serde_json::to_string(&ts).unwrap();
        assert!(json.contains("startSecs"));
        assert!(json.contains("endSecs"));
    }
}
