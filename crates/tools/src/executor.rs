//! Tool execution: dispatch, authorization, and side effects.
//!
//! Execution never escalates into the agent loop: every failure — bad
//! arguments, missing entities, ownership mismatch, provider or store errors —
//! folds into a failed [`ToolOutcome`] that is surfaced to the model as tool
//! output so it can explain the problem to the user.

use std::sync::Arc;

use reelforge_config::GenerationConfig;
use reelforge_core::error::ToolError;
use reelforge_core::generation::{
    GenerationProvider, ImageRequest, SpeechRequest, VideoRequest,
};
use reelforge_core::project::{Asset, AssetKind, GenerationJob, JobKind, JobStatus, Project};
use reelforge_core::store::StudioStore;
use reelforge_timeline::{ClipSource, TimelineAction, TimelineManifest};
use tracing::{debug, info, warn};

use crate::args::{
    self, GenerateImageArgs, GenerateVideoArgs, GenerateVoiceoverArgs, ListAssetsArgs,
};
use crate::catalog::ToolKind;

/// Read paths return at most this many assets.
const MAX_LISTED_ASSETS: usize = 50;

/// Who is calling, and against which project. Every side effect is scoped to
/// this pair.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    pub user_id: String,
    pub project_id: String,
}

/// The result of one tool execution, in the exact shape stored as the `tool`
/// message content: `{"success":true,"data":...}` or
/// `{"success":false,"error":"..."}`.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        if self.success {
            serde_json::json!({
                "success": true,
                "data": self.data.clone().unwrap_or(serde_json::Value::Null),
            })
        } else {
            serde_json::json!({
                "success": false,
                "error": self.error.clone().unwrap_or_default(),
            })
        }
    }

    /// Serialized form persisted as the tool message content.
    pub fn to_message_content(&self) -> String {
        self.to_json().to_string()
    }
}

impl<E: std::fmt::Display> From<E> for ToolOutcome {
    fn from(e: E) -> Self {
        ToolOutcome::fail(e.to_string())
    }
}

/// The single dispatch point for tool calls.
pub struct ToolExecutor {
    store: Arc<dyn StudioStore>,
    generation: Arc<dyn GenerationProvider>,
    config: GenerationConfig,
}

impl ToolExecutor {
    pub fn new(
        store: Arc<dyn StudioStore>,
        generation: Arc<dyn GenerationProvider>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            store,
            generation,
            config,
        }
    }

    /// Execute one tool call. `raw_args` is the argument blob exactly as the
    /// model sent it; malformed JSON degrades to `{}` and lets validation
    /// report the missing fields.
    pub async fn execute(
        &self,
        tool: ToolKind,
        raw_args: &str,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let args_value = args::parse_raw(tool.name(), raw_args);
        debug!(tool = tool.name(), project_id = %ctx.project_id, "Executing tool");

        let outcome = match tool {
            ToolKind::GetProjectState => self.get_project_state(ctx).await,
            ToolKind::GenerateImage => self.generate_image(args_value, ctx).await,
            ToolKind::GenerateVideo => self.generate_video(args_value, ctx).await,
            ToolKind::GenerateVoiceover => self.generate_voiceover(args_value, ctx).await,
            ToolKind::UpdateTimeline => self.update_timeline(args_value, ctx).await,
            ToolKind::ListAssets => self.list_assets(args_value, ctx).await,
        };

        if !outcome.success {
            warn!(
                tool = tool.name(),
                project_id = %ctx.project_id,
                error = outcome.error.as_deref().unwrap_or(""),
                "Tool execution failed"
            );
        }
        outcome
    }

    /// Load the project and verify the caller owns it.
    async fn owned_project(&self, ctx: &ExecutionContext) -> Result<Project, ToolOutcome> {
        let project = match self.store.project(&ctx.project_id).await {
            Ok(Some(p)) => p,
            Ok(None) => {
                return Err(ToolError::NotFound {
                    entity: "Project".into(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        if project.user_id != ctx.user_id {
            return Err(ToolError::Unauthorized.into());
        }
        Ok(project)
    }

    /// Load the asset and verify the caller owns it and it belongs to the
    /// context project.
    async fn owned_asset(
        &self,
        asset_id: &str,
        ctx: &ExecutionContext,
    ) -> Result<Asset, ToolOutcome> {
        let asset = match self.store.asset(asset_id).await {
            Ok(Some(a)) => a,
            Ok(None) => {
                return Err(ToolError::NotFound {
                    entity: "Asset".into(),
                }
                .into());
            }
            Err(e) => return Err(e.into()),
        };
        if asset.user_id != ctx.user_id || asset.project_id != ctx.project_id {
            return Err(ToolError::Unauthorized.into());
        }
        Ok(asset)
    }

    async fn load_manifest(&self, project_id: &str) -> Result<TimelineManifest, ToolOutcome> {
        match self.store.manifest(project_id).await {
            Ok(Some(value)) => serde_json::from_value(value).map_err(ToolOutcome::from),
            Ok(None) => Ok(TimelineManifest::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_project_state(&self, ctx: &ExecutionContext) -> ToolOutcome {
        let project = match self.owned_project(ctx).await {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let manifest = match self.load_manifest(&ctx.project_id).await {
            Ok(m) => m,
            Err(outcome) => return outcome,
        };
        let assets = match self
            .store
            .list_assets(&ctx.user_id, &ctx.project_id, None, MAX_LISTED_ASSETS)
            .await
        {
            Ok(a) => a,
            Err(e) => return e.into(),
        };

        let (video, audio, overlays) = manifest.clip_counts();
        ToolOutcome::ok(serde_json::json!({
            "projectName": project.name,
            "width": project.width,
            "height": project.height,
            "fps": project.fps,
            "clipCounts": { "video": video, "audio": audio, "overlays": overlays },
            "totalDurationFrames": manifest.total_duration_frames(),
            "backgroundColor": manifest.background_color,
            "assets": assets.iter().map(asset_summary).collect::<Vec<_>>(),
        }))
    }

    async fn generate_image(
        &self,
        args_value: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let args = match GenerateImageArgs::parse(args_value) {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        let project = match self.owned_project(ctx).await {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };

        let (width, height) = args
            .aspect_ratio
            .map(|r| r.dimensions())
            .unwrap_or((project.width, project.height));
        let prompt = match &args.style {
            Some(style) => format!("{}, {} style", args.prompt, style),
            None => args.prompt.clone(),
        };

        let job = GenerationJob::pending(&ctx.user_id, &ctx.project_id, JobKind::Image);
        if let Err(e) = self.store.create_job(&job).await {
            return e.into();
        }

        let ticket = match self
            .generation
            .generate_image(ImageRequest {
                prompt,
                model: self.config.image_model.clone(),
                width,
                height,
            })
            .await
        {
            Ok(t) => t,
            // The pending job row stays as created; there is no rollback.
            Err(e) => return e.into(),
        };

        if let Err(e) = self
            .store
            .update_job(
                &job.id,
                JobStatus::Processing,
                Some(&ticket.request_id),
                None,
                None,
            )
            .await
        {
            return e.into();
        }

        info!(job_id = %job.id, request_id = %ticket.request_id, "Image generation started");
        ToolOutcome::ok(serde_json::json!({
            "jobId": job.id,
            "status": "processing",
            "message": "Image generation started. The asset will appear when the job completes.",
        }))
    }

    async fn generate_video(
        &self,
        args_value: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let args = match GenerateVideoArgs::parse(args_value) {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        if let Err(outcome) = self.owned_project(ctx).await {
            return outcome;
        }
        let asset = match self.owned_asset(&args.image_asset_id, ctx).await {
            Ok(a) => a,
            Err(outcome) => return outcome,
        };
        if asset.kind != AssetKind::Image {
            return ToolOutcome::fail("Asset is not an image");
        }

        let job = GenerationJob::pending(&ctx.user_id, &ctx.project_id, JobKind::Video);
        if let Err(e) = self.store.create_job(&job).await {
            return e.into();
        }

        let ticket = match self
            .generation
            .generate_video(VideoRequest {
                image_url: asset.url.clone(),
                motion_prompt: args.motion_prompt.clone(),
                model: self.config.video_model.clone(),
                duration_secs: args.duration_secs(),
            })
            .await
        {
            Ok(t) => t,
            Err(e) => return e.into(),
        };

        if let Err(e) = self
            .store
            .update_job(
                &job.id,
                JobStatus::Processing,
                Some(&ticket.request_id),
                None,
                None,
            )
            .await
        {
            return e.into();
        }

        info!(job_id = %job.id, request_id = %ticket.request_id, "Video generation started");
        ToolOutcome::ok(serde_json::json!({
            "jobId": job.id,
            "status": "processing",
            "message": "Video generation started from the image asset.",
        }))
    }

    async fn generate_voiceover(
        &self,
        args_value: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let args = match GenerateVoiceoverArgs::parse(args_value) {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        if let Err(outcome) = self.owned_project(ctx).await {
            return outcome;
        }

        let job = GenerationJob::pending(&ctx.user_id, &ctx.project_id, JobKind::Voiceover);
        if let Err(e) = self.store.create_job(&job).await {
            return e.into();
        }

        let voice = args
            .voice_style
            .clone()
            .unwrap_or_else(|| self.config.default_voice.clone());
        let speech = match self
            .generation
            .generate_speech(SpeechRequest {
                text: args.text.clone(),
                voice,
            })
            .await
        {
            Ok(s) => s,
            Err(e) => return e.into(),
        };

        let asset = Asset {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: ctx.user_id.clone(),
            project_id: ctx.project_id.clone(),
            kind: AssetKind::Audio,
            url: speech.audio_url.clone(),
            duration_secs: Some(speech.duration_secs),
            word_timestamps: Some(speech.word_timestamps.clone()),
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.store.create_asset(&asset).await {
            return e.into();
        }

        let output = serde_json::json!({
            "assetId": asset.id,
            "audioUrl": speech.audio_url,
            "durationSecs": speech.duration_secs,
        });
        if let Err(e) = self
            .store
            .update_job(&job.id, JobStatus::Completed, None, Some(&output), None)
            .await
        {
            return e.into();
        }

        info!(job_id = %job.id, asset_id = %asset.id, "Voiceover generated");
        ToolOutcome::ok(serde_json::json!({
            "assetId": asset.id,
            "audioUrl": speech.audio_url,
            "durationSecs": speech.duration_secs,
            "wordTimestamps": speech.word_timestamps,
        }))
    }

    async fn update_timeline(
        &self,
        args_value: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let action: TimelineAction = match serde_json::from_value(args_value) {
            Ok(a) => a,
            Err(e) => return ToolOutcome::fail(format!("Invalid timeline action: {e}")),
        };
        let project = match self.owned_project(ctx).await {
            Ok(p) => p,
            Err(outcome) => return outcome,
        };
        let mut manifest = match self.load_manifest(&ctx.project_id).await {
            Ok(m) => m,
            Err(outcome) => return outcome,
        };

        // Add actions reference an asset; resolve it (with the kind check)
        // before touching the manifest.
        let source = match action.referenced_asset_id() {
            Some(asset_id) => {
                let asset = match self.owned_asset(asset_id, ctx).await {
                    Ok(a) => a,
                    Err(outcome) => return outcome,
                };
                let expected = match &action {
                    TimelineAction::AddVideoClip { .. } => AssetKind::Video,
                    _ => AssetKind::Audio,
                };
                if asset.kind != expected {
                    return ToolOutcome::fail(format!(
                        "Asset is not {} {}",
                        if expected == AssetKind::Audio { "an" } else { "a" },
                        expected.as_str()
                    ));
                }
                Some(ClipSource {
                    asset_id: asset.id.clone(),
                    url: asset.url.clone(),
                    duration_secs: asset.duration_secs,
                    word_timestamps: asset.word_timestamps.clone(),
                })
            }
            None => None,
        };

        if let Err(e) = manifest.apply(&action, source.as_ref(), project.fps) {
            return e.into();
        }

        let duration = manifest.total_duration_frames();
        let manifest_json = match serde_json::to_value(&manifest) {
            Ok(v) => v,
            Err(e) => return e.into(),
        };
        if let Err(e) = self
            .store
            .save_manifest(&ctx.project_id, &manifest_json, duration)
            .await
        {
            return e.into();
        }

        let (video, audio, overlays) = manifest.clip_counts();
        debug!(project_id = %ctx.project_id, duration_frames = duration, "Timeline updated");
        ToolOutcome::ok(serde_json::json!({
            "clipCounts": { "video": video, "audio": audio, "overlays": overlays },
            "totalDurationFrames": duration,
        }))
    }

    async fn list_assets(
        &self,
        args_value: serde_json::Value,
        ctx: &ExecutionContext,
    ) -> ToolOutcome {
        let args = match ListAssetsArgs::parse(args_value) {
            Ok(a) => a,
            Err(e) => return e.into(),
        };
        if let Err(outcome) = self.owned_project(ctx).await {
            return outcome;
        }
        match self
            .store
            .list_assets(&ctx.user_id, &ctx.project_id, args.kind, MAX_LISTED_ASSETS)
            .await
        {
            Ok(assets) => ToolOutcome::ok(serde_json::json!({
                "assets": assets.iter().map(asset_summary).collect::<Vec<_>>(),
            })),
            Err(e) => e.into(),
        }
    }
}

fn asset_summary(asset: &Asset) -> serde_json::Value {
    serde_json::json!({
        "id": asset.id,
        "type": asset.kind.as_str(),
        "url": asset.url,
        "durationSecs": asset.duration_secs,
        "createdAt": asset.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reelforge_core::generation::{
        GenerationError, JobTicket, SpeechOutput,
    };
    use reelforge_core::project::WordTimestamp;
    use reelforge_store::InMemoryStore;

    struct MockGeneration {
        fail: bool,
    }

    #[async_trait]
    impl GenerationProvider for MockGeneration {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate_image(
            &self,
            _request: ImageRequest,
        ) -> Result<JobTicket, GenerationError> {
            if self.fail {
                return Err(GenerationError::Network("connection refused".into()));
            }
            Ok(JobTicket {
                request_id: "req-img-1".into(),
            })
        }

        async fn generate_video(
            &self,
            _request: VideoRequest,
        ) -> Result<JobTicket, GenerationError> {
            Ok(JobTicket {
                request_id: "req-vid-1".into(),
            })
        }

        async fn generate_speech(
            &self,
            request: SpeechRequest,
        ) -> Result<SpeechOutput, GenerationError> {
            Ok(SpeechOutput {
                audio_url: "https://cdn.example/voice.mp3".into(),
                duration_secs: 2.0,
                word_timestamps: request
                    .text
                    .split_whitespace()
                    .enumerate()
                    .map(|(i, w)| WordTimestamp {
                        word: w.to_string(),
                        start_secs: i as f64 * 0.5,
                        end_secs: i as f64 * 0.5 + 0.4,
                    })
                    .collect(),
            })
        }
    }

    async fn fixture(fail_generation: bool) -> (ToolExecutor, Arc<InMemoryStore>, ExecutionContext)
    {
        let store = Arc::new(InMemoryStore::new());
        store
            .create_project(&Project {
                id: "proj-1".into(),
                user_id: "user-1".into(),
                name: "Demo reel".into(),
                width: 1920,
                height: 1080,
                fps: 30,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
        let executor = ToolExecutor::new(
            store.clone(),
            Arc::new(MockGeneration {
                fail: fail_generation,
            }),
            GenerationConfig::default(),
        );
        let ctx = ExecutionContext {
            user_id: "user-1".into(),
            project_id: "proj-1".into(),
        };
        (executor, store, ctx)
    }

    async fn seed_asset(store: &InMemoryStore, id: &str, kind: AssetKind) {
        store
            .create_asset(&Asset {
                id: id.into(),
                user_id: "user-1".into(),
                project_id: "proj-1".into(),
                kind,
                url: format!("https://cdn.example/{id}"),
                duration_secs: Some(5.0),
                word_timestamps: None,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn project_state_on_fresh_project() {
        let (executor, _store, ctx) = fixture(false).await;
        let outcome = executor
            .execute(ToolKind::GetProjectState, "{}", &ctx)
            .await;
        assert!(outcome.success);
        let data = outcome.data.unwrap();
        assert_eq!(data["totalDurationFrames"], 0);
        assert_eq!(data["clipCounts"]["video"], 0);
        assert_eq!(data["backgroundColor"], "#000000");
    }

    #[tokio::test]
    async fn wrong_user_is_unauthorized() {
        let (executor, _store, _ctx) = fixture(false).await;
        let ctx = ExecutionContext {
            user_id: "intruder".into(),
            project_id: "proj-1".into(),
        };
        let outcome = executor
            .execute(ToolKind::GetProjectState, "{}", &ctx)
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Unauthorized"));
    }

    #[tokio::test]
    async fn missing_project_reports_not_found() {
        let (executor, _store, _ctx) = fixture(false).await;
        let ctx = ExecutionContext {
            user_id: "user-1".into(),
            project_id: "proj-missing".into(),
        };
        let outcome = executor.execute(ToolKind::ListAssets, "{}", &ctx).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Project not found"));
    }

    #[tokio::test]
    async fn authorization_failures_use_the_shared_error_variants() {
        let (executor, _store, _ctx) = fixture(false).await;
        let ctx = ExecutionContext {
            user_id: "intruder".into(),
            project_id: "proj-1".into(),
        };
        let outcome = executor
            .execute(ToolKind::GetProjectState, "{}", &ctx)
            .await;
        assert_eq!(
            outcome.error.as_deref(),
            Some(ToolError::Unauthorized.to_string().as_str())
        );

        let missing = ExecutionContext {
            user_id: "user-1".into(),
            project_id: "proj-missing".into(),
        };
        let outcome = executor
            .execute(ToolKind::GetProjectState, "{}", &missing)
            .await;
        let expected = ToolError::NotFound {
            entity: "Project".into(),
        };
        assert_eq!(
            outcome.error.as_deref(),
            Some(expected.to_string().as_str())
        );
    }

    #[tokio::test]
    async fn generate_image_transitions_job_to_processing() {
        let (executor, store, ctx) = fixture(false).await;
        let args = r#"{"prompt": "a misty forest at dawn, cinematic"}"#;
        let outcome = executor.execute(ToolKind::GenerateImage, args, &ctx).await;
        assert!(outcome.success, "{:?}", outcome.error);

        let job_id = outcome.data.unwrap()["jobId"].as_str().unwrap().to_string();
        let job = store.job(&job_id).await.unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.external_id.as_deref(), Some("req-img-1"));
    }

    #[tokio::test]
    async fn generate_image_provider_failure_surfaces_as_failed_outcome() {
        let (executor, _store, ctx) = fixture(true).await;
        let args = r#"{"prompt": "a misty forest at dawn, cinematic"}"#;
        let outcome = executor.execute(ToolKind::GenerateImage, args, &ctx).await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn generate_video_rejects_non_image_asset() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-audio", AssetKind::Audio).await;
        let args = r#"{"imageAssetId": "asset-audio", "motionPrompt": "slow pan"}"#;
        let outcome = executor.execute(ToolKind::GenerateVideo, args, &ctx).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Asset is not an image"));
    }

    #[tokio::test]
    async fn generate_video_missing_asset() {
        let (executor, _store, ctx) = fixture(false).await;
        let args = r#"{"imageAssetId": "asset-nope", "motionPrompt": "slow pan"}"#;
        let outcome = executor.execute(ToolKind::GenerateVideo, args, &ctx).await;
        assert_eq!(outcome.error.as_deref(), Some("Asset not found"));
    }

    #[tokio::test]
    async fn voiceover_creates_asset_and_completes_job() {
        let (executor, store, ctx) = fixture(false).await;
        let args = r#"{"text": "Welcome to the demo reel."}"#;
        let outcome = executor
            .execute(ToolKind::GenerateVoiceover, args, &ctx)
            .await;
        assert!(outcome.success, "{:?}", outcome.error);

        let data = outcome.data.unwrap();
        assert_eq!(data["durationSecs"], 2.0);
        assert!(data["wordTimestamps"].as_array().unwrap().len() > 0);

        let asset_id = data["assetId"].as_str().unwrap();
        let asset = store.asset(asset_id).await.unwrap().unwrap();
        assert_eq!(asset.kind, AssetKind::Audio);
        assert!(asset.word_timestamps.is_some());
    }

    #[tokio::test]
    async fn update_timeline_add_video_clip_persists_duration() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-vid", AssetKind::Video).await;
        let args = r#"{"action": "addVideoClip", "videoAssetId": "asset-vid"}"#;
        let outcome = executor.execute(ToolKind::UpdateTimeline, args, &ctx).await;
        assert!(outcome.success, "{:?}", outcome.error);

        let data = outcome.data.unwrap();
        // 5 s asset at 30 fps
        assert_eq!(data["totalDurationFrames"], 150);
        assert_eq!(data["clipCounts"]["video"], 1);

        let stored = store.manifest("proj-1").await.unwrap().unwrap();
        let manifest: TimelineManifest = serde_json::from_value(stored).unwrap();
        assert_eq!(manifest.total_duration_frames(), 150);
    }

    #[tokio::test]
    async fn update_timeline_add_video_rejects_audio_asset() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-audio", AssetKind::Audio).await;
        let args = r#"{"action": "addVideoClip", "videoAssetId": "asset-audio"}"#;
        let outcome = executor.execute(ToolKind::UpdateTimeline, args, &ctx).await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Asset is not a video"));
    }

    #[tokio::test]
    async fn remove_unknown_clip_leaves_manifest_unchanged() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-vid", AssetKind::Video).await;
        let add = r#"{"action": "addVideoClip", "videoAssetId": "asset-vid"}"#;
        assert!(executor.execute(ToolKind::UpdateTimeline, add, &ctx).await.success);

        let remove = r#"{"action": "removeClip", "clipId": "clip-nope"}"#;
        let outcome = executor
            .execute(ToolKind::UpdateTimeline, remove, &ctx)
            .await;
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("Clip not found: clip-nope"));

        let stored = store.manifest("proj-1").await.unwrap().unwrap();
        let manifest: TimelineManifest = serde_json::from_value(stored).unwrap();
        assert_eq!(manifest.clip_counts().0, 1);
    }

    #[tokio::test]
    async fn malformed_arguments_fail_validation_not_panic() {
        let (executor, _store, ctx) = fixture(false).await;
        let outcome = executor
            .execute(ToolKind::GenerateImage, "{\"prompt\": \"a sunse", &ctx)
            .await;
        assert!(!outcome.success);
        // Falls back to {} so validation reports the missing prompt
        assert!(outcome.error.unwrap().contains("prompt"));
    }

    #[tokio::test]
    async fn list_assets_filters_by_kind() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-img", AssetKind::Image).await;
        seed_asset(&store, "asset-vid", AssetKind::Video).await;

        let outcome = executor
            .execute(ToolKind::ListAssets, r#"{"type": "image"}"#, &ctx)
            .await;
        assert!(outcome.success);
        let assets = outcome.data.unwrap()["assets"].as_array().unwrap().clone();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0]["type"], "image");
    }

    #[tokio::test]
    async fn read_tools_are_idempotent() {
        let (executor, store, ctx) = fixture(false).await;
        seed_asset(&store, "asset-img", AssetKind::Image).await;

        let first = executor
            .execute(ToolKind::GetProjectState, "{}", &ctx)
            .await;
        let second = executor
            .execute(ToolKind::GetProjectState, "{}", &ctx)
            .await;
        assert_eq!(first.to_json(), second.to_json());
    }

    #[test]
    fn outcome_wire_shape() {
        let ok = ToolOutcome::ok(serde_json::json!({"jobId": "j1"}));
        let json = ok.to_json();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["jobId"], "j1");

        let fail = ToolOutcome::fail("Unauthorized");
        let json = fail.to_json();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Unauthorized");
        assert!(json.get("data").is_none());
    }
}
