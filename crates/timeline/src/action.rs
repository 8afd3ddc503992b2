//! The closed action set that mutates a timeline manifest.
//!
//! Actions are a discriminated union keyed by an `action` field, matching the
//! argument shape the model produces for the `updateTimeline` tool. Asset
//! resolution happens in the tool executor; add actions receive the resolved
//! [`ClipSource`] here.

use reelforge_core::project::WordTimestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::manifest::{
    AudioClip, OverlayKind, OverlayPosition, TextOverlay, TimelineManifest, Track, VideoClip,
};

/// Fallback clip length when the source asset has no stored duration.
pub const FALLBACK_CLIP_FRAMES: u32 = 150;
/// Default overlay length: 3 seconds at 30 fps.
pub const DEFAULT_OVERLAY_FRAMES: u32 = 90;
/// Overlays render above video/audio by convention.
pub const DEFAULT_OVERLAY_LAYER: i32 = 10;
pub const DEFAULT_OVERLAY_FONT_SIZE: u32 = 48;
pub const DEFAULT_OVERLAY_COLOR: &str = "#FFFFFF";

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Missing resolved asset for {0}")]
    MissingSource(&'static str),
}

/// Resolved asset details an add action needs, produced by the executor.
#[derive(Debug, Clone)]
pub struct ClipSource {
    pub asset_id: String,
    pub url: String,
    pub duration_secs: Option<f64>,
    pub word_timestamps: Option<Vec<WordTimestamp>>,
}

/// One mutation of the timeline manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TimelineAction {
    AddVideoClip {
        video_asset_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_frame: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_frames: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<i32>,
    },
    AddAudioClip {
        audio_asset_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_frame: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_frames: Option<u32>,
    },
    AddTextOverlay {
        text_overlay_type: OverlayKind,
        text_overlay_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<OverlayPosition>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_frame: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_frames: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<i32>,
    },
    RemoveClip {
        clip_id: String,
    },
    MoveClip {
        clip_id: String,
        new_start_frame: u32,
    },
    SetBackground {
        background_color: String,
    },
}

impl TimelineAction {
    /// The asset id an add action references, if any. The executor resolves
    /// it to a [`ClipSource`] before applying.
    pub fn referenced_asset_id(&self) -> Option<&str> {
        match self {
            TimelineAction::AddVideoClip { video_asset_id, .. } => Some(video_asset_id),
            TimelineAction::AddAudioClip { audio_asset_id, .. } => Some(audio_asset_id),
            _ => None,
        }
    }
}

impl TimelineManifest {
    /// Apply one action to the manifest in memory.
    ///
    /// Asset-lookup failures are the executor's concern and happen before
    /// this call; the only failures here are a missing source for an add
    /// action and an unknown clip id. The caller persists the manifest and
    /// the recomputed duration in a single write afterwards.
    pub fn apply(
        &mut self,
        action: &TimelineAction,
        source: Option<&ClipSource>,
        fps: u32,
    ) -> Result<(), TimelineError> {
        match action {
            TimelineAction::AddVideoClip {
                start_frame,
                duration_frames,
                layer,
                ..
            } => {
                let source = source.ok_or(TimelineError::MissingSource("addVideoClip"))?;
                let start = start_frame.unwrap_or_else(|| self.video_track_end());
                let duration =
                    duration_frames.unwrap_or_else(|| frames_from_secs(source.duration_secs, fps));
                self.video_clips.push(VideoClip {
                    id: Uuid::new_v4().to_string(),
                    asset_id: source.asset_id.clone(),
                    url: source.url.clone(),
                    start_frame: start,
                    duration_frames: duration,
                    layer: layer.unwrap_or(0),
                });
                Ok(())
            }

            TimelineAction::AddAudioClip {
                start_frame,
                duration_frames,
                ..
            } => {
                let source = source.ok_or(TimelineError::MissingSource("addAudioClip"))?;
                // Audio defaults to frame 0, not end-of-timeline: narration
                // usually starts at time zero. Asymmetric with video on purpose.
                let start = start_frame.unwrap_or(0);
                let duration =
                    duration_frames.unwrap_or_else(|| frames_from_secs(source.duration_secs, fps));
                self.audio_clips.push(AudioClip {
                    id: Uuid::new_v4().to_string(),
                    asset_id: source.asset_id.clone(),
                    url: source.url.clone(),
                    start_frame: start,
                    duration_frames: duration,
                    layer: 0,
                    word_timestamps: source.word_timestamps.clone(),
                });
                Ok(())
            }

            TimelineAction::AddTextOverlay {
                text_overlay_type,
                text_overlay_text,
                position,
                font_size,
                color,
                start_frame,
                duration_frames,
                layer,
            } => {
                self.overlays.push(TextOverlay {
                    id: Uuid::new_v4().to_string(),
                    kind: *text_overlay_type,
                    text: text_overlay_text.clone(),
                    position: position.unwrap_or_default(),
                    font_size: font_size.unwrap_or(DEFAULT_OVERLAY_FONT_SIZE),
                    color: color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OVERLAY_COLOR.to_string()),
                    start_frame: start_frame.unwrap_or(0),
                    duration_frames: duration_frames.unwrap_or(DEFAULT_OVERLAY_FRAMES),
                    layer: layer.unwrap_or(DEFAULT_OVERLAY_LAYER),
                });
                Ok(())
            }

            TimelineAction::RemoveClip { clip_id } => {
                let index = self.clip_index();
                let (track, position) = *index
                    .get(clip_id.as_str())
                    .ok_or_else(|| TimelineError::ClipNotFound(clip_id.clone()))?;
                match track {
                    Track::Video => {
                        self.video_clips.remove(position);
                    }
                    Track::Audio => {
                        self.audio_clips.remove(position);
                    }
                    Track::Overlay => {
                        self.overlays.remove(position);
                    }
                }
                Ok(())
            }

            TimelineAction::MoveClip {
                clip_id,
                new_start_frame,
            } => {
                let index = self.clip_index();
                let (track, position) = *index
                    .get(clip_id.as_str())
                    .ok_or_else(|| TimelineError::ClipNotFound(clip_id.clone()))?;
                // Overlapping ranges are allowed; `layer` resolves rendering.
                match track {
                    Track::Video => self.video_clips[position].start_frame = *new_start_frame,
                    Track::Audio => self.audio_clips[position].start_frame = *new_start_frame,
                    Track::Overlay => self.overlays[position].start_frame = *new_start_frame,
                }
                Ok(())
            }

            TimelineAction::SetBackground { background_color } => {
                self.background_color = background_color.clone();
                Ok(())
            }
        }
    }
}

/// Convert an asset duration in seconds to frames at the project fps,
/// falling back to [`FALLBACK_CLIP_FRAMES`] when the duration is unknown
/// or rounds to zero.
fn frames_from_secs(duration_secs: Option<f64>, fps: u32) -> u32 {
    duration_secs
        .map(|secs| (secs * fps as f64).round() as u32)
        .filter(|frames| *frames > 0)
        .unwrap_or(FALLBACK_CLIP_FRAMES)
}
