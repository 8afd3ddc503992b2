//! The timeline manifest document and its clip types.

use std::collections::HashMap;

use reelforge_core::project::WordTimestamp;
use serde::{Deserialize, Serialize};

/// Which collection a clip lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Video,
    Audio,
    Overlay,
}

/// Lookup order for id-based actions (`removeClip`, `moveClip`): the first
/// match in this order wins. Ids are unique in practice, but the tie-break
/// order is part of the protocol.
pub const TRACK_SEARCH_ORDER: [Track; 3] = [Track::Video, Track::Audio, Track::Overlay];

/// A positioned reference to a video asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClip {
    pub id: String,
    pub asset_id: String,
    pub url: String,
    pub start_frame: u32,
    pub duration_frames: u32,
    /// 0 = bottom; higher draws on top
    pub layer: i32,
}

/// A positioned reference to an audio asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioClip {
    pub id: String,
    pub asset_id: String,
    pub url: String,
    pub start_frame: u32,
    pub duration_frames: u32,
    pub layer: i32,
    /// Word-level timestamps carried over from the source asset, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_timestamps: Option<Vec<WordTimestamp>>,
}

/// The kind of a text overlay. A closed set with typed props per kind,
/// persisted as the overlay's `component` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Title,
    Subtitle,
    Caption,
}

/// Vertical placement of a text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

/// A non-media timeline element rendered above clips per its layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub id: String,
    #[serde(rename = "component")]
    pub kind: OverlayKind,
    pub text: String,
    pub position: OverlayPosition,
    pub font_size: u32,
    pub color: String,
    pub start_frame: u32,
    pub duration_frames: u32,
    pub layer: i32,
}

/// One JSON document per project describing the full timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineManifest {
    #[serde(default)]
    pub video_clips: Vec<VideoClip>,
    #[serde(default)]
    pub audio_clips: Vec<AudioClip>,
    #[serde(default)]
    pub overlays: Vec<TextOverlay>,
    #[serde(default = "default_background")]
    pub background_color: String,
}

fn default_background() -> String {
    "#000000".into()
}

impl Default for TimelineManifest {
    fn default() -> Self {
        Self {
            video_clips: Vec::new(),
            audio_clips: Vec::new(),
            overlays: Vec::new(),
            background_color: default_background(),
        }
    }
}

impl TimelineManifest {
    /// Total duration in frames: `max(start_frame + duration_frames)` over
    /// the union of all three collections, or 0 when the manifest is empty.
    /// End frames saturate at `u32::MAX` rather than wrapping.
    pub fn total_duration_frames(&self) -> u32 {
        let video = self
            .video_clips
            .iter()
            .map(|c| c.start_frame.saturating_add(c.duration_frames));
        let audio = self
            .audio_clips
            .iter()
            .map(|c| c.start_frame.saturating_add(c.duration_frames));
        let overlays = self
            .overlays
            .iter()
            .map(|c| c.start_frame.saturating_add(c.duration_frames));
        video.chain(audio).chain(overlays).max().unwrap_or(0)
    }

    /// Clip counts per track: (video, audio, overlay).
    pub fn clip_counts(&self) -> (usize, usize, usize) {
        (
            self.video_clips.len(),
            self.audio_clips.len(),
            self.overlays.len(),
        )
    }

    /// End of the last video clip — the default start for a new video clip.
    pub fn video_track_end(&self) -> u32 {
        self.video_clips
            .iter()
            .map(|c| c.start_frame.saturating_add(c.duration_frames))
            .max()
            .unwrap_or(0)
    }

    /// Build the clip index for id-based actions: clip id → (track, position).
    ///
    /// Insertion follows [`TRACK_SEARCH_ORDER`]; on an id collision the
    /// earlier track wins, matching the documented first-match semantics.
    pub(crate) fn clip_index(&self) -> HashMap<&str, (Track, usize)> {
        let mut index: HashMap<&str, (Track, usize)> = HashMap::new();
        for track in TRACK_SEARCH_ORDER {
            match track {
                Track::Video => {
                    for (i, clip) in self.video_clips.iter().enumerate() {
                        index.entry(clip.id.as_str()).or_insert((track, i));
                    }
                }
                Track::Audio => {
                    for (i, clip) in self.audio_clips.iter().enumerate() {
                        index.entry(clip.id.as_str()).or_insert((track, i));
                    }
                }
                Track::Overlay => {
                    for (i, clip) in self.overlays.iter().enumerate() {
                        index.entry(clip.id.as_str()).or_insert((track, i));
                    }
                }
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, start: u32, dur: u32) -> VideoClip {
        VideoClip {
            id: id.into(),
            asset_id: format!("asset-{id}"),
            url: format!("https://cdn.example/{id}.mp4"),
            start_frame: start,
            duration_frames: dur,
            layer: 0,
        }
    }

    #[test]
    fn empty_manifest_has_zero_duration() {
        let manifest = TimelineManifest::default();
        assert_eq!(manifest.total_duration_frames(), 0);
        assert_eq!(manifest.background_color, "#000000");
    }

    #[test]
    fn duration_spans_all_tracks() {
        let mut manifest = TimelineManifest::default();
        manifest.video_clips.push(video("a", 0, 150));
        manifest.audio_clips.push(AudioClip {
            id: "b".into(),
            asset_id: "asset-b".into(),
            url: "https://cdn.example/b.mp3".into(),
            start_frame: 100,
            duration_frames: 200,
            layer: 0,
            word_timestamps: None,
        });
        // Audio ends last: 100 + 200
        assert_eq!(manifest.total_duration_frames(), 300);
    }

    #[test]
    fn duration_saturates_instead_of_wrapping() {
        let mut manifest = TimelineManifest::default();
        manifest.video_clips.push(video("a", u32::MAX - 1, 10));
        assert_eq!(manifest.total_duration_frames(), u32::MAX);
        assert_eq!(manifest.video_track_end(), u32::MAX);
    }

    #[test]
    fn video_track_end_ignores_other_tracks() {
        let mut manifest = TimelineManifest::default();
        manifest.video_clips.push(video("a", 0, 150));
        manifest.video_clips.push(video("b", 150, 90));
        manifest.overlays.push(TextOverlay {
            id: "t".into(),
            kind: OverlayKind::Title,
            text: "Intro".into(),
            position: OverlayPosition::Center,
            font_size: 48,
            color: "#FFFFFF".into(),
            start_frame: 500,
            duration_frames: 90,
            layer: 10,
        });
        assert_eq!(manifest.video_track_end(), 240);
    }

    #[test]
    fn clip_index_prefers_earlier_track_on_collision() {
        let mut manifest = TimelineManifest::default();
        manifest.video_clips.push(video("dup", 0, 10));
        manifest.audio_clips.push(AudioClip {
            id: "dup".into(),
            asset_id: "asset-dup".into(),
            url: "https://cdn.example/dup.mp3".into(),
            start_frame: 0,
            duration_frames: 10,
            layer: 0,
            word_timestamps: None,
        });
        let index = manifest.clip_index();
        assert_eq!(index.get("dup"), Some(&(Track::Video, 0)));
    }

    #[test]
    fn manifest_wire_form_is_camel_case() {
        let mut manifest = TimelineManifest::default();
        manifest.video_clips.push(video("a", 0, 150));
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains("videoClips"));
        assert!(json.contains("startFrame"));
        assert!(json.contains("durationFrames"));
        assert!(json.contains("backgroundColor"));
    }

    #[test]
    fn overlay_kind_serializes_as_component_tag() {
        let overlay = TextOverlay {
            id: "t".into(),
            kind: OverlayKind::Subtitle,
            text: "hello".into(),
            position: OverlayPosition::Bottom,
            font_size: 32,
            color: "#FFFFFF".into(),
            start_frame: 0,
            duration_frames: 90,
            layer: 10,
        };
        let json = serde_json::to_string(&overlay).unwrap();
        assert!(json.contains(r#""component":"subtitle""#));
        assert!(json.contains(r#""position":"bottom""#));
    }

    #[test]
    fn manifest_deserializes_with_missing_collections() {
        let manifest: TimelineManifest =
            serde_json::from_str(r##"{"backgroundColor":"#112233"}"##).unwrap();
        assert!(manifest.video_clips.is_empty());
        assert_eq!(manifest.background_color, "#112233");
    }
}
