//! Timeline manifest model and mutation protocol.
//!
//! One manifest per project: three ordered collections (video clips, audio
//! clips, text overlays) positioned on a fixed-fps frame axis, plus global
//! settings. The manifest is mutated only through the closed
//! [`TimelineAction`] set; after every action the total duration is
//! recomputed as `max(start_frame + duration_frames)` over all collections.
//!
//! This crate is pure: asset resolution and persistence live in the tool
//! executor. The on-wire/persisted form stays JSON (camelCase) for
//! compatibility with the rendering pipeline.

pub mod action;
pub mod manifest;

pub use action::{ClipSource, TimelineAction, TimelineError};
pub use manifest::{
    AudioClip, OverlayKind, OverlayPosition, TextOverlay, TimelineManifest, Track, VideoClip,
    TRACK_SEARCH_ORDER,
};
