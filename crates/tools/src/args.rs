//! Typed tool arguments and their validation rules.
//!
//! The model sends arguments as a JSON string. [`parse_raw`] turns that into
//! a value, falling back to `{}` on malformed JSON (the model occasionally
//! truncates; a lenient parse keeps the turn alive and validation catches the
//! missing fields). The per-tool structs then deserialize from that value and
//! enforce length/range limits before any side effect happens.

use reelforge_core::error::ToolError;
use reelforge_core::project::AssetKind;
use serde::Deserialize;
use tracing::warn;

pub const PROMPT_MIN_CHARS: usize = 10;
pub const PROMPT_MAX_CHARS: usize = 1000;
pub const MOTION_PROMPT_MIN_CHARS: usize = 5;
pub const MOTION_PROMPT_MAX_CHARS: usize = 500;
pub const VOICEOVER_MAX_CHARS: usize = 5000;
pub const VIDEO_DURATION_RANGE_SECS: (u32, u32) = (5, 10);
pub const DEFAULT_VIDEO_DURATION_SECS: u32 = 5;

/// Parse the raw argument blob from a tool call.
///
/// Malformed JSON falls back to an empty object rather than failing the
/// call outright, but the parse error is surfaced in the logs with the tool
/// name attached so truncation bugs stay visible.
pub fn parse_raw(tool_name: &str, raw: &str) -> serde_json::Value {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(tool = tool_name, error = %e, "Argument parse error, treating as empty object");
            serde_json::json!({})
        }
    }
}

fn invalid(msg: impl Into<String>) -> ToolError {
    ToolError::InvalidArguments(msg.into())
}

fn from_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageArgs {
    pub prompt: String,
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default)]
    pub style: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// Output dimensions for the ratio.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::Wide => (1280, 720),
            AspectRatio::Tall => (720, 1280),
            AspectRatio::Square => (1024, 1024),
        }
    }
}

impl GenerateImageArgs {
    pub fn parse(value: serde_json::Value) -> Result<Self, ToolError> {
        let args: Self = from_value(value)?;
        let len = args.prompt.chars().count();
        if !(PROMPT_MIN_CHARS..=PROMPT_MAX_CHARS).contains(&len) {
            return Err(invalid(format!(
                "prompt must be {PROMPT_MIN_CHARS}-{PROMPT_MAX_CHARS} characters, got {len}"
            )));
        }
        Ok(args)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoArgs {
    pub image_asset_id: String,
    pub motion_prompt: String,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl GenerateVideoArgs {
    pub fn parse(value: serde_json::Value) -> Result<Self, ToolError> {
        let args: Self = from_value(value)?;
        let len = args.motion_prompt.chars().count();
        if !(MOTION_PROMPT_MIN_CHARS..=MOTION_PROMPT_MAX_CHARS).contains(&len) {
            return Err(invalid(format!(
                "motionPrompt must be {MOTION_PROMPT_MIN_CHARS}-{MOTION_PROMPT_MAX_CHARS} characters, got {len}"
            )));
        }
        if let Some(duration) = args.duration {
            let (min, max) = VIDEO_DURATION_RANGE_SECS;
            if !(min..=max).contains(&duration) {
                return Err(invalid(format!(
                    "duration must be {min}-{max} seconds, got {duration}"
                )));
            }
        }
        Ok(args)
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration.unwrap_or(DEFAULT_VIDEO_DURATION_SECS)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVoiceoverArgs {
    pub text: String,
    #[serde(default)]
    pub voice_style: Option<String>,
}

impl GenerateVoiceoverArgs {
    pub fn parse(value: serde_json::Value) -> Result<Self, ToolError> {
        let args: Self = from_value(value)?;
        let len = args.text.chars().count();
        if len == 0 || len > VOICEOVER_MAX_CHARS {
            return Err(invalid(format!(
                "text must be 1-{VOICEOVER_MAX_CHARS} characters, got {len}"
            )));
        }
        Ok(args)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListAssetsArgs {
    #[serde(rename = "type", default)]
    pub kind: Option<AssetKind>,
}

impl ListAssetsArgs {
    pub fn parse(value: serde_json::Value) -> Result<Self, ToolError> {
        from_value(value)
    }
}
