//! The closed tool catalog.
//!
//! Tool names and argument schemas are the contract with the model; the
//! schemas here are what gets attached to every completion request, and the
//! names are what comes back in tool calls.

use reelforge_core::provider::ToolDefinition;

/// The six tools the agent can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    GetProjectState,
    GenerateImage,
    GenerateVideo,
    GenerateVoiceover,
    UpdateTimeline,
    ListAssets,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::GetProjectState,
        ToolKind::GenerateImage,
        ToolKind::GenerateVideo,
        ToolKind::GenerateVoiceover,
        ToolKind::UpdateTimeline,
        ToolKind::ListAssets,
    ];

    /// Resolve a tool name from a model response. Unknown names return `None`
    /// and become a failed tool result, not a loop abort.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "getProjectState" => Some(ToolKind::GetProjectState),
            "generateImage" => Some(ToolKind::GenerateImage),
            "generateVideo" => Some(ToolKind::GenerateVideo),
            "generateVoiceover" => Some(ToolKind::GenerateVoiceover),
            "updateTimeline" => Some(ToolKind::UpdateTimeline),
            "listAssets" => Some(ToolKind::ListAssets),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::GetProjectState => "getProjectState",
            ToolKind::GenerateImage => "generateImage",
            ToolKind::GenerateVideo => "generateVideo",
            ToolKind::GenerateVoiceover => "generateVoiceover",
            ToolKind::UpdateTimeline => "updateTimeline",
            ToolKind::ListAssets => "listAssets",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolKind::GetProjectState => {
                "Get the current state of the project: timeline clip counts, total duration, background color, and the most recent assets."
            }
            ToolKind::GenerateImage => {
                "Start an async image generation job from a text prompt. Returns a job id; the image appears as an asset when the job completes."
            }
            ToolKind::GenerateVideo => {
                "Start an async image-to-video generation job animating an existing image asset. Returns a job id."
            }
            ToolKind::GenerateVoiceover => {
                "Synthesize a voiceover from text. Synchronous: returns the new audio asset id, its duration, and word-level timestamps."
            }
            ToolKind::UpdateTimeline => {
                "Mutate the project timeline with a single action: add a video/audio clip, add a text overlay, remove or move a clip, or set the background color."
            }
            ToolKind::ListAssets => {
                "List up to 50 of the project's most recent assets, optionally filtered by type."
            }
        }
    }

    /// JSON Schema for the tool's argument object.
    pub fn parameters_schema(&self) -> serde_json::Value {
        match self {
            ToolKind::GetProjectState => serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            ToolKind::GenerateImage => serde_json::json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "What to generate, 10-1000 characters"
                    },
                    "aspectRatio": {
                        "type": "string",
                        "enum": ["16:9", "9:16", "1:1"],
                        "description": "Output aspect ratio (default: project dimensions)"
                    },
                    "style": {
                        "type": "string",
                        "description": "Optional style hint, e.g. 'cinematic' or 'watercolor'"
                    }
                },
                "required": ["prompt"]
            }),
            ToolKind::GenerateVideo => serde_json::json!({
                "type": "object",
                "properties": {
                    "imageAssetId": {
                        "type": "string",
                        "description": "Id of an existing image asset to animate"
                    },
                    "motionPrompt": {
                        "type": "string",
                        "description": "How the image should move, 5-500 characters"
                    },
                    "duration": {
                        "type": "integer",
                        "minimum": 5,
                        "maximum": 10,
                        "description": "Clip length in seconds (default 5)"
                    }
                },
                "required": ["imageAssetId", "motionPrompt"]
            }),
            ToolKind::GenerateVoiceover => serde_json::json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Narration text, 1-5000 characters"
                    },
                    "voiceStyle": {
                        "type": "string",
                        "description": "Optional voice style (default from config)"
                    }
                },
                "required": ["text"]
            }),
            ToolKind::UpdateTimeline => serde_json::json!({
                "type": "object",
                "properties": {
                    "action": {
                        "type": "string",
                        "enum": [
                            "addVideoClip",
                            "addAudioClip",
                            "addTextOverlay",
                            "removeClip",
                            "moveClip",
                            "setBackground"
                        ],
                        "description": "Which mutation to apply"
                    },
                    "videoAssetId": { "type": "string" },
                    "audioAssetId": { "type": "string" },
                    "textOverlayType": {
                        "type": "string",
                        "enum": ["title", "subtitle", "caption"]
                    },
                    "textOverlayText": { "type": "string" },
                    "position": { "type": "string", "enum": ["top", "center", "bottom"] },
                    "fontSize": { "type": "integer" },
                    "color": { "type": "string" },
                    "startFrame": { "type": "integer", "minimum": 0 },
                    "durationFrames": { "type": "integer", "minimum": 1 },
                    "newStartFrame": { "type": "integer", "minimum": 0 },
                    "layer": { "type": "integer" },
                    "clipId": { "type": "string" },
                    "backgroundColor": { "type": "string" }
                },
                "required": ["action"]
            }),
            ToolKind::ListAssets => serde_json::json!({
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["image", "video", "audio"],
                        "description": "Filter by asset type"
                    }
                }
            }),
        }
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }

    /// The full catalog as completion-request tool definitions.
    pub fn definitions() -> Vec<ToolDefinition> {
        Self::ALL.iter().map(|t| t.to_definition()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(ToolKind::from_name("deleteProject"), None);
        assert_eq!(ToolKind::from_name(""), None);
    }

    #[test]
    fn definitions_cover_all_tools() {
        let defs = ToolKind::definitions();
        assert_eq!(defs.len(), 6);
        assert!(defs.iter().all(|d| !d.description.is_empty()));
        assert!(defs.iter().all(|d| d.parameters["type"] == "object"));
    }

    #[test]
    fn required_fields_declared() {
        let schema = ToolKind::GenerateVideo.parameters_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("imageAssetId")));
        assert!(required.contains(&serde_json::json!("motionPrompt")));
    }
}
