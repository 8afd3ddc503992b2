//! Generation provider trait — the abstraction over image/video/speech APIs.
//!
//! Image and video generation are queue-style: the provider accepts the job
//! and returns a request id; completion handling is outside this subsystem.
//! Speech synthesis is the one synchronous path — the call blocks until the
//! audio exists and returns its URL, duration, and word-level timestamps.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::project::WordTimestamp;

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Generation request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Request to start an async image generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub model: String,
    pub width: u32,
    pub height: u32,
}

/// Request to start an async image-to-video generation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    /// Source image to animate
    pub image_url: String,
    pub motion_prompt: String,
    pub model: String,
    /// Requested clip length, 5–10 seconds
    pub duration_secs: u32,
}

/// Request to synthesize speech.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub voice: String,
}

/// The provider's acknowledgement of an accepted async job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTicket {
    pub request_id: String,
}

/// The output of a synchronous speech synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechOutput {
    pub audio_url: String,
    pub duration_secs: f64,
    pub word_timestamps: Vec<WordTimestamp>,
}

/// The generation provider trait.
///
/// The tool executor is the only caller; per-vendor payload shaping lives
/// entirely behind this boundary.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Start an async text-to-image job. Non-blocking.
    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> std::result::Result<JobTicket, GenerationError>;

    /// Start an async image-to-video job. Non-blocking.
    async fn generate_video(
        &self,
        request: VideoRequest,
    ) -> std::result::Result<JobTicket, GenerationError>;

    /// Synthesize speech. Blocks until the audio is available.
    async fn generate_speech(
        &self,
        request: SpeechRequest,
    ) -> std::result::Result<SpeechOutput, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_output_serialization() {
        let out = SpeechOutput {
            audio_url: "https://cdn.example/voice.mp3".into(),
            duration_secs: 2.5,
            word_timestamps: vec![WordTimestamp {
                word: "hi".into(),
                start_secs: 0.0,
                end_secs: 0.3,
            }],
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains("voice.mp3"));
        assert!(json.contains("startSecs"));
    }

    #[test]
    fn generation_error_display() {
        let err = GenerationError::ApiError {
            status_code: 503,
            message: "overloaded".into(),
        };
        assert!(err.to_string().contains("503"));
    }
}
