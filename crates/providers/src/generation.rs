//! HTTP generation provider for queue-style media APIs.
//!
//! Image and video jobs are submitted to `{base_url}/{model}` and the queue
//! answers immediately with a request id; webhooks deliver the result later,
//! outside this subsystem. Speech synthesis hits the synchronous endpoint and
//! blocks until the audio URL and word timestamps are available.

use async_trait::async_trait;
use reelforge_core::generation::*;
use reelforge_core::project::WordTimestamp;
use serde::Deserialize;
use tracing::debug;

/// A generation provider speaking the fal.ai-style queue protocol.
pub struct HttpGenerationProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpGenerationProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Build a provider from the generation section of the config.
    pub fn from_config(
        config: &reelforge_config::GenerationConfig,
    ) -> Result<Self, GenerationError> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            GenerationError::NotConfigured("generation.api_key is not set".into())
        })?;
        Self::new("fal", &config.base_url, api_key)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, GenerationError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Key {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::ApiError {
                status_code: status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationProvider for HttpGenerationProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_image(
        &self,
        request: ImageRequest,
    ) -> std::result::Result<JobTicket, GenerationError> {
        debug!(model = %request.model, "Submitting image generation job");

        let body = serde_json::json!({
            "prompt": request.prompt,
            "image_size": { "width": request.width, "height": request.height },
        });

        let queued: QueueResponse = self.post_json(&request.model, &body).await?;
        Ok(JobTicket {
            request_id: queued.request_id,
        })
    }

    async fn generate_video(
        &self,
        request: VideoRequest,
    ) -> std::result::Result<JobTicket, GenerationError> {
        debug!(model = %request.model, duration_secs = request.duration_secs, "Submitting video generation job");

        let body = serde_json::json!({
            "image_url": request.image_url,
            "prompt": request.motion_prompt,
            "duration": request.duration_secs.to_string(),
        });

        let queued: QueueResponse = self.post_json(&request.model, &body).await?;
        Ok(JobTicket {
            request_id: queued.request_id,
        })
    }

    async fn generate_speech(
        &self,
        request: SpeechRequest,
    ) -> std::result::Result<SpeechOutput, GenerationError> {
        debug!(voice = %request.voice, chars = request.text.len(), "Synthesizing speech");

        let body = serde_json::json!({
            "text": request.text,
            "voice": request.voice,
            "timestamps": true,
        });

        let resp: SpeechResponse = self.post_json("tts/synthesize", &body).await?;

        let word_timestamps = resp
            .words
            .into_iter()
            .map(|w| WordTimestamp {
                word: w.word,
                start_secs: w.start,
                end_secs: w.end,
            })
            .collect();

        Ok(SpeechOutput {
            audio_url: resp.audio.url,
            duration_secs: resp.audio.duration,
            word_timestamps,
        })
    }
}

// --- Wire types ---

#[derive(Debug, Deserialize)]
struct QueueResponse {
    request_id: String,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    audio: AudioFile,
    #[serde(default)]
    words: Vec<TimedWord>,
}

#[derive(Debug, Deserialize)]
struct AudioFile {
    url: String,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct TimedWord {
    word: String,
    start: f64,
    end: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_response_parsing() {
        let data = r#"{"request_id": "req-123", "status": "IN_QUEUE"}"#;
        let parsed: QueueResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.request_id, "req-123");
    }

    #[test]
    fn speech_response_parsing() {
        let data = r#"{
            "audio": {"url": "https://cdn.example/out.mp3", "duration": 3.2},
            "words": [
                {"word": "hello", "start": 0.0, "end": 0.4},
                {"word": "world", "start": 0.5, "end": 0.9}
            ]
        }"#;
        let parsed: SpeechResponse = serde_json::from_str(data).unwrap();
        assert_eq!(parsed.audio.duration, 3.2);
        assert_eq!(parsed.words.len(), 2);
        assert_eq!(parsed.words[1].word, "world");
    }

    #[test]
    fn speech_response_without_words() {
        let data = r#"{"audio": {"url": "https://cdn.example/out.mp3", "duration": 1.0}}"#;
        let parsed: SpeechResponse = serde_json::from_str(data).unwrap();
        assert!(parsed.words.is_empty());
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let p = HttpGenerationProvider::new("fal", "https://queue.fal.run/", "key").unwrap();
        assert_eq!(p.base_url, "https://queue.fal.run");
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = reelforge_config::GenerationConfig::default();
        assert!(HttpGenerationProvider::from_config(&config).is_err());
    }
}
