//! Configuration loading, validation, and management for Reelforge.
//!
//! Loads configuration from `~/.reelforge/config.toml` with environment
//! variable overrides. All ambient settings — model defaults, provider
//! credentials, agent budgets — are carried in one injected config struct
//! rather than read from process state at call sites.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.reelforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Completion provider settings
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Generation provider settings (image/video/speech)
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Agent loop budgets and context sizing
    #[serde(default)]
    pub agent: AgentConfig,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Completion (LLM) provider configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API key; env `REELFORGE_API_KEY` / `OPENAI_API_KEY` override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// OpenAI-compatible endpoint base URL
    #[serde(default = "default_completion_url")]
    pub base_url: String,

    /// Default model when neither the request nor the user preference names one
    #[serde(default = "default_model")]
    pub default_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_url(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Generation provider configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API key; env `REELFORGE_GENERATION_API_KEY` overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Queue-style generation endpoint base URL
    #[serde(default = "default_generation_url")]
    pub base_url: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_video_model")]
    pub video_model: String,

    /// Default voice style for voiceover synthesis
    #[serde(default = "default_voice")]
    pub default_voice: String,
}

fn default_generation_url() -> String {
    "https://queue.fal.run".into()
}
fn default_image_model() -> String {
    "flux/dev".into()
}
fn default_video_model() -> String {
    "kling-video/v1.6/standard".into()
}
fn default_voice() -> String {
    "narrator".into()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_generation_url(),
            image_model: default_image_model(),
            video_model: default_video_model(),
            default_voice: default_voice(),
        }
    }
}

/// Agent loop budgets and context sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum completion round-trips per turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Maximum executed tool calls per turn, across all iterations
    #[serde(default = "default_max_tool_calls")]
    pub max_tool_calls: u32,

    /// Persisted messages loaded as context for each turn
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

fn default_max_iterations() -> u32 {
    5
}
fn default_max_tool_calls() -> u32 {
    10
}
fn default_context_messages() -> usize {
    50
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_tool_calls: default_max_tool_calls(),
            context_messages: default_context_messages(),
        }
    }
}

/// Store (database) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path; `:memory:` for ephemeral
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    "reelforge.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

/// Gateway (HTTP server) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8741
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudioConfig")
            .field("completion", &self.completion)
            .field("generation", &self.generation)
            .field("agent", &self.agent)
            .field("store", &self.store)
            .field("gateway", &self.gateway)
            .finish()
    }
}

impl std::fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .field("default_voice", &self.default_voice)
            .finish()
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            completion: CompletionConfig::default(),
            generation: GenerationConfig::default(),
            agent: AgentConfig::default(),
            store: StoreConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl StudioConfig {
    /// Load configuration from the default path (~/.reelforge/config.toml),
    /// then apply environment variable overrides:
    /// - `REELFORGE_API_KEY` / `OPENAI_API_KEY` — completion key
    /// - `REELFORGE_GENERATION_API_KEY` — generation key
    /// - `REELFORGE_MODEL` — default completion model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.completion.api_key.is_none() {
            config.completion.api_key = std::env::var("REELFORGE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if config.generation.api_key.is_none() {
            config.generation.api_key = std::env::var("REELFORGE_GENERATION_API_KEY").ok();
        }

        if let Ok(model) = std::env::var("REELFORGE_MODEL") {
            config.completion.default_model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".reelforge")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.completion.temperature < 0.0 || self.completion.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "completion.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_iterations == 0 || self.agent.max_tool_calls == 0 {
            return Err(ConfigError::ValidationError(
                "agent budgets must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
