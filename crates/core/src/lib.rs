//! # Reelforge Core
//!
//! Domain types, traits, and error definitions for the Reelforge studio agent.
//! This crate has **zero framework dependencies** — it defines the domain model
//! that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion API, generation providers, the
//! relational store) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod generation;
pub mod message;
pub mod project;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use generation::{
    GenerationError, GenerationProvider, ImageRequest, JobTicket, SpeechOutput, SpeechRequest,
    VideoRequest,
};
pub use message::{Message, MessageToolCall, Role};
pub use project::{
    Asset, AssetKind, GenerationJob, JobKind, JobStatus, Project, WordTimestamp,
};
pub use provider::{
    CompletionProvider, CompletionRequest, CompletionResponse, StreamChunk, ToolChoice,
    ToolDefinition, Usage,
};
pub use store::{StoreError, StudioStore};
