//! Provider clients for Reelforge.
//!
//! - [`OpenAiCompatProvider`] — chat completions against any
//!   OpenAI-compatible endpoint, with function calling and streaming SSE.
//! - [`HttpGenerationProvider`] — queue-style image/video generation plus
//!   synchronous speech synthesis.

pub mod generation;
pub mod openai_compat;

pub use generation::HttpGenerationProvider;
pub use openai_compat::OpenAiCompatProvider;
