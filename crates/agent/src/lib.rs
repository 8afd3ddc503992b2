//! The agent orchestration loop.
//!
//! One turn: a user message enters [`AgentLoop::run`], the loop replays the
//! project's chat history, calls the completion API with the tool catalog,
//! executes any tool calls it gets back, and keeps going until the model
//! produces a plain answer (streamed token-by-token) or a budget runs out.
//! Progress is reported through a channel of [`AgentStreamEvent`]s; the
//! gateway bridges that channel to SSE.

pub mod loop_runner;
pub mod prompt;
pub mod stream_event;

pub use loop_runner::AgentLoop;
pub use stream_event::AgentStreamEvent;
