//! The orchestration state machine for one conversation turn.
//!
//! Control flow per turn:
//! 1. Load the project and the last N persisted messages, prepend the system
//!    prompt, persist the incoming user message.
//! 2. Non-streaming completion with the full tool catalog
//!    (`tool_choice=auto`).
//! 3. Tool calls in the response: persist the assistant message first, then
//!    execute the calls sequentially in response order, emitting
//!    `tool_call`/`tool_result` events and persisting one tool message per
//!    call. Loop back to 2.
//! 4. Plain content: re-issue the request streaming with `tool_choice=none`,
//!    emit `text` events per chunk, persist the concatenated answer, emit
//!    `done`. The second completion on the final turn is the cost of
//!    guaranteeing the streamed answer carries no tool calls.
//!
//! Budgets: at most `max_iterations` completions and `max_tool_calls`
//! executed tools per turn; exceeding either terminates the turn with an
//! `error` event. Already-applied tool results stay persisted.

use std::sync::Arc;

use reelforge_config::{AgentConfig, CompletionConfig};
use reelforge_core::error::{AgentError, Error, ToolError};
use reelforge_core::message::Message;
use reelforge_core::provider::{CompletionProvider, CompletionRequest, ToolChoice};
use reelforge_core::store::StudioStore;
use reelforge_tools::{ExecutionContext, ToolExecutor, ToolKind};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::prompt;
use crate::stream_event::AgentStreamEvent;

pub struct AgentLoop {
    store: Arc<dyn StudioStore>,
    completion: Arc<dyn CompletionProvider>,
    executor: Arc<ToolExecutor>,
    limits: AgentConfig,
    completion_config: CompletionConfig,
}

impl AgentLoop {
    pub fn new(
        store: Arc<dyn StudioStore>,
        completion: Arc<dyn CompletionProvider>,
        executor: Arc<ToolExecutor>,
        limits: AgentConfig,
        completion_config: CompletionConfig,
    ) -> Self {
        Self {
            store,
            completion,
            executor,
            limits,
            completion_config,
        }
    }

    /// Run one turn. All progress and failure reporting goes through
    /// `events`; this method never panics on bad model output.
    pub async fn run(
        &self,
        ctx: ExecutionContext,
        user_text: &str,
        model_override: Option<String>,
        events: mpsc::Sender<AgentStreamEvent>,
    ) {
        if let Err(e) = self.run_turn(&ctx, user_text, model_override, &events).await {
            warn!(project_id = %ctx.project_id, error = %e, "Turn failed");
            // The event carries the underlying message without the
            // bounded-context wrapper prefix.
            let message = match e {
                Error::Agent(inner) => inner.to_string(),
                Error::Provider(inner) => inner.to_string(),
                Error::Store(inner) => inner.to_string(),
                other => other.to_string(),
            };
            let _ = events.send(AgentStreamEvent::Error { message }).await;
        }
    }

    async fn run_turn(
        &self,
        ctx: &ExecutionContext,
        user_text: &str,
        model_override: Option<String>,
        events: &mpsc::Sender<AgentStreamEvent>,
    ) -> Result<(), Error> {
        let project = self
            .store
            .project(&ctx.project_id)
            .await?
            .filter(|p| p.user_id == ctx.user_id)
            .ok_or_else(|| AgentError::ProjectNotFound(ctx.project_id.clone()))?;

        let model = match model_override {
            Some(m) => m,
            None => match self.store.preferred_model(&ctx.user_id).await? {
                Some(m) => m,
                None => self.completion_config.default_model.clone(),
            },
        };

        let mut messages = vec![Message::system(prompt::system_prompt(&project))];
        messages.extend(
            self.store
                .recent_messages(&ctx.project_id, self.limits.context_messages)
                .await?,
        );

        // The user message is persisted before any model call so the log
        // reflects the turn even if the provider fails.
        let user_message = Message::user(user_text);
        self.store
            .append_message(&ctx.project_id, &user_message)
            .await?;
        messages.push(user_message);

        info!(project_id = %ctx.project_id, model = %model, "Starting turn");

        let mut tool_calls_used: u32 = 0;

        for iteration in 0..self.limits.max_iterations {
            debug!(iteration, "Requesting completion");
            let response = self
                .completion
                .complete(CompletionRequest {
                    model: model.clone(),
                    messages: messages.clone(),
                    temperature: self.completion_config.temperature,
                    max_tokens: self.completion_config.max_tokens,
                    tools: ToolKind::definitions(),
                    tool_choice: ToolChoice::Auto,
                    stream: false,
                })
                .await?;

            let assistant = response.message;

            if !assistant.tool_calls.is_empty() {
                // Persist the assistant message with its tool-call list
                // before executing anything, so every tool message has its
                // originating call on record.
                self.store
                    .append_message(&ctx.project_id, &assistant)
                    .await?;
                messages.push(assistant.clone());

                for call in &assistant.tool_calls {
                    if tool_calls_used >= self.limits.max_tool_calls {
                        return Err(AgentError::ToolBudgetExhausted.into());
                    }
                    tool_calls_used += 1;

                    self.send(
                        events,
                        AgentStreamEvent::ToolCall {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            input: display_arguments(&call.arguments),
                        },
                    )
                    .await?;

                    let outcome = match ToolKind::from_name(&call.name) {
                        Some(kind) => self.executor.execute(kind, &call.arguments, ctx).await,
                        None => ToolError::UnknownTool(call.name.clone()).into(),
                    };

                    self.send(
                        events,
                        AgentStreamEvent::ToolResult {
                            id: call.id.clone(),
                            name: call.name.clone(),
                            success: outcome.success,
                            output: outcome.to_json(),
                        },
                    )
                    .await?;

                    let tool_message =
                        Message::tool_result(&call.id, outcome.to_message_content());
                    self.store
                        .append_message(&ctx.project_id, &tool_message)
                        .await?;
                    messages.push(tool_message);
                }
                continue;
            }

            if assistant.content.is_empty() {
                // Neither content nor tool calls; nothing to stream or persist.
                self.send(events, AgentStreamEvent::Done { message_id: None })
                    .await?;
                return Ok(());
            }

            // Final answer: stream it with tool calls disallowed, so the
            // chunks are guaranteed to be plain text.
            let message_id = self.stream_final_answer(ctx, &model, &messages, events).await?;
            self.send(
                events,
                AgentStreamEvent::Done {
                    message_id: Some(message_id),
                },
            )
            .await?;
            return Ok(());
        }

        Err(AgentError::IterationBudgetExhausted.into())
    }

    /// Stream the final answer and persist the concatenated message.
    /// Returns the persisted message id.
    async fn stream_final_answer(
        &self,
        ctx: &ExecutionContext,
        model: &str,
        messages: &[Message],
        events: &mpsc::Sender<AgentStreamEvent>,
    ) -> Result<String, Error> {
        let mut rx = self
            .completion
            .stream(CompletionRequest {
                model: model.to_string(),
                messages: messages.to_vec(),
                temperature: self.completion_config.temperature,
                max_tokens: self.completion_config.max_tokens,
                tools: ToolKind::definitions(),
                tool_choice: ToolChoice::None,
                stream: true,
            })
            .await?;

        let mut full = String::new();
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk?;
            if let Some(content) = chunk.content {
                if !content.is_empty() {
                    full.push_str(&content);
                    self.send(events, AgentStreamEvent::Text { content }).await?;
                }
            }
            if chunk.done {
                break;
            }
        }

        let final_message = Message::assistant(full);
        self.store
            .append_message(&ctx.project_id, &final_message)
            .await?;
        debug!(message_id = %final_message.id, "Final answer persisted");
        Ok(final_message.id)
    }

    async fn send(
        &self,
        events: &mpsc::Sender<AgentStreamEvent>,
        event: AgentStreamEvent,
    ) -> Result<(), Error> {
        events
            .send(event)
            .await
            .map_err(|_| AgentError::ChannelClosed.into())
    }
}

/// Parse the raw argument blob for display in a `tool_call` event. Falls back
/// to the raw string when the blob is not valid JSON; the executor handles
/// the lenient-parse semantics itself.
fn display_arguments(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
