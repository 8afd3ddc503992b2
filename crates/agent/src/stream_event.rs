//! Events emitted while a turn is running.
//!
//! The ordered event sequence is the only output of a turn: `tool_call` /
//! `tool_result` pairs while the model works, `text` chunks for the final
//! answer, then exactly one terminal `done` or `error`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// A chunk of the final streamed answer.
    Text { content: String },

    /// The model requested a tool call; emitted before execution.
    ToolCall {
        id: String,
        name: String,
        input: serde_json::Value,
    },

    /// The outcome of an executed tool call.
    ToolResult {
        id: String,
        name: String,
        success: bool,
        output: serde_json::Value,
    },

    /// The turn failed; terminal.
    Error { message: String },

    /// The turn completed; terminal. Carries the persisted assistant message
    /// id when a final answer was produced.
    Done { message_id: Option<String> },
}

impl AgentStreamEvent {
    /// The wire name of the variant, used as the SSE event name.
    pub fn event_type(&self) -> &'static str {
        match self {
            AgentStreamEvent::Text { .. } => "text",
            AgentStreamEvent::ToolCall { .. } => "tool_call",
            AgentStreamEvent::ToolResult { .. } => "tool_result",
            AgentStreamEvent::Error { .. } => "error",
            AgentStreamEvent::Done { .. } => "done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_with_snake_case_type() {
        let event = AgentStreamEvent::ToolCall {
            id: "call_1".into(),
            name: "getProjectState".into(),
            input: serde_json::json!({}),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_call");
        assert_eq!(json["name"], "getProjectState");
    }

    #[test]
    fn done_roundtrip() {
        let event = AgentStreamEvent::Done {
            message_id: Some("msg-1".into()),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: AgentStreamEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, AgentStreamEvent::Done { message_id: Some(id) } if id == "msg-1"));
    }

    #[test]
    fn event_type_matches_serde_tag() {
        let events = [
            AgentStreamEvent::Text {
                content: "hi".into(),
            },
            AgentStreamEvent::Error {
                message: "boom".into(),
            },
            AgentStreamEvent::Done { message_id: None },
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], event.event_type());
        }
    }
}
