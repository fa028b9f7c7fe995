use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages sent to the backend, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for a visualization payload.
    VisualizationRequest {
        request: String,
        #[serde(default)]
        context: Option<Value>,
    },
    /// Free-form chat with the tutor.
    UserMessage {
        text: String,
        #[serde(default)]
        code_context: Option<Value>,
    },
    /// Ask the backend to resend the watched-file context.
    RequestContext,
}

impl ClientMessage {
    pub fn visualization(request: impl Into<String>) -> Self {
        Self::VisualizationRequest {
            request: request.into(),
            context: None,
        }
    }
}

/// Messages received from the backend, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A payload ready to load into a session.
    VisualizationResponse { data: Value },
    LlmMessage { text: String },
    /// Progress notice such as `generating_visualization` or `thinking`.
    Status { message: String },
    Error { message: String },
    ContextSync {
        #[serde(default)]
        files: Vec<String>,
        #[serde(default)]
        context: Value,
    },
    /// A watched file changed.
    ContextUpdate {
        filename: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        timestamp: Option<String>,
    },
}

impl ServerMessage {
    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VisualizationResponse { .. } => "visualization_response",
            Self::LlmMessage { .. } => "llm_message",
            Self::Status { .. } => "status",
            Self::Error { .. } => "error",
            Self::ContextSync { .. } => "context_sync",
            Self::ContextUpdate { .. } => "context_update",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/protocol.rs"]
mod tests;
