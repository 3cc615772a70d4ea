//! `OpenAI` wire format types

use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

// -- Chat completion request --

/// Chat completion request body sent upstream
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages, already trimmed to the character budget
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature, omitted entirely when not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Whether to stream the response
    pub stream: bool,
}

// -- Chat completion response --

/// Non-streaming chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated choices
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, empty when upstream returned none
    pub fn first_text(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }
}

/// Choice within a completion response
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    /// Generated message
    pub message: CompletionMessage,
    /// Why generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message within a response choice
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    /// Role (always "assistant")
    pub role: String,
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
}

// -- Streaming types --

/// Incremental chunk of a streamed completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    /// Delta choices
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

impl ChatCompletionChunk {
    /// Text delta of the first choice, empty when the chunk carries none
    pub fn first_delta(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.delta.content.clone())
            .unwrap_or_default()
    }
}

/// Choice within a streaming chunk
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkChoice {
    /// Incremental delta
    pub delta: ChunkDelta,
    /// Finish reason, present on the final chunk
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Delta content within a streaming choice
#[derive(Debug, Clone, Deserialize)]
pub struct ChunkDelta {
    /// Incremental text content
    #[serde(default)]
    pub content: Option<String>,
}

// -- Assistants --

/// Assistants list response
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantList {
    /// Assistant objects
    #[serde(default)]
    pub data: Vec<Assistant>,
}

/// An upstream assistant object, passed through to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    /// Assistant identifier
    pub id: String,
    /// Object type (always "assistant")
    pub object: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: i64,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Default model
    #[serde(default)]
    pub model: Option<String>,
    /// System instructions
    #[serde(default)]
    pub instructions: Option<String>,
}
