use serde::{Deserialize, Deserializer, Serialize};

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
}

/// Message in a conversation, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: Role,
    /// Message content
    pub content: String,
}

/// Body of an incoming `POST /chat` request
///
/// `stream` and `temperature` deserialize leniently: a non-boolean `stream`
/// falls back to `false` and a non-numeric `temperature` is treated as
/// absent, so neither malformed field fails the whole request.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    /// Model identifier; the configured default applies when absent
    #[serde(default)]
    pub model: Option<String>,
    /// Whether to stream the response
    #[serde(default, deserialize_with = "bool_or_false")]
    pub stream: bool,
    /// Sampling temperature, forwarded upstream only when numeric
    #[serde(default, deserialize_with = "number_or_none")]
    pub temperature: Option<f64>,
}

fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
