//! OpenAI-compatible chat completion wire types.

use serde::{Deserialize, Serialize};

/// One message of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionMessage {
    /// Message role: "system", "user", or "assistant".
    pub role: &'static str,
    /// Message text.
    pub content: String,
}

/// Chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model name.
    pub model: String,
    /// Conversation so far, system prompt first.
    pub messages: Vec<CompletionMessage>,
}

/// Chat completion response body.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    /// Completion choices; the first is used.
    pub choices: Vec<CompletionChoice>,
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    /// The generated message.
    pub message: CompletionResponseMessage,
}

/// The generated message of a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponseMessage {
    /// Message text.
    #[serde(default)]
    pub content: Option<String>,
}

/// Chat API error response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatErrorResponse {
    /// The error payload.
    pub error: ChatErrorBody,
}

/// Chat API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatErrorBody {
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Error type.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
