//! Chat message types for the support assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The end user.
    User,
    /// The AI assistant.
    Assistant,
}

/// One message in a chat session.
///
/// Messages are persisted so the assistant can be given recent context on
/// the next turn. Sessions are identified by an opaque string the widget
/// generates client-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The owning chat session.
    pub session_id: String,

    /// Message author.
    pub role: ChatRole,

    /// Message text.
    pub content: String,

    /// When the message was sent.
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(session_id: String, role: ChatRole, content: String) -> Self {
        Self {
            session_id,
            role,
            content,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serde_names() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        let parsed: ChatRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, ChatRole::User);
    }
}
