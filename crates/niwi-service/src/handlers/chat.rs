//! Support assistant chat handler.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use niwi_core::{ChatMessage, ChatRole};
use niwi_store::Store;

use crate::chat::{CONTEXT_WINDOW, NIWI_SYSTEM_PROMPT};
use crate::error::ApiError;
use crate::state::AppState;

/// Chat send request.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text.
    pub message: String,
    /// Existing session to continue, or absent to start a new one.
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Chat send response.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    /// Assistant message text.
    pub message: String,
    /// The session this exchange belongs to.
    pub session_id: String,
    /// Whether this exchange started a new session.
    pub is_new_session: bool,
}

/// Send a message to the support assistant and get a response.
///
/// Open to anonymous callers; sessions are keyed by an opaque id the widget
/// generates client-side. The assistant sees the session's recent history
/// as context, and both sides of the exchange are persisted.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    if body.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".into()));
    }

    let chat = state
        .chat
        .as_ref()
        .ok_or_else(|| ApiError::ExternalService("AI service not configured".into()))?;

    let session_id = body
        .session_id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let mut history = state
        .store
        .list_chat_messages(&session_id, CONTEXT_WINDOW)?;
    let is_new_session = history.is_empty();

    let user_message = ChatMessage::new(session_id.clone(), ChatRole::User, body.message);
    state.store.put_chat_message(&user_message)?;

    history.push(user_message);
    if history.len() > CONTEXT_WINDOW {
        history.remove(0);
    }

    let reply = chat
        .complete(NIWI_SYSTEM_PROMPT, &history)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, session_id, "Chat relay failed");
            ApiError::ExternalService("Failed to get assistant response".into())
        })?;

    let assistant_message =
        ChatMessage::new(session_id.clone(), ChatRole::Assistant, reply.clone());
    state.store.put_chat_message(&assistant_message)?;

    Ok(Json(SendMessageResponse {
        message: reply,
        session_id,
        is_new_session,
    }))
}
