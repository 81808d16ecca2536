//! Reply generation handler.
//!
//! POST /api/v1/chat runs the conversation pipeline for one user turn and
//! returns the persisted persona reply, with audio when synthesis was
//! requested and succeeded.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use desabafa_core::service::conversation::ChatCommand;
use desabafa_types::speech::Voice;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for one chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub synthesize: bool,
    #[serde(default)]
    pub voice: Option<Voice>,
    /// Also store the user's turn with the reply. Off by default: clients
    /// normally append it first via `/sessions/{id}/messages` or transcription.
    #[serde(default)]
    pub record_user_message: bool,
}

/// POST /api/v1/chat - Generate the persona's reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let session_id = body.session_id;

    let reply = state
        .conversation_service
        .chat(ChatCommand {
            session_id,
            text: body.message,
            synthesize: body.synthesize,
            voice: body.voice,
            record_user_message: body.record_user_message,
        })
        .await?;

    let mut resp = timer
        .finish(&reply)?
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));
    if let Some(url) = &reply.message.audio_url {
        resp = resp.with_link("audio", url);
    }
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults() {
        let body: ChatRequest = serde_json::from_value(serde_json::json!({
            "session_id": Uuid::now_v7(),
            "message": "Estou ansioso"
        }))
        .unwrap();
        assert!(!body.synthesize);
        assert!(body.voice.is_none());
        assert!(!body.record_user_message);
    }

    #[test]
    fn test_chat_request_voice_parses_lowercase() {
        let body: ChatRequest = serde_json::from_value(serde_json::json!({
            "session_id": Uuid::now_v7(),
            "message": "Oi",
            "synthesize": true,
            "voice": "shimmer",
            "record_user_message": true
        }))
        .unwrap();
        assert_eq!(body.voice, Some(Voice::Shimmer));
        assert!(body.record_user_message);
    }
}
