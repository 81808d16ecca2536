//! Session HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/sessions                - Open a session (quota-gated)
//! - GET  /api/v1/sessions/{id}           - Session plus full transcript
//! - POST /api/v1/sessions/{id}/messages  - Append a manual message
//! - POST /api/v1/sessions/{id}/end       - Close a session
//! - POST /api/v1/sessions/{id}/summary   - Generate and store a summary

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use desabafa_core::service::session::NewSession;
use desabafa_types::chat::Sender;

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for opening a session.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: Uuid,
    /// Free-form category label, e.g. "ansiedade".
    #[serde(default)]
    pub session_type: String,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
}

/// Request body for a manual append.
#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub tokens_used: u32,
}

/// POST /api/v1/sessions - Open a session.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let timer = RequestTimer::start();

    let session = state
        .session_service
        .create_session(NewSession {
            user_id: body.user_id,
            session_type: body.session_type,
            persona: body.persona,
            is_premium: body.is_premium,
        })
        .await?;

    let resp = timer
        .finish(&session)?
        .with_link("self", &format!("/api/v1/sessions/{}", session.id))
        .with_link("chat", "/api/v1/chat");
    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/sessions/{id} - Session with messages, oldest first.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&session_id)?;

    let transcript = state.session_service.get_transcript(&id).await?;

    let resp = timer
        .finish(&transcript)?
        .with_link("self", &format!("/api/v1/sessions/{id}"))
        .with_link("user", &format!("/api/v1/users/{}/status", transcript.session.user_id));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/messages - Append a manual or system message.
pub async fn append_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&session_id)?;

    let message = state
        .session_service
        .append_message(&id, body.sender, &body.content, body.tokens_used)
        .await?;

    let resp = timer
        .finish(&message)?
        .with_link("session", &format!("/api/v1/sessions/{id}"));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/sessions/{id}/end - Close a session. Idempotent.
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&session_id)?;

    let session = state.session_service.end_session(&id).await?;

    let resp = timer
        .finish(&session)?
        .with_link("self", &format!("/api/v1/sessions/{id}"));
    Ok(Json(resp))
}

/// POST /api/v1/sessions/{id}/summary - Summarize and overwrite the stored summary.
pub async fn summarize_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&session_id)?;

    let summary = state.conversation_service.summarize(&id).await?;

    let resp = timer
        .finish(&summary)?
        .with_link("session", &format!("/api/v1/sessions/{id}"));
    Ok(Json(resp))
}
