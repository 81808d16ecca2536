//! Audio handlers: transcription uploads, standalone synthesis, retrieval,
//! and the voice catalog.
//!
//! Endpoints:
//! - POST /api/v1/audio/transcriptions - Multipart upload (`audio`, `session_id`)
//! - POST /api/v1/audio/speech         - Synthesize text to a stored artifact
//! - GET  /api/v1/audio/voices         - List voices
//! - GET  /api/v1/audio/{handle}       - Raw `audio/mpeg` bytes

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use desabafa_core::service::conversation::AudioUpload;
use desabafa_types::speech::{SYNTHESIZED_AUDIO_MIME, Voice};

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for standalone synthesis.
#[derive(Debug, Deserialize)]
pub struct SpeechRequestBody {
    pub text: String,
    #[serde(default)]
    pub voice: Option<Voice>,
}

/// POST /api/v1/audio/transcriptions - Transcribe an upload into a user message.
///
/// Accepts the file under either `audio` or `file`.
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let timer = RequestTimer::start();

    let mut session_id = None;
    let mut upload: Option<(Vec<u8>, String, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" | "file" => {
                let file_name = field.file_name().unwrap_or("audio.webm").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read audio: {e}")))?;
                upload = Some((bytes.to_vec(), file_name, content_type));
            }
            "session_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read session_id: {e}")))?;
                session_id = Some(parse_uuid(text.trim())?);
            }
            other => debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let session_id =
        session_id.ok_or_else(|| AppError::Validation("session_id is required".to_string()))?;
    let (bytes, file_name, content_type) =
        upload.ok_or_else(|| AppError::Validation("audio file is required".to_string()))?;

    let message = state
        .conversation_service
        .transcribe(AudioUpload {
            session_id,
            bytes,
            file_name,
            content_type,
        })
        .await?;

    let resp = timer
        .finish(&message)?
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/audio/speech - Synthesize text into a retrievable artifact.
pub async fn synthesize(
    State(state): State<AppState>,
    Json(body): Json<SpeechRequestBody>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();

    let audio = state
        .conversation_service
        .synthesize(&body.text, body.voice)
        .await?;

    let resp = timer.finish(&audio)?.with_link("audio", &audio.url);
    Ok(Json(resp))
}

/// GET /api/v1/audio/{handle} - Stored audio bytes.
pub async fn get_audio(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bytes = state.conversation_service.retrieve_audio(&handle).await?;
    Ok(([(header::CONTENT_TYPE, SYNTHESIZED_AUDIO_MIME)], bytes))
}

/// GET /api/v1/audio/voices - Voice catalog.
pub async fn list_voices(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let voices = state.conversation_service.voices();
    Ok(Json(timer.finish(&voices)?.with_link("self", "/api/v1/audio/voices")))
}
