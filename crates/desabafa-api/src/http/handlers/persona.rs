//! GET /api/v1/personas - Persona catalog.

use axum::Json;
use axum::extract::State;
use serde_json::Value;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

pub async fn list_personas(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let personas = state.conversation_service.personas();
    Ok(Json(timer.finish(&personas)?.with_link("self", "/api/v1/personas")))
}
