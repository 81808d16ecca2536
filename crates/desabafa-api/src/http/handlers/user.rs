//! Account handlers: anonymous identities, registration, login, and the
//! read-only status/stats projections.
//!
//! Endpoints:
//! - POST /api/v1/users/anonymous          - Create an anonymous user
//! - POST /api/v1/auth/register            - Register with email + password
//! - POST /api/v1/auth/login               - Authenticate
//! - GET  /api/v1/users/{id}/status        - Quota and subscription state
//! - GET  /api/v1/users/{id}/stats         - Usage counters
//! - PUT  /api/v1/users/{id}/subscription  - Change plan
//! - GET  /api/v1/users/{id}/sessions      - List sessions, newest first

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use desabafa_types::user::SubscriptionUpdate;

use super::parse_uuid;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// Request body for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/v1/users/anonymous - Create an anonymous user.
pub async fn create_anonymous(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let timer = RequestTimer::start();

    let user = state.account_service.create_anonymous().await?;

    let resp = timer
        .finish(&user)?
        .with_link("status", &format!("/api/v1/users/{}/status", user.id))
        .with_link("sessions", &format!("/api/v1/users/{}/sessions", user.id));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/register - Register a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), AppError> {
    let timer = RequestTimer::start();

    let user = state
        .account_service
        .register(&body.email, &body.password)
        .await?;

    let resp = timer
        .finish(&user)?
        .with_link("status", &format!("/api/v1/users/{}/status", user.id));
    Ok((StatusCode::CREATED, Json(resp)))
}

/// POST /api/v1/auth/login - Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();

    let user = state
        .account_service
        .authenticate(&body.email, &body.password)
        .await?;

    let resp = timer
        .finish(&user)?
        .with_link("status", &format!("/api/v1/users/{}/status", user.id));
    Ok(Json(resp))
}

/// GET /api/v1/users/{id}/status - Quota and subscription projection.
pub async fn get_status(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&user_id)?;

    let status = state.account_service.status(&id).await?;

    let resp = timer
        .finish(&status)?
        .with_link("self", &format!("/api/v1/users/{id}/status"));
    Ok(Json(resp))
}

/// GET /api/v1/users/{id}/stats - Usage counters.
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&user_id)?;

    let stats = state.account_service.stats(&id).await?;

    let resp = timer
        .finish(&stats)?
        .with_link("self", &format!("/api/v1/users/{id}/stats"));
    Ok(Json(resp))
}

/// PUT /api/v1/users/{id}/subscription - Update plan, active flag, and expiry.
pub async fn update_subscription(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<SubscriptionUpdate>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&user_id)?;

    let user = state.account_service.update_subscription(&id, body).await?;

    let resp = timer
        .finish(&user)?
        .with_link("status", &format!("/api/v1/users/{id}/status"));
    Ok(Json(resp))
}

/// GET /api/v1/users/{id}/sessions - List a user's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&user_id)?;

    let sessions = state.session_service.list_sessions(&id).await?;

    let resp = timer
        .finish(&sessions)?
        .with_link("self", &format!("/api/v1/users/{id}/sessions"));
    Ok(Json(resp))
}
