//! HTTP request handlers

use super::types::{
    ChatRequest, CurrentMoodResponse, ErrorResponse, MoodCatalogResponse, MoodOptionInfo,
    MoodRequest, ReplyResponse,
};
use super::AppState;
use crate::controller::MOOD_CATALOG;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

const MOOD_FAILURE: &str = "Could not process mood";
const CHAT_FAILURE: &str = "Something went wrong";

/// Create the API router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Mood declaration; GET exposes the current slot
        .route("/api/mood", get(current_mood).post(declare_mood))
        .route("/api/chat", post(chat))
        .route("/api/moods", get(list_moods))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Relay operations
// ============================================================

async fn declare_mood(
    State(state): State<AppState>,
    body: Result<Json<MoodRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = state.relay.declare_mood(&req.mood).await.map_err(|e| {
        tracing::error!(error = %e, "Mood error");
        AppError::Internal(MOOD_FAILURE.to_string())
    })?;

    Ok(Json(ReplyResponse { reply }))
}

async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ReplyResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = state.relay.converse(&req.message).await.map_err(|e| {
        tracing::error!(error = %e, "Chat error");
        AppError::Internal(CHAT_FAILURE.to_string())
    })?;

    Ok(Json(ReplyResponse { reply }))
}

// ============================================================
// Introspection
// ============================================================

async fn current_mood(State(state): State<AppState>) -> Json<CurrentMoodResponse> {
    Json(CurrentMoodResponse {
        mood: state.relay.session().mood().await,
    })
}

async fn list_moods() -> Json<MoodCatalogResponse> {
    Json(MoodCatalogResponse {
        moods: MOOD_CATALOG
            .iter()
            .map(|m| MoodOptionInfo {
                label: m.label,
                emoji: m.emoji,
            })
            .collect(),
    })
}

async fn get_version() -> impl IntoResponse {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
