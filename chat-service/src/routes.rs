//! HTTP API: chat, thread reset, and health endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chat_core::ChatRequest;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::session::SessionManager;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetResponse {
    message: &'static str,
    user_id: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

/// Builds the API router. All endpoints live under `/api`; CORS is
/// permissive so browser front ends can call the service directly.
pub fn build_router(session: Arc<SessionManager>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/thread/:user_id", delete(reset_thread))
        .route("/api/health", get(health))
        .with_state(session)
        .layer(cors)
}

/// `POST /api/chat`: validates the request and forwards it to the session
/// manager. Degraded replies are still 200; errors are carried in-band in the
/// reply text. Only missing/empty fields produce a 400.
async fn chat(
    State(session): State<Arc<SessionManager>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.user_id.is_empty() || request.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "userId and message are required".to_string(),
            }),
        )
            .into_response();
    }

    let reply = session.send_message(&request.user_id, &request.message).await;
    Json(reply).into_response()
}

/// `DELETE /api/thread/{userId}`: drops the user's thread mapping. Always
/// 200, even when the user had no thread.
async fn reset_thread(
    State(session): State<Arc<SessionManager>>,
    Path(user_id): Path<String>,
) -> Json<ResetResponse> {
    session.reset_thread(&user_id).await;
    Json(ResetResponse {
        message: "Thread reset successfully",
        user_id,
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        service: "chat-service",
    })
}
