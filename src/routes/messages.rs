use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::{message_db, user_db};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub content: String,
}

async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let sender = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let content = req.content.trim();
    if content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Message content is empty"})),
        )
            .into_response();
    }

    match user_db::get_user_by_id(&state.db, req.receiver_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to look up receiver {}: {}", req.receiver_id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match message_db::insert_message(&state.db, sender.id, req.receiver_id, content).await {
        Ok(message) => (StatusCode::CREATED, Json(message)).into_response(),
        Err(e) => {
            tracing::error!("Failed to insert message: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn inbox(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let user = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match message_db::list_correspondents(&state.db, user.id).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => {
            tracing::error!("Failed to load inbox for user {}: {}", user.id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn conversation(
    State(state): State<AppState>,
    Path(peer_id): Path<i64>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match message_db::get_conversation(&state.db, user.id, peer_id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => {
            tracing::error!("Failed to load conversation: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadRequest {
    pub sender_id: i64,
}

async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<MarkReadRequest>,
) -> impl IntoResponse {
    let user = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match message_db::mark_read(&state.db, user.id, req.sender_id).await {
        Ok(updated) => Json(serde_json::json!({"updated": updated})).into_response(),
        Err(e) => {
            tracing::error!("Failed to mark messages read: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/messages", post(send_message))
        .route("/api/messages/inbox", get(inbox))
        .route("/api/messages/with/{user_id}", get(conversation))
        .route("/api/messages/read", post(mark_read))
}
