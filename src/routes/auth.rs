use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::db::user_db;
use crate::models::user::{self, User};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if !req.email.contains('@') || req.name.trim().is_empty() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if req.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Password must be at least 8 characters"})),
        )
            .into_response();
    }

    let role = req.role.as_deref().unwrap_or("customer");
    if !user::ROLES.contains(&role) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Unknown role"})),
        )
            .into_response();
    }

    match user_db::get_user_by_email(&state.db, &req.email).await {
        Ok(Some(_)) => return StatusCode::CONFLICT.into_response(),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to look up email: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let password_hash = match auth::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Failed to hash password: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let user_id = match user_db::create_user(
        &state.db,
        &req.email,
        &password_hash,
        req.name.trim(),
        role,
        req.phone.as_deref(),
        req.city.as_deref(),
    )
    .await
    {
        Ok(id) => id,
        // A registration that raced past the email pre-check still lands
        // on the UNIQUE constraint.
        Err(e) if e.as_database_error().is_some_and(|d| d.is_unique_violation()) => {
            return StatusCode::CONFLICT.into_response();
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    open_session(&state, user_id).await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let user = match user_db::get_user_by_email(&state.db, &req.email).await {
        Ok(Some(u)) => u,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to look up email: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if !auth::verify_password(&user.password_hash, &req.password) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    open_session(&state, user.id).await
}

async fn open_session(state: &AppState, user_id: i64) -> axum::response::Response {
    let token = auth::new_session_token();
    if let Err(e) = user_db::create_session(&state.db, &token, user_id).await {
        tracing::error!("Failed to create session: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    match user_db::get_user_by_id(&state.db, user_id).await {
        Ok(Some(user)) => Json(AuthResponse { token, user }).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let Some(token) = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    else {
        return StatusCode::UNAUTHORIZED;
    };

    if let Err(e) = user_db::delete_session(&state.db, token).await {
        tracing::error!("Failed to delete session: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    StatusCode::NO_CONTENT
}

async fn me(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => Json(user).into_response(),
        Ok(None) => StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}
