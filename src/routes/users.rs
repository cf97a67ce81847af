use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::db::{review_db, user_db};
use crate::models::user::Profile;
use crate::services::auth;
use crate::state::AppState;

async fn get_profile(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let user = match user_db::get_user_by_id(&state.db, id).await {
        Ok(Some(u)) => u,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load user {}: {}", id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let (rating, review_count) = match review_db::rating_summary(&state.db, id).await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Failed to load rating for user {}: {}", id, e);
            (None, 0)
        }
    };

    Json(Profile {
        id: user.id,
        name: user.name,
        role: user.role,
        city: user.city,
        created_at: user.created_at,
        rating,
        review_count,
    })
    .into_response()
}

async fn get_reviews(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match review_db::list_reviews(&state.db, id).await {
        Ok(reviews) => Json(reviews).into_response(),
        Err(e) => {
            tracing::error!("Failed to load reviews for user {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReviewRequest {
    pub rating: i64,
    pub comment: Option<String>,
}

async fn post_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<PostReviewRequest>,
) -> impl IntoResponse {
    let author = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if author.id == id {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Cannot review yourself"})),
        )
            .into_response();
    }
    if !(1..=5).contains(&req.rating) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Rating must be between 1 and 5"})),
        )
            .into_response();
    }

    match user_db::get_user_by_id(&state.db, id).await {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load user {}: {}", id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match review_db::get_review(&state.db, author.id, id).await {
        Ok(Some(_)) => return StatusCode::CONFLICT.into_response(),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to look up existing review: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    match review_db::insert_review(&state.db, author.id, id, req.rating, req.comment.as_deref())
        .await
    {
        Ok(review_id) => (
            StatusCode::CREATED,
            Json(serde_json::json!({"id": review_id})),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to insert review: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users/{id}", get(get_profile))
        .route("/api/users/{id}/reviews", get(get_reviews).post(post_review))
}
