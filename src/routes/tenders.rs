use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;

use crate::db::tender_db;
use crate::models::tender::{can_transition, Tender};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub status: Option<String>,
}

async fn list_tenders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match tender_db::list_tenders(
        &state.db,
        query.category.as_deref(),
        query.status.as_deref(),
    )
    .await
    {
        Ok(tenders) => Json(tenders).into_response(),
        Err(e) => {
            tracing::error!("Failed to list tenders: {}", e);
            Json(Vec::<Tender>::new()).into_response()
        }
    }
}

async fn get_tender(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match tender_db::get_tender(&state.db, id).await {
        Ok(Some(tender)) => Json(tender).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load tender {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenderRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: Option<i64>,
    pub city: Option<String>,
    pub deadline: Option<String>,
}

async fn create_tender(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateTenderRequest>,
) -> impl IntoResponse {
    let owner = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if req.title.trim().is_empty()
        || req.description.trim().is_empty()
        || req.category.trim().is_empty()
    {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let id = match tender_db::insert_tender(
        &state.db,
        owner.id,
        req.title.trim(),
        req.description.trim(),
        req.category.trim(),
        req.budget,
        req.city.as_deref(),
        req.deadline.as_deref(),
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to create tender: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match tender_db::get_tender(&state.db, id).await {
        Ok(Some(tender)) => (StatusCode::CREATED, Json(tender)).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    let user = match auth::authenticate(&state.db, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(e) => {
            tracing::error!("Failed to authenticate request: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let tender = match tender_db::get_tender(&state.db, id).await {
        Ok(Some(t)) => t,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load tender {}: {}", id, e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    if tender.owner_id != user.id {
        return StatusCode::FORBIDDEN.into_response();
    }

    // Lifecycle only moves forward.
    if !can_transition(&tender.status, &req.status) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid status transition"})),
        )
            .into_response();
    }

    // Compare-and-set against the status we read; a concurrent update in
    // between means zero rows and the client should retry.
    match tender_db::update_tender_status(&state.db, id, &req.status, &tender.status).await {
        Ok(0) => StatusCode::CONFLICT.into_response(),
        Ok(_) => StatusCode::OK.into_response(),
        Err(e) => {
            tracing::error!("Failed to update tender {} status: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/tenders", get(list_tenders).post(create_tender))
        .route("/api/tenders/{id}", get(get_tender))
        .route("/api/tenders/{id}/status", post(update_status))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::user_db;

    async fn test_state() -> AppState {
        AppState {
            db: crate::db::test_pool().await,
            config: crate::config::Config::from_env(),
            summary_cache: Arc::new(tokio::sync::RwLock::new(None)),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", format!("Bearer {token}").parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn status_never_moves_backwards_or_repeats() {
        let state = test_state().await;
        let owner =
            user_db::create_user(&state.db, "o@example.com", "h", "Olga", "customer", None, None)
                .await
                .unwrap();
        user_db::create_session(&state.db, "tok-1", owner).await.unwrap();
        let id = crate::db::tender_db::insert_tender(
            &state.db, owner, "Roof", "Fix roof", "roofing", None, None, None,
        )
        .await
        .unwrap();

        let forward = update_status(
            State(state.clone()),
            Path(id),
            bearer("tok-1"),
            Json(UpdateStatusRequest { status: "closed".into() }),
        )
        .await
        .into_response();
        assert_eq!(forward.status(), StatusCode::OK);

        let backward = update_status(
            State(state.clone()),
            Path(id),
            bearer("tok-1"),
            Json(UpdateStatusRequest { status: "open".into() }),
        )
        .await
        .into_response();
        assert_eq!(backward.status(), StatusCode::BAD_REQUEST);

        let repeat = update_status(
            State(state.clone()),
            Path(id),
            bearer("tok-1"),
            Json(UpdateStatusRequest { status: "closed".into() }),
        )
        .await
        .into_response();
        assert_eq!(repeat.status(), StatusCode::BAD_REQUEST);

        let tender = crate::db::tender_db::get_tender(&state.db, id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tender.status, "closed");
    }

    #[tokio::test]
    async fn only_the_owner_moves_the_status() {
        let state = test_state().await;
        let owner =
            user_db::create_user(&state.db, "o@example.com", "h", "Olga", "customer", None, None)
                .await
                .unwrap();
        let other =
            user_db::create_user(&state.db, "x@example.com", "h", "Xenia", "customer", None, None)
                .await
                .unwrap();
        user_db::create_session(&state.db, "tok-2", other).await.unwrap();
        let id = crate::db::tender_db::insert_tender(
            &state.db, owner, "Roof", "Fix roof", "roofing", None, None, None,
        )
        .await
        .unwrap();

        let response = update_status(
            State(state.clone()),
            Path(id),
            bearer("tok-2"),
            Json(UpdateStatusRequest { status: "closed".into() }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
