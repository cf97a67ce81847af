use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;

use crate::db::listing_db;
use crate::models::listing::{Listing, DEAL_TYPES};
use crate::services::auth;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub category: Option<String>,
    pub deal_type: Option<String>,
}

async fn list_market(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    match listing_db::list_listings(
        &state.db,
        query.category.as_deref(),
        query.deal_type.as_deref(),
    )
    .await
    {
        Ok(listings) => Json(listings).into_response(),
        Err(e) => {
            tracing::error!("Failed to list market items: {}", e);
            Json(Vec::<Listing>::new()).into_response()
        }
    }
}

async fn get_market_item(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match listing_db::get_listing(&state.db, id).await {
        Ok(Some(listing)) => Json(listing).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            tracing::error!("Failed to load listing {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub category: String,
    pub deal_type: Option<String>,
    pub price: Option<i64>,
    pub city: Option<String>,
}

async fn create_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateListingRequest>,
) -> impl IntoResponse {
    let seller = match auth::authenticate(&state.db, &headers).await {
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

    let deal_type = req.deal_type.as_deref().unwrap_or("sell");
    if !DEAL_TYPES.contains(&deal_type) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Unknown deal type"})),
        )
            .into_response();
    }

    let id = match listing_db::insert_listing(
        &state.db,
        seller.id,
        req.title.trim(),
        req.description.trim(),
        req.category.trim(),
        deal_type,
        req.price,
        req.city.as_deref(),
    )
    .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to create listing: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match listing_db::get_listing(&state.db, id).await {
        Ok(Some(listing)) => (StatusCode::CREATED, Json(listing)).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/market", get(list_market).post(create_listing))
        .route("/api/market/{id}", get(get_market_item))
}
