use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use sqlx::SqlitePool;

use crate::db::{listing_db, tender_db, user_db};
use crate::state::AppState;

async fn health_check() -> &'static str {
    "Healthy"
}

async fn load_summary(pool: &SqlitePool) -> Result<serde_json::Value, sqlx::Error> {
    let open_tenders = tender_db::count_open_tenders(pool).await?;
    let listings = listing_db::count_listings(pool).await?;
    let users = user_db::count_users(pool).await?;

    Ok(serde_json::json!({
        "openTenders": open_tenders,
        "listings": listings,
        "users": users,
    }))
}

async fn summary(State(state): State<AppState>) -> impl IntoResponse {
    {
        let cache = state.summary_cache.read().await;
        if let Some(ref c) = *cache {
            if chrono::Utc::now() < c.expires_at {
                return Json(c.data.clone()).into_response();
            }
        }
    }

    match load_summary(&state.db).await {
        Ok(data) => {
            let mut cache = state.summary_cache.write().await;
            *cache = Some(crate::state::SummaryCache {
                data: data.clone(),
                expires_at: chrono::Utc::now()
                    + chrono::Duration::minutes(state.config.summary_cache_minutes),
            });
            Json(data).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to load summary: {}", e);
            Json(serde_json::json!({})).into_response()
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/test", get(health_check))
        .route("/api/summary", get(summary))
}
