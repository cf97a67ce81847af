use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub summary_cache: Arc<tokio::sync::RwLock<Option<SummaryCache>>>,
}

pub struct SummaryCache {
    pub data: serde_json::Value,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
