use serde::{Deserialize, Serialize};

pub const DEAL_TYPES: &[&str] = &["sell", "rent", "buy"];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub deal_type: String,
    pub price: Option<i64>,
    pub city: Option<String>,
    pub created_at: String,
}
