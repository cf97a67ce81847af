use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub author_id: i64,
    pub subject_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: String,
}
