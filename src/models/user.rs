use serde::Serialize;

pub const ROLES: &[&str] = &["customer", "contractor", "seller"];

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub created_at: String,
}

/// Public view of a user, with the rating aggregated from reviews.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub city: Option<String>,
    pub created_at: String,
    pub rating: Option<f64>,
    pub review_count: i64,
}
