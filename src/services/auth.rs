use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::http::HeaderMap;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::user_db;
use crate::models::user::User;

pub fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!("Failed to parse stored password hash: {}", err);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolves the request's bearer token to its user. `Ok(None)` means the
/// token is missing, malformed, or matches no session; a store failure is
/// an error, not an anonymous request.
pub async fn authenticate(
    pool: &SqlitePool,
    headers: &HeaderMap,
) -> Result<Option<User>, sqlx::Error> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };
    user_db::get_user_by_session(pool, token).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("kreml-2024").unwrap();
        assert_ne!(hash, "kreml-2024");
        assert!(verify_password(&hash, "kreml-2024"));
        assert!(!verify_password(&hash, "kremlin-2024"));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("not-a-phc-string", "anything"));
    }

    #[tokio::test]
    async fn authenticate_requires_a_valid_session() {
        let pool = crate::db::test_pool().await;
        let id = user_db::create_user(&pool, "a@example.com", "h", "Anna", "customer", None, None)
            .await
            .unwrap();
        user_db::create_session(&pool, "tok-1", id).await.unwrap();

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer tok-1".parse().unwrap());
        assert_eq!(authenticate(&pool, &headers).await.unwrap().unwrap().id, id);

        let mut bad = HeaderMap::new();
        bad.insert("authorization", "Bearer nope".parse().unwrap());
        assert!(authenticate(&pool, &bad).await.unwrap().is_none());
        assert!(authenticate(&pool, &HeaderMap::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_failure_is_an_error_not_an_anonymous_request() {
        let pool = crate::db::test_pool().await;
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer tok-1".parse().unwrap());

        pool.close().await;

        assert!(authenticate(&pool, &headers).await.is_err());
    }
}
