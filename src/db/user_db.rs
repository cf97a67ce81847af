use sqlx::SqlitePool;

use crate::models::user::User;

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    name: &str,
    role: &str,
    phone: Option<&str>,
    city: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (email, password_hash, name, role, phone, city) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(email)
    .bind(password_hash)
    .bind(name)
    .bind(role)
    .bind(phone)
    .bind(city)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn count_users(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

// --- Sessions ---

pub async fn create_session(
    pool: &SqlitePool,
    token: &str,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES (?, ?)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_user_by_session(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.* FROM users u \
         JOIN sessions s ON s.user_id = u.id \
         WHERE s.token = ?",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_resolves_back_to_its_user() {
        let pool = crate::db::test_pool().await;
        let id = create_user(&pool, "p@example.com", "hash", "Pavel", "contractor", None, None)
            .await
            .unwrap();

        create_session(&pool, "tok-1", id).await.unwrap();

        let user = get_user_by_session(&pool, "tok-1").await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, "contractor");

        delete_session(&pool, "tok-1").await.unwrap();
        assert!(get_user_by_session(&pool, "tok-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = crate::db::test_pool().await;
        create_user(&pool, "p@example.com", "hash", "Pavel", "customer", None, None)
            .await
            .unwrap();

        let err = create_user(&pool, "p@example.com", "hash", "Other", "customer", None, None)
            .await
            .unwrap_err();
        assert!(err
            .as_database_error()
            .is_some_and(|d| d.is_unique_violation()));
    }
}
