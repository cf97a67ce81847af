use sqlx::SqlitePool;

use crate::models::review::Review;

pub async fn insert_review(
    pool: &SqlitePool,
    author_id: i64,
    subject_id: i64,
    rating: i64,
    comment: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO reviews (author_id, subject_id, rating, comment) VALUES (?, ?, ?, ?)",
    )
    .bind(author_id)
    .bind(subject_id)
    .bind(rating)
    .bind(comment)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_review(
    pool: &SqlitePool,
    author_id: i64,
    subject_id: i64,
) -> Result<Option<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE author_id = ? AND subject_id = ?")
        .bind(author_id)
        .bind(subject_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_reviews(
    pool: &SqlitePool,
    subject_id: i64,
) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM reviews WHERE subject_id = ? ORDER BY id DESC")
        .bind(subject_id)
        .fetch_all(pool)
        .await
}

/// Average rating and review count for a user. Average is None when the
/// user has no reviews yet.
pub async fn rating_summary(
    pool: &SqlitePool,
    subject_id: i64,
) -> Result<(Option<f64>, i64), sqlx::Error> {
    sqlx::query_as("SELECT AVG(rating), COUNT(*) FROM reviews WHERE subject_id = ?")
        .bind(subject_id)
        .fetch_one(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_db;

    async fn seed_users(pool: &SqlitePool) -> (i64, i64) {
        let a = user_db::create_user(pool, "a@example.com", "hash", "Anna", "customer", None, None)
            .await
            .unwrap();
        let b =
            user_db::create_user(pool, "b@example.com", "hash", "Boris", "contractor", None, None)
                .await
                .unwrap();
        (a, b)
    }

    #[tokio::test]
    async fn rating_averages_over_all_reviews() {
        let pool = crate::db::test_pool().await;
        let (a, b) = seed_users(&pool).await;
        let c = user_db::create_user(&pool, "c@example.com", "hash", "Vera", "customer", None, None)
            .await
            .unwrap();

        insert_review(&pool, a, b, 5, Some("отлично")).await.unwrap();
        insert_review(&pool, c, b, 4, None).await.unwrap();

        let (avg, count) = rating_summary(&pool, b).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(avg, Some(4.5));

        let (avg, count) = rating_summary(&pool, a).await.unwrap();
        assert_eq!(count, 0);
        assert_eq!(avg, None);
    }

    #[tokio::test]
    async fn one_review_per_author_and_subject() {
        let pool = crate::db::test_pool().await;
        let (a, b) = seed_users(&pool).await;

        insert_review(&pool, a, b, 5, None).await.unwrap();
        assert!(insert_review(&pool, a, b, 1, None).await.is_err());
        assert!(get_review(&pool, a, b).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rating_outside_range_is_rejected() {
        let pool = crate::db::test_pool().await;
        let (a, b) = seed_users(&pool).await;

        assert!(insert_review(&pool, a, b, 0, None).await.is_err());
        assert!(insert_review(&pool, a, b, 6, None).await.is_err());
    }
}
