use sqlx::SqlitePool;

use crate::models::tender::Tender;

#[allow(clippy::too_many_arguments)]
pub async fn insert_tender(
    pool: &SqlitePool,
    owner_id: i64,
    title: &str,
    description: &str,
    category: &str,
    budget: Option<i64>,
    city: Option<&str>,
    deadline: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO tenders (owner_id, title, description, category, budget, city, deadline) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(owner_id)
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(budget)
    .bind(city)
    .bind(deadline)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_tender(pool: &SqlitePool, id: i64) -> Result<Option<Tender>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tenders WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_tenders(
    pool: &SqlitePool,
    category: Option<&str>,
    status: Option<&str>,
) -> Result<Vec<Tender>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM tenders \
         WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR status = ?2) \
         ORDER BY id DESC",
    )
    .bind(category)
    .bind(status)
    .fetch_all(pool)
    .await
}

/// Compare-and-set: the update only lands if the status is still the one
/// the caller read. Returns the number of rows changed; 0 means another
/// writer got there first.
pub async fn update_tender_status(
    pool: &SqlitePool,
    id: i64,
    status: &str,
    expected: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE tenders SET status = ? WHERE id = ? AND status = ?")
        .bind(status)
        .bind(id)
        .bind(expected)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn count_open_tenders(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenders WHERE status = 'open'")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_db;

    async fn seed_owner(pool: &SqlitePool) -> i64 {
        user_db::create_user(pool, "o@example.com", "hash", "Olga", "customer", None, None)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn list_filters_by_category_and_status() {
        let pool = crate::db::test_pool().await;
        let owner = seed_owner(&pool).await;

        let a = insert_tender(&pool, owner, "Roof", "Fix roof", "roofing", None, None, None)
            .await
            .unwrap();
        insert_tender(&pool, owner, "Walls", "Paint walls", "painting", None, None, None)
            .await
            .unwrap();
        update_tender_status(&pool, a, "closed", "open").await.unwrap();

        let roofing = list_tenders(&pool, Some("roofing"), None).await.unwrap();
        assert_eq!(roofing.len(), 1);
        assert_eq!(roofing[0].id, a);

        let open = list_tenders(&pool, None, Some("open")).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].category, "painting");

        assert_eq!(count_open_tenders(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn status_update_requires_the_status_it_read() {
        let pool = crate::db::test_pool().await;
        let owner = seed_owner(&pool).await;
        let id = insert_tender(&pool, owner, "Roof", "Fix roof", "roofing", None, None, None)
            .await
            .unwrap();

        assert_eq!(update_tender_status(&pool, id, "closed", "open").await.unwrap(), 1);

        // A second writer that still believes the tender is open loses.
        assert_eq!(
            update_tender_status(&pool, id, "in_progress", "open").await.unwrap(),
            0
        );
        let tender = get_tender(&pool, id).await.unwrap().unwrap();
        assert_eq!(tender.status, "closed");
    }

    #[tokio::test]
    async fn new_tender_defaults_to_open() {
        let pool = crate::db::test_pool().await;
        let owner = seed_owner(&pool).await;

        let id = insert_tender(&pool, owner, "Roof", "Fix roof", "roofing", Some(50000), None, None)
            .await
            .unwrap();
        let tender = get_tender(&pool, id).await.unwrap().unwrap();
        assert_eq!(tender.status, "open");
        assert_eq!(tender.budget, Some(50000));
    }
}
