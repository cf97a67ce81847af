use sqlx::SqlitePool;

use crate::models::listing::Listing;

#[allow(clippy::too_many_arguments)]
pub async fn insert_listing(
    pool: &SqlitePool,
    seller_id: i64,
    title: &str,
    description: &str,
    category: &str,
    deal_type: &str,
    price: Option<i64>,
    city: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO listings (seller_id, title, description, category, deal_type, price, city) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(seller_id)
    .bind(title)
    .bind(description)
    .bind(category)
    .bind(deal_type)
    .bind(price)
    .bind(city)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_listing(pool: &SqlitePool, id: i64) -> Result<Option<Listing>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM listings WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_listings(
    pool: &SqlitePool,
    category: Option<&str>,
    deal_type: Option<&str>,
) -> Result<Vec<Listing>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM listings \
         WHERE (?1 IS NULL OR category = ?1) AND (?2 IS NULL OR deal_type = ?2) \
         ORDER BY id DESC",
    )
    .bind(category)
    .bind(deal_type)
    .fetch_all(pool)
    .await
}

pub async fn count_listings(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM listings")
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::user_db;

    #[tokio::test]
    async fn listings_come_back_newest_first() {
        let pool = crate::db::test_pool().await;
        let seller =
            user_db::create_user(&pool, "s@example.com", "hash", "Sergei", "seller", None, None)
                .await
                .unwrap();

        insert_listing(&pool, seller, "Crane", "Tower crane", "equipment", "rent", None, None)
            .await
            .unwrap();
        let newer =
            insert_listing(&pool, seller, "Bricks", "Red bricks", "materials", "sell", Some(12), None)
                .await
                .unwrap();

        let all = list_listings(&pool, None, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer);

        let rentals = list_listings(&pool, None, Some("rent")).await.unwrap();
        assert_eq!(rentals.len(), 1);
        assert_eq!(rentals[0].title, "Crane");
    }
}
