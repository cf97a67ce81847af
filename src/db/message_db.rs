use sqlx::SqlitePool;

use crate::models::message::{Correspondent, Message};

/// Inserts a message and returns it with the store-applied defaults
/// (`is_read = 0`, `created_at = now`).
pub async fn insert_message(
    pool: &SqlitePool,
    sender_id: i64,
    receiver_id: i64,
    content: &str,
) -> Result<Message, sqlx::Error> {
    let result =
        sqlx::query("INSERT INTO messages (sender_id, receiver_id, content) VALUES (?, ?, ?)")
            .bind(sender_id)
            .bind(receiver_id)
            .bind(content)
            .execute(pool)
            .await?;

    sqlx::query_as("SELECT * FROM messages WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(pool)
        .await
}

/// Both directions of a two-party conversation, oldest first.
pub async fn get_conversation(
    pool: &SqlitePool,
    user_id: i64,
    peer_id: i64,
) -> Result<Vec<Message>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM messages \
         WHERE (sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1) \
         ORDER BY id ASC",
    )
    .bind(user_id)
    .bind(peer_id)
    .fetch_all(pool)
    .await
}

/// Marks everything `sender_id` sent to `receiver_id` as read. Only unread
/// rows are touched, so the flag moves false to true and never back.
pub async fn mark_read(
    pool: &SqlitePool,
    receiver_id: i64,
    sender_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE messages SET is_read = 1 \
         WHERE receiver_id = ? AND sender_id = ? AND is_read = 0",
    )
    .bind(receiver_id)
    .bind(sender_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Everyone the user has exchanged messages with, most recent conversation
/// first, with the user's unread count per correspondent.
pub async fn list_correspondents(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<Correspondent>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.id AS user_id, u.name AS name, \
                SUM(CASE WHEN m.receiver_id = ?1 AND m.is_read = 0 THEN 1 ELSE 0 END) AS unread, \
                MAX(m.created_at) AS last_message_at \
         FROM messages m \
         JOIN users u ON u.id = CASE WHEN m.sender_id = ?1 THEN m.receiver_id ELSE m.sender_id END \
         WHERE m.sender_id = ?1 OR m.receiver_id = ?1 \
         GROUP BY u.id, u.name \
         ORDER BY last_message_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
