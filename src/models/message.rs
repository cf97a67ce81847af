use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: String,
}

/// One inbox row: the other party of a conversation plus unread count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Correspondent {
    pub user_id: i64,
    pub name: String,
    pub unread: i64,
    pub last_message_at: String,
}
