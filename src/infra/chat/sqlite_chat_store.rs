// SQLite-backed chat message store.

use crate::core::chat::{ChatError, ChatStore};
use crate::core::moderation::ChatMessageDetail;
use crate::infra::database::ts;
use crate::infra::moderation::sqlite_moderation_store::{message_from_row, MESSAGE_SELECT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

pub struct SqliteChatStore {
    pool: Pool<Sqlite>,
}

impl SqliteChatStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatStore for SqliteChatStore {
    async fn insert_message(
        &self,
        room_id: i64,
        user_id: i64,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ChatMessageDetail, ChatError> {
        let id = sqlx::query(
            r#"
            INSERT INTO chat_messages (room_id, user_id, message_text, was_censored, created_at)
            VALUES (?, ?, ?, 0, ?)
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(text)
        .bind(ts(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| ChatError::StorageError(e.to_string()))?
        .last_insert_rowid();

        let sql = format!("{} WHERE m.id = ?", MESSAGE_SELECT);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;
        Ok(message_from_row(&row))
    }

    async fn censor_message(&self, message_id: i64, replacement: &str) -> Result<(), ChatError> {
        sqlx::query("UPDATE chat_messages SET message_text = ?, was_censored = 1 WHERE id = ?")
            .bind(replacement)
            .bind(message_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;
        Ok(())
    }

    async fn room_messages(
        &self,
        room_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessageDetail>, ChatError> {
        let sql = format!(
            "{} WHERE m.room_id = ? ORDER BY m.created_at DESC, m.id DESC LIMIT ?",
            MESSAGE_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(room_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ChatError::StorageError(e.to_string()))?;

        let mut messages: Vec<ChatMessageDetail> = rows.iter().map(message_from_row).collect();
        messages.reverse();
        Ok(messages)
    }
}
