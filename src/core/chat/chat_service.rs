// Chat module - posting and reading room messages.
//
// Posting is gated by the moderation service: restricted accounts are turned
// away before anything is stored, and every stored message goes through the
// automatic flag check.

use crate::core::moderation::{
    AutoFlagResult, ChatMessageDetail, ModerationError, ModerationService, ModerationStore,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

pub const MAX_MESSAGE_CHARS: usize = 500;
pub const CENSORED_TEXT: &str = "[message removed by moderation]";

const DEFAULT_ROOM_LIMIT: i64 = 100;
const MAX_ROOM_LIMIT: i64 = 500;

// ============================================================================
// DOMAIN MODELS
// ============================================================================

/// A stored message plus what the automatic check decided about it.
#[derive(Debug, Clone, Serialize)]
pub struct PostedMessage {
    pub message: ChatMessageDetail,
    pub moderation: AutoFlagResult,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("{0}")]
    InvalidMessage(String),

    #[error(transparent)]
    Moderation(#[from] ModerationError),
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn insert_message(
        &self,
        room_id: i64,
        user_id: i64,
        text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ChatMessageDetail, ChatError>;

    /// Replace a message's text and mark it as censored.
    async fn censor_message(&self, message_id: i64, replacement: &str) -> Result<(), ChatError>;

    /// The latest `limit` messages of a room, oldest first.
    async fn room_messages(
        &self,
        room_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessageDetail>, ChatError>;
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct ChatService<C: ChatStore, M: ModerationStore> {
    store: C,
    moderation: Arc<ModerationService<M>>,
}

impl<C: ChatStore, M: ModerationStore> ChatService<C, M> {
    pub fn new(store: C, moderation: Arc<ModerationService<M>>) -> Self {
        Self { store, moderation }
    }

    pub async fn post_message(
        &self,
        room_id: i64,
        user_id: i64,
        text: &str,
    ) -> Result<PostedMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::InvalidMessage(
                "Message must not be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ChatError::InvalidMessage(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        self.moderation.ensure_can_post(user_id).await?;

        let mut message = self
            .store
            .insert_message(room_id, user_id, text, Utc::now())
            .await?;
        let check = self.moderation.auto_flag_check(message.id, text).await?;

        if check.should_delete {
            self.store.censor_message(message.id, CENSORED_TEXT).await?;
            message.message_text = CENSORED_TEXT.to_string();
            message.was_censored = true;
            tracing::info!(message_id = message.id, room_id, user_id, "Message censored on post");
        }

        Ok(PostedMessage {
            message,
            moderation: check,
        })
    }

    pub async fn room_messages(
        &self,
        room_id: i64,
        limit: Option<i64>,
    ) -> Result<Vec<ChatMessageDetail>, ChatError> {
        let limit = limit.unwrap_or(DEFAULT_ROOM_LIMIT).clamp(1, MAX_ROOM_LIMIT);
        self.store.room_messages(room_id, limit).await
    }

    /// Report a message for review.
    pub async fn report_message(
        &self,
        message_id: i64,
        reporter_id: i64,
        reason: Option<&str>,
    ) -> Result<i64, ChatError> {
        Ok(self
            .moderation
            .flag_message(message_id, reporter_id, reason)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::moderation::{
        AccountStatus, ActionType, ModerationAction, ModerationConfig, Severity,
    };
    use crate::infra::chat::SqliteChatStore;
    use crate::infra::database::fixtures::insert_user;
    use crate::infra::database::memory_pool;
    use crate::infra::moderation::SqliteModerationStore;
    use sqlx::SqlitePool;

    type TestChat = ChatService<SqliteChatStore, SqliteModerationStore>;

    async fn setup() -> (TestChat, Arc<ModerationService<SqliteModerationStore>>, SqlitePool) {
        let pool = memory_pool().await;
        let moderation = Arc::new(ModerationService::new(
            SqliteModerationStore::new(pool.clone()),
            ModerationConfig::default(),
        ));
        let chat = ChatService::new(SqliteChatStore::new(pool.clone()), Arc::clone(&moderation));
        (chat, moderation, pool)
    }

    #[tokio::test]
    async fn test_post_and_read_room() {
        let (chat, _, pool) = setup().await;
        let fan = insert_user(&pool, "Owl.Fan@example.com", None, "fan").await;

        chat.post_message(8, fan, "  Let's go Owls!  ").await.unwrap();
        chat.post_message(8, fan, "Defense!").await.unwrap();
        chat.post_message(9, fan, "wrong room").await.unwrap();

        let messages = chat.room_messages(8, None).await.unwrap();
        let texts: Vec<_> = messages.iter().map(|m| m.message_text.as_str()).collect();
        assert_eq!(texts, vec!["Let's go Owls!", "Defense!"]);
        assert_eq!(messages[0].user_name, "owl.fan");

        let latest = chat.room_messages(8, Some(1)).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].message_text, "Defense!");
    }

    #[tokio::test]
    async fn test_message_length_limits() {
        let (chat, _, pool) = setup().await;
        let fan = insert_user(&pool, "fan@example.com", None, "fan").await;

        assert!(matches!(
            chat.post_message(1, fan, "   ").await,
            Err(ChatError::InvalidMessage(_))
        ));
        let long = "a".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(matches!(
            chat.post_message(1, fan, &long).await,
            Err(ChatError::InvalidMessage(_))
        ));
        let exact = "a".repeat(MAX_MESSAGE_CHARS);
        assert!(chat.post_message(1, fan, &exact).await.is_ok());
    }

    #[tokio::test]
    async fn test_auto_delete_filter_censors_message() {
        let (chat, moderation, pool) = setup().await;
        insert_user(&pool, "admin@statiq.app", None, "admin").await;
        let admin = moderation.verify_admin("admin@statiq.app").await.unwrap();
        moderation.add_filter("garbage", Severity::High, true, &admin).await.unwrap();
        let fan = insert_user(&pool, "fan@example.com", None, "fan").await;

        let posted = chat.post_message(2, fan, "this ref is garbage").await.unwrap();
        assert!(posted.moderation.flagged);
        assert!(posted.message.was_censored);
        assert_eq!(posted.message.message_text, CENSORED_TEXT);

        let stored = chat.room_messages(2, None).await.unwrap();
        assert_eq!(stored[0].message_text, CENSORED_TEXT);
        assert!(stored[0].was_censored);

        let pending = moderation.pending_flags(None).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].message_id, posted.message.id);
    }

    #[tokio::test]
    async fn test_banned_user_cannot_post() {
        let (chat, moderation, pool) = setup().await;
        insert_user(&pool, "admin@statiq.app", None, "admin").await;
        let admin = moderation.verify_admin("admin@statiq.app").await.unwrap();
        let troll = insert_user(&pool, "troll@example.com", None, "fan").await;

        let ban = ModerationAction {
            action_type: ActionType::Ban,
            reason: "trolling".to_string(),
            duration_days: None,
            admin_notes: None,
        };
        moderation.ban(troll, &ban, &admin).await.unwrap();

        assert!(matches!(
            chat.post_message(1, troll, "let me back").await,
            Err(ChatError::Moderation(ModerationError::AccountRestricted(AccountStatus::Banned)))
        ));
        assert!(chat.room_messages(1, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_spam_check_counts_exact_repeats_only() {
        let (chat, moderation, pool) = setup().await;
        let fan = insert_user(&pool, "loud@example.com", None, "fan").await;

        for text in ["GO OWLS", "go owls", "Go Owls", "go OWLS"] {
            let posted = chat.post_message(5, fan, text).await.unwrap();
            assert!(!posted.moderation.flagged, "{} should not be spam", text);
        }
        assert!(moderation.pending_flags(None).await.unwrap().is_empty());

        let mut last = None;
        for _ in 0..4 {
            last = Some(chat.post_message(5, fan, "Defense!").await.unwrap());
        }
        let last = last.unwrap();
        assert!(last.moderation.flagged);

        let pending = moderation.pending_flags(None).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].flag_type, "auto_spam");
        assert_eq!(pending[0].message_id, last.message.id);
    }

    #[tokio::test]
    async fn test_report_message() {
        let (chat, moderation, pool) = setup().await;
        let author = insert_user(&pool, "author@example.com", Some("author"), "fan").await;
        let reporter = insert_user(&pool, "reporter@example.com", Some("reporter"), "fan").await;

        let posted = chat.post_message(4, author, "your team stinks").await.unwrap();
        chat.report_message(posted.message.id, reporter, Some("rude")).await.unwrap();

        let pending = moderation.pending_flags(None).await.unwrap();
        assert_eq!(pending[0].flag_type, "manual");
        assert_eq!(pending[0].flagged_by_username, "reporter");
        assert_eq!(pending[0].flag_reason.as_deref(), Some("rude"));
    }
}
