// SQLite-backed moderation store.
//
// Tables (created in `infra::database::migrate`):
// - users: account status and warning counters
// - chat_messages: the messages being moderated
// - flagged_content: the review queue
// - moderation_log: append-only audit trail
// - profanity_filters: admin-managed word list

use crate::core::moderation::{
    display_name, AccountStatus, ActionType, ChatMessageDetail, FlagDetail, FlagReview,
    FlagStatus, FlaggedMessage, ModerationError, ModerationLogEntry, ModerationStore, NewFlag,
    NewLogEntry, ProfanityFilter, Role, Severity, SuspensionRecord, TopFlaggedUser, UserRecord,
    UserSearchResult,
};
use crate::infra::database::{like_pattern, parse_opt_ts, parse_ts, ts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite, SqliteConnection};

const USER_COLUMNS: &str = "u.id, u.email, u.username, u.role, u.account_status, \
     u.warning_count, u.last_warning_at, u.last_active, u.created_at";

const SUMMARY_SELECT: &str = r#"
    SELECT u.id, u.email, u.username, u.role, u.account_status,
           u.warning_count, u.last_warning_at, u.last_active, u.created_at,
           (SELECT COUNT(*) FROM flagged_content f WHERE f.message_user_id = u.id) AS total_flags,
           (SELECT COUNT(*) FROM moderation_log l WHERE l.user_id = u.id) AS total_mod_actions,
           (SELECT MAX(l.created_at) FROM moderation_log l WHERE l.user_id = u.id) AS last_action_date
    FROM users u
"#;

pub(crate) const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.room_id, m.user_id, u.email, u.username,
           m.message_text, m.was_censored, m.created_at
    FROM chat_messages m
    JOIN users u ON u.id = m.user_id
"#;

/// Sorts after any real timestamp; stands in for "no expiry".
const NEVER: &str = "9999-12-31T00:00:00.000000Z";

fn db_err(e: sqlx::Error) -> ModerationError {
    ModerationError::StorageError(e.to_string())
}

fn user_from_row(row: &SqliteRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        role: Role::parse(row.get("role")).unwrap_or(Role::Fan),
        account_status: AccountStatus::parse(row.get("account_status"))
            .unwrap_or(AccountStatus::Active),
        warning_count: row.get::<i64, _>("warning_count") as u32,
        last_warning_at: parse_opt_ts(row.get("last_warning_at")),
        last_active: parse_opt_ts(row.get("last_active")),
        created_at: parse_ts(row.get("created_at")),
    }
}

fn summary_from_row(row: &SqliteRow) -> UserSearchResult {
    let user = user_from_row(row);
    UserSearchResult {
        user_id: user.id,
        username: display_name(user.username.as_deref(), &user.email),
        email: user.email,
        role: user.role,
        account_status: user.account_status,
        warning_count: user.warning_count,
        last_warning_at: user.last_warning_at,
        total_flags: row.get("total_flags"),
        total_mod_actions: row.get("total_mod_actions"),
        last_action_date: parse_opt_ts(row.get("last_action_date")),
        last_active: user.last_active,
        created_at: user.created_at,
    }
}

/// Map a row selected with `MESSAGE_SELECT`.
pub(crate) fn message_from_row(row: &SqliteRow) -> ChatMessageDetail {
    let email: String = row.get("email");
    let username: Option<String> = row.get("username");
    ChatMessageDetail {
        id: row.get("id"),
        room_id: row.get("room_id"),
        user_id: row.get("user_id"),
        user_name: display_name(username.as_deref(), &email),
        message_text: row.get("message_text"),
        was_censored: row.get("was_censored"),
        created_at: parse_ts(row.get("created_at")),
    }
}

fn filter_from_row(row: &SqliteRow) -> ProfanityFilter {
    ProfanityFilter {
        id: row.get("id"),
        word_or_phrase: row.get("word_or_phrase"),
        severity: Severity::parse(row.get("severity")).unwrap_or(Severity::Low),
        auto_delete: row.get("auto_delete"),
        added_by_admin_id: row.get("added_by_admin_id"),
        created_at: parse_ts(row.get("created_at")),
    }
}

/// Append one row to the moderation log on the caller's connection.
async fn insert_log(conn: &mut SqliteConnection, entry: &NewLogEntry) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO moderation_log (
            user_id, action_type, action_reason, moderator_id,
            related_message_id, expires_at, metadata, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(entry.user_id)
    .bind(entry.action_type.as_str())
    .bind(&entry.action_reason)
    .bind(entry.moderator_id)
    .bind(entry.related_message_id)
    .bind(entry.expires_at.map(ts))
    .bind(entry.metadata.to_string())
    .bind(ts(entry.created_at))
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub struct SqliteModerationStore {
    pool: Pool<Sqlite>,
}

impl SqliteModerationStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModerationStore for SqliteModerationStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ModerationError> {
        let sql = format!(
            "SELECT {} FROM users u WHERE lower(u.email) = lower(?)",
            USER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, ModerationError> {
        let sql = format!("SELECT {} FROM users u WHERE u.id = ?", USER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn count_pending_flags(&self) -> Result<i64, ModerationError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM flagged_content WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn count_actions_since(
        &self,
        action: ActionType,
        since: DateTime<Utc>,
    ) -> Result<i64, ModerationError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM moderation_log WHERE action_type = ? AND created_at >= ?",
        )
        .bind(action.as_str())
        .bind(ts(since))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn count_active_suspensions(&self, now: DateTime<Utc>) -> Result<i64, ModerationError> {
        // A suspended user with no suspend entry, or one without expiry, counts as active.
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users u
            WHERE u.account_status = 'suspended'
              AND COALESCE((
                  SELECT l.expires_at FROM moderation_log l
                  WHERE l.user_id = u.id AND l.action_type = 'suspend'
                  ORDER BY l.created_at DESC, l.id DESC
                  LIMIT 1
              ), ?) > ?
            "#,
        )
        .bind(NEVER)
        .bind(ts(now))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn top_flagged_users(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopFlaggedUser>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT f.message_user_id AS user_id, u.email, u.username, COUNT(*) AS flag_count
            FROM flagged_content f
            JOIN users u ON u.id = f.message_user_id
            WHERE f.created_at >= ?
            GROUP BY f.message_user_id, u.email, u.username
            ORDER BY flag_count DESC, f.message_user_id
            LIMIT ?
            "#,
        )
        .bind(ts(since))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| {
                let email: String = row.get("email");
                let username: Option<String> = row.get("username");
                TopFlaggedUser {
                    user_id: row.get("user_id"),
                    username: display_name(username.as_deref(), &email),
                    flag_count: row.get("flag_count"),
                }
            })
            .collect())
    }

    async fn pending_flags(&self, limit: i64) -> Result<Vec<FlaggedMessage>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT f.id AS flag_id, f.message_id, m.message_text, m.room_id,
                   f.message_user_id, a.email AS author_email, a.username AS author_username,
                   f.flag_type, f.flag_reason, f.flagged_by_user_id,
                   r.email AS reporter_email, r.username AS reporter_username,
                   f.created_at
            FROM flagged_content f
            JOIN chat_messages m ON m.id = f.message_id
            JOIN users a ON a.id = f.message_user_id
            LEFT JOIN users r ON r.id = f.flagged_by_user_id
            WHERE f.status = 'pending'
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| {
                let author_email: String = row.get("author_email");
                let author_username: Option<String> = row.get("author_username");
                let reporter_email: Option<String> = row.get("reporter_email");
                let reporter_username: Option<String> = row.get("reporter_username");

                FlaggedMessage {
                    flag_id: row.get("flag_id"),
                    message_id: row.get("message_id"),
                    message_text: row.get("message_text"),
                    room_id: row.get("room_id"),
                    message_author_id: row.get("message_user_id"),
                    message_author_username: display_name(
                        author_username.as_deref(),
                        &author_email,
                    ),
                    flag_type: row.get("flag_type"),
                    flag_reason: row.get("flag_reason"),
                    flagged_by_user_id: row.get("flagged_by_user_id"),
                    flagged_by_username: match reporter_email {
                        Some(email) => display_name(reporter_username.as_deref(), &email),
                        None => "System".to_string(),
                    },
                    created_at: parse_ts(row.get("created_at")),
                }
            })
            .collect())
    }

    async fn get_flag(&self, flag_id: i64) -> Result<Option<FlagDetail>, ModerationError> {
        let row = sqlx::query(
            r#"
            SELECT f.id, f.message_id, f.message_user_id, f.flag_type, f.flag_reason,
                   f.flag_details, f.status, m.room_id, m.created_at AS message_created_at
            FROM flagged_content f
            LEFT JOIN chat_messages m ON m.id = f.message_id
            WHERE f.id = ?
            "#,
        )
        .bind(flag_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|row| FlagDetail {
            flag_id: row.get("id"),
            message_id: row.get("message_id"),
            message_author_id: row.get("message_user_id"),
            flag_type: row.get("flag_type"),
            flag_reason: row.get("flag_reason"),
            flag_details: row.get("flag_details"),
            status: FlagStatus::parse(row.get("status")).unwrap_or(FlagStatus::Pending),
            room_id: row.get("room_id"),
            message_created_at: parse_opt_ts(row.get("message_created_at")),
        }))
    }

    async fn messages_between(
        &self,
        room_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ChatMessageDetail>, ModerationError> {
        let sql = format!(
            "{} WHERE m.room_id = ? AND m.created_at >= ? AND m.created_at <= ? \
             ORDER BY m.created_at, m.id",
            MESSAGE_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(room_id)
            .bind(ts(from))
            .bind(ts(to))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSearchResult>, ModerationError> {
        let sql = format!(
            r#"{}
            WHERE lower(COALESCE(u.username, '')) LIKE ? ESCAPE '\'
               OR lower(u.email) LIKE ? ESCAPE '\'
               OR CAST(u.id AS TEXT) = ?
            ORDER BY last_action_date IS NULL, last_action_date DESC, u.id
            LIMIT ?
            "#,
            SUMMARY_SELECT
        );
        let pattern = like_pattern(query);
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(summary_from_row).collect())
    }

    async fn user_summary(
        &self,
        user_id: i64,
    ) -> Result<Option<UserSearchResult>, ModerationError> {
        let sql = format!("{} WHERE u.id = ?", SUMMARY_SELECT);
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(summary_from_row))
    }

    async fn recent_messages_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessageDetail>, ModerationError> {
        let sql = format!(
            "{} WHERE m.user_id = ? ORDER BY m.created_at DESC, m.id DESC LIMIT ?",
            MESSAGE_SELECT
        );
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn moderation_history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ModerationLogEntry>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT l.id, l.action_type, l.action_reason, l.created_at, l.expires_at,
                   l.related_message_id, mu.email AS moderator_email,
                   mu.username AS moderator_username
            FROM moderation_log l
            LEFT JOIN users mu ON mu.id = l.moderator_id
            WHERE l.user_id = ?
            ORDER BY l.created_at DESC, l.id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .filter_map(|row| {
                let action_type = ActionType::parse(row.get("action_type"))?;
                let moderator_email: Option<String> = row.get("moderator_email");
                let moderator_username: Option<String> = row.get("moderator_username");
                Some(ModerationLogEntry {
                    id: row.get("id"),
                    action_type,
                    action_reason: row.get("action_reason"),
                    created_at: parse_ts(row.get("created_at")),
                    expires_at: parse_opt_ts(row.get("expires_at")),
                    related_message_id: row.get("related_message_id"),
                    moderator_username: match moderator_email {
                        Some(email) => display_name(moderator_username.as_deref(), &email),
                        None => "Unknown".to_string(),
                    },
                })
            })
            .collect())
    }

    async fn latest_suspension(
        &self,
        user_id: i64,
    ) -> Result<Option<SuspensionRecord>, ModerationError> {
        let row = sqlx::query(
            r#"
            SELECT created_at, expires_at FROM moderation_log
            WHERE user_id = ? AND action_type = 'suspend'
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|row| SuspensionRecord {
            created_at: parse_ts(row.get("created_at")),
            expires_at: parse_opt_ts(row.get("expires_at")),
        }))
    }

    async fn set_account_status(
        &self,
        user_id: i64,
        status: AccountStatus,
    ) -> Result<(), ModerationError> {
        sqlx::query("UPDATE users SET account_status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn apply_warning(&self, mut entry: NewLogEntry) -> Result<u32, ModerationError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query(
            "UPDATE users SET warning_count = warning_count + 1, last_warning_at = ? WHERE id = ?",
        )
        .bind(ts(entry.created_at))
        .bind(entry.user_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(ModerationError::NotFound("User"));
        }

        let count: i64 = sqlx::query_scalar("SELECT warning_count FROM users WHERE id = ?")
            .bind(entry.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_err)?;

        if let Some(metadata) = entry.metadata.as_object_mut() {
            metadata.insert("warning_count".to_string(), count.into());
        }
        insert_log(&mut *tx, &entry).await.map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(count as u32)
    }

    async fn apply_status_change(
        &self,
        status: AccountStatus,
        entry: NewLogEntry,
    ) -> Result<(), ModerationError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query("UPDATE users SET account_status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(entry.user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Err(ModerationError::NotFound("User"));
        }

        insert_log(&mut *tx, &entry).await.map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn apply_message_deletion(&self, entry: NewLogEntry) -> Result<(), ModerationError> {
        let message_id = entry
            .related_message_id
            .ok_or(ModerationError::NotFound("Message"))?;
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let deleted = sqlx::query("DELETE FROM chat_messages WHERE id = ?")
            .bind(message_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if deleted.rows_affected() == 0 {
            return Err(ModerationError::NotFound("Message"));
        }

        sqlx::query(
            r#"
            UPDATE flagged_content
            SET status = 'actioned', action_taken = 'delete_message',
                reviewed_by_admin_id = ?, reviewed_at = ?
            WHERE message_id = ? AND status = 'pending'
            "#,
        )
        .bind(entry.moderator_id)
        .bind(ts(entry.created_at))
        .bind(message_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        insert_log(&mut *tx, &entry).await.map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn review_flag(
        &self,
        flag_id: i64,
        review: FlagReview,
        entry: Option<NewLogEntry>,
    ) -> Result<bool, ModerationError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let updated = sqlx::query(
            r#"
            UPDATE flagged_content
            SET status = ?, action_taken = ?, reviewed_by_admin_id = ?,
                reviewed_at = ?, admin_notes = ?
            WHERE id = ?
            "#,
        )
        .bind(review.status.as_str())
        .bind(review.action_taken.map(|a| a.as_str()))
        .bind(review.reviewer_id)
        .bind(ts(review.reviewed_at))
        .bind(&review.admin_notes)
        .bind(flag_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if updated.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(entry) = entry {
            insert_log(&mut *tx, &entry).await.map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn get_message(
        &self,
        message_id: i64,
    ) -> Result<Option<ChatMessageDetail>, ModerationError> {
        let sql = format!("{} WHERE m.id = ?", MESSAGE_SELECT);
        let row = sqlx::query(&sql)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(message_from_row))
    }

    async fn insert_flag(&self, flag: NewFlag) -> Result<i64, ModerationError> {
        let result = sqlx::query(
            r#"
            INSERT INTO flagged_content (
                message_id, message_user_id, flag_type, flag_reason,
                flag_details, flagged_by_user_id, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, 'pending', ?)
            "#,
        )
        .bind(flag.message_id)
        .bind(flag.message_user_id)
        .bind(&flag.flag_type)
        .bind(&flag.flag_reason)
        .bind(&flag.flag_details)
        .bind(flag.flagged_by_user_id)
        .bind(ts(flag.created_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.last_insert_rowid())
    }

    async fn count_repeats(
        &self,
        user_id: i64,
        text: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, ModerationError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM chat_messages
            WHERE user_id = ? AND message_text = ? AND created_at > ?
            "#,
        )
        .bind(user_id)
        .bind(text)
        .bind(ts(since))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn list_filters(&self) -> Result<Vec<ProfanityFilter>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM profanity_filters
            ORDER BY CASE severity WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
                     word_or_phrase
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.iter().map(filter_from_row).collect())
    }

    async fn find_filter(&self, word: &str) -> Result<Option<ProfanityFilter>, ModerationError> {
        let row = sqlx::query("SELECT * FROM profanity_filters WHERE word_or_phrase = ?")
            .bind(word)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(filter_from_row))
    }

    async fn insert_filter(
        &self,
        word: &str,
        severity: Severity,
        auto_delete: bool,
        admin_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<ProfanityFilter, ModerationError> {
        let result = sqlx::query(
            r#"
            INSERT INTO profanity_filters (word_or_phrase, severity, auto_delete, added_by_admin_id, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(word)
        .bind(severity.as_str())
        .bind(auto_delete)
        .bind(admin_id)
        .bind(ts(created_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(ProfanityFilter {
            id: result.last_insert_rowid(),
            word_or_phrase: word.to_string(),
            severity,
            auto_delete,
            added_by_admin_id: Some(admin_id),
            created_at,
        })
    }

    async fn delete_filter(&self, filter_id: i64) -> Result<bool, ModerationError> {
        let result = sqlx::query("DELETE FROM profanity_filters WHERE id = ?")
            .bind(filter_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::database::fixtures::{insert_message, insert_user};
    use crate::infra::database::memory_pool;
    use chrono::Duration;
    use serde_json::json;

    fn entry(user_id: i64, action_type: ActionType, moderator_id: i64) -> NewLogEntry {
        NewLogEntry {
            user_id,
            action_type,
            action_reason: "test".to_string(),
            moderator_id,
            related_message_id: None,
            expires_at: None,
            metadata: json!({}),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_warning_is_logged_with_count() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());
        let admin = insert_user(&pool, "admin@statiq.app", None, "admin").await;
        let user = insert_user(&pool, "fan@example.com", None, "fan").await;

        assert_eq!(store.apply_warning(entry(user, ActionType::Warn, admin)).await.unwrap(), 1);
        assert_eq!(store.apply_warning(entry(user, ActionType::Warn, admin)).await.unwrap(), 2);

        let metadata: String = sqlx::query_scalar(
            "SELECT metadata FROM moderation_log WHERE user_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(user)
        .fetch_one(&pool)
        .await
        .unwrap();
        let metadata: serde_json::Value = serde_json::from_str(&metadata).unwrap();
        assert_eq!(metadata["warning_count"], 2);
    }

    #[tokio::test]
    async fn test_status_change_for_unknown_user_writes_nothing() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());

        let result = store
            .apply_status_change(AccountStatus::Banned, entry(404, ActionType::Ban, 1))
            .await;
        assert!(matches!(result, Err(ModerationError::NotFound("User"))));

        let logged: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM moderation_log")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(logged, 0);
    }

    #[tokio::test]
    async fn test_review_of_missing_flag_is_rolled_back() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());
        let review = FlagReview {
            status: FlagStatus::Dismissed,
            action_taken: None,
            reviewer_id: 1,
            admin_notes: None,
            reviewed_at: Utc::now(),
        };

        let found = store
            .review_flag(99, review, Some(entry(1, ActionType::DismissFlag, 1)))
            .await
            .unwrap();
        assert!(!found);

        let logged: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM moderation_log")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(logged, 0);
    }

    #[tokio::test]
    async fn test_active_suspensions_ignore_expired_ones() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());
        let admin = insert_user(&pool, "admin@statiq.app", None, "admin").await;
        let indefinite = insert_user(&pool, "a@example.com", None, "fan").await;
        let timed = insert_user(&pool, "b@example.com", None, "fan").await;
        let expired = insert_user(&pool, "c@example.com", None, "fan").await;
        let now = Utc::now();

        store
            .apply_status_change(AccountStatus::Suspended, entry(indefinite, ActionType::Suspend, admin))
            .await
            .unwrap();

        let mut until_tomorrow = entry(timed, ActionType::Suspend, admin);
        until_tomorrow.expires_at = Some(now + Duration::days(1));
        store
            .apply_status_change(AccountStatus::Suspended, until_tomorrow)
            .await
            .unwrap();

        let mut lapsed = entry(expired, ActionType::Suspend, admin);
        lapsed.created_at = now - Duration::days(3);
        lapsed.expires_at = Some(now - Duration::days(1));
        store
            .apply_status_change(AccountStatus::Suspended, lapsed)
            .await
            .unwrap();

        assert_eq!(store.count_active_suspensions(now).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_repeat_count_is_exact_and_per_user() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());
        let a = insert_user(&pool, "a@example.com", None, "fan").await;
        let b = insert_user(&pool, "b@example.com", None, "fan").await;
        let now = Utc::now();
        let since = now - Duration::minutes(5);

        insert_message(&pool, 1, a, "go owls", now).await;
        insert_message(&pool, 2, a, "go owls", now).await;
        insert_message(&pool, 1, a, "GO OWLS", now).await;
        insert_message(&pool, 1, a, "Go Owls", now).await;
        insert_message(&pool, 1, a, "go owls", now - Duration::hours(1)).await;
        insert_message(&pool, 1, a, "go owls", since).await;
        insert_message(&pool, 1, b, "go owls", now).await;

        assert_eq!(store.count_repeats(a, "go owls", since).await.unwrap(), 2);
        assert_eq!(store.count_repeats(a, "GO OWLS", since).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_flag_detail_survives_message_deletion() {
        let pool = memory_pool().await;
        let store = SqliteModerationStore::new(pool.clone());
        let admin = insert_user(&pool, "admin@statiq.app", None, "admin").await;
        let author = insert_user(&pool, "author@example.com", None, "fan").await;
        let message_id = insert_message(&pool, 4, author, "nope", Utc::now()).await;

        let flag_id = store
            .insert_flag(NewFlag {
                message_id,
                message_user_id: author,
                flag_type: "manual".to_string(),
                flag_reason: None,
                flag_details: None,
                flagged_by_user_id: Some(admin),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut deletion = entry(author, ActionType::DeleteMessage, admin);
        deletion.related_message_id = Some(message_id);
        store.apply_message_deletion(deletion).await.unwrap();

        let flag = store.get_flag(flag_id).await.unwrap().unwrap();
        assert_eq!(flag.status, FlagStatus::Actioned);
        assert_eq!(flag.room_id, None);
        assert_eq!(flag.message_author_id, author);
    }
}
