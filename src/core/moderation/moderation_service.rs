// Moderation service - core business logic for chat moderation.
//
// This service handles:
// - Admin verification
// - The flagged-content review queue
// - User status transitions (warn -> suspend -> ban)
// - Automatic flagging (profanity, repeated messages)
// - Profanity filter management
//
// NO HTTP or SQL here - the store trait is the only way out.

use super::moderation_models::{
    auto_flag_type, AccountStatus, ActionOutcome, ActionType, AdminUser, AutoFlagResult,
    ChatMessageDetail, FlagContext, FlagDetail, FlagReview, FlagStatus, FlaggedMessage, ModerationAction,
    ModerationConfig, ModerationLogEntry, ModerationStats, NewFlag, NewLogEntry,
    ProfanityFilter, Role, Severity, SuspensionRecord, TopFlaggedUser, UserProfile, UserRecord,
    UserSearchResult, FLAG_TYPE_MANUAL, FLAG_TYPE_SPAM,
};
use super::profanity::find_profanity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::America::Chicago;
use serde_json::json;
use thiserror::Error;

const DEFAULT_PENDING_LIMIT: i64 = 50;
const MAX_PENDING_LIMIT: i64 = 200;
const DEFAULT_SEARCH_LIMIT: i64 = 20;
const MAX_SEARCH_LIMIT: i64 = 100;
const PROFILE_MESSAGE_LIMIT: i64 = 50;
const PROFILE_HISTORY_LIMIT: i64 = 20;
const TOP_FLAGGED_LIMIT: i64 = 5;
const TOP_FLAGGED_DAYS: i64 = 7;
const CONTEXT_WINDOW_MINUTES: i64 = 5;
const FLAG_DETAILS_MAX_CHARS: usize = 500;
const LOGGED_TEXT_MAX_CHARS: usize = 100;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Account is {0}")]
    AccountRestricted(AccountStatus),
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Trait for persisting moderation data.
///
/// Operations that touch more than one table (status change + log entry,
/// delete + flag resolution + log entry) must be atomic.
#[async_trait]
pub trait ModerationStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ModerationError>;

    async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, ModerationError>;

    async fn count_pending_flags(&self) -> Result<i64, ModerationError>;

    /// Count log entries of one action type created at or after `since`.
    async fn count_actions_since(
        &self,
        action: ActionType,
        since: DateTime<Utc>,
    ) -> Result<i64, ModerationError>;

    /// Count suspended users whose latest suspension has not expired at `now`.
    async fn count_active_suspensions(&self, now: DateTime<Utc>) -> Result<i64, ModerationError>;

    async fn top_flagged_users(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopFlaggedUser>, ModerationError>;

    /// Pending flags, newest first.
    async fn pending_flags(&self, limit: i64) -> Result<Vec<FlaggedMessage>, ModerationError>;

    async fn get_flag(&self, flag_id: i64) -> Result<Option<FlagDetail>, ModerationError>;

    /// Messages in a room created within `[from, to]`, oldest first.
    async fn messages_between(
        &self,
        room_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ChatMessageDetail>, ModerationError>;

    async fn search_users(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserSearchResult>, ModerationError>;

    async fn user_summary(&self, user_id: i64)
        -> Result<Option<UserSearchResult>, ModerationError>;

    /// Latest messages by a user, newest first.
    async fn recent_messages_by_user(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessageDetail>, ModerationError>;

    /// Latest log entries about a user, newest first.
    async fn moderation_history(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<ModerationLogEntry>, ModerationError>;

    async fn latest_suspension(
        &self,
        user_id: i64,
    ) -> Result<Option<SuspensionRecord>, ModerationError>;

    /// Change a user's status without logging (used to lift expired suspensions).
    async fn set_account_status(
        &self,
        user_id: i64,
        status: AccountStatus,
    ) -> Result<(), ModerationError>;

    /// Increment the warning count, stamp `last_warning_at` and append the log
    /// entry with the new count added to its metadata. Returns the new count.
    async fn apply_warning(&self, entry: NewLogEntry) -> Result<u32, ModerationError>;

    /// Set the account status and append the log entry atomically.
    async fn apply_status_change(
        &self,
        status: AccountStatus,
        entry: NewLogEntry,
    ) -> Result<(), ModerationError>;

    /// Delete a message, resolve its pending flags and append the log entry atomically.
    async fn apply_message_deletion(&self, entry: NewLogEntry) -> Result<(), ModerationError>;

    /// Write a review onto a flag, optionally appending a log entry. Returns
    /// `false` if the flag does not exist.
    async fn review_flag(
        &self,
        flag_id: i64,
        review: FlagReview,
        entry: Option<NewLogEntry>,
    ) -> Result<bool, ModerationError>;

    async fn get_message(&self, message_id: i64)
        -> Result<Option<ChatMessageDetail>, ModerationError>;

    async fn insert_flag(&self, flag: NewFlag) -> Result<i64, ModerationError>;

    /// Count messages by `user_id` with exactly this text created after
    /// `since`.
    async fn count_repeats(
        &self,
        user_id: i64,
        text: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, ModerationError>;

    /// Filters ordered by severity (worst first), then alphabetically.
    async fn list_filters(&self) -> Result<Vec<ProfanityFilter>, ModerationError>;

    async fn find_filter(&self, word: &str) -> Result<Option<ProfanityFilter>, ModerationError>;

    async fn insert_filter(
        &self,
        word: &str,
        severity: Severity,
        auto_delete: bool,
        admin_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<ProfanityFilter, ModerationError>;

    async fn delete_filter(&self, filter_id: i64) -> Result<bool, ModerationError>;
}

// ============================================================================
// HELPERS
// ============================================================================

/// Midnight of the current day in Texas, as UTC.
pub fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    let local_midnight = now
        .with_timezone(&Chicago)
        .date_naive()
        .and_time(NaiveTime::MIN);
    Chicago
        .from_local_datetime(&local_midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now)
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct ModerationService<S: ModerationStore> {
    store: S,
    config: ModerationConfig,
}

impl<S: ModerationStore> ModerationService<S> {
    pub fn new(store: S, config: ModerationConfig) -> Self {
        Self { store, config }
    }

    /// Resolve an admin from the email carried by the request.
    pub async fn verify_admin(&self, email: &str) -> Result<AdminUser, ModerationError> {
        match self.store.find_user_by_email(email.trim()).await? {
            Some(user) if user.role == Role::Admin => Ok(AdminUser {
                id: user.id,
                email: user.email,
                role: user.role,
            }),
            _ => {
                tracing::warn!(email = %email, "Rejected non-admin moderation request");
                Err(ModerationError::Forbidden)
            }
        }
    }

    /// Overview counters for the moderation dashboard.
    pub async fn dashboard(&self) -> Result<ModerationStats, ModerationError> {
        let now = Utc::now();
        let today = start_of_today(now);

        Ok(ModerationStats {
            pending_flags: self.store.count_pending_flags().await?,
            total_warnings_today: self
                .store
                .count_actions_since(ActionType::Warn, today)
                .await?,
            total_suspensions_today: self
                .store
                .count_actions_since(ActionType::Suspend, today)
                .await?,
            active_suspensions: self.store.count_active_suspensions(now).await?,
            messages_deleted_today: self
                .store
                .count_actions_since(ActionType::DeleteMessage, today)
                .await?,
            top_flagged_users: self
                .store
                .top_flagged_users(now - Duration::days(TOP_FLAGGED_DAYS), TOP_FLAGGED_LIMIT)
                .await?,
        })
    }

    pub async fn pending_flags(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<FlaggedMessage>, ModerationError> {
        let limit = limit
            .unwrap_or(DEFAULT_PENDING_LIMIT)
            .clamp(1, MAX_PENDING_LIMIT);
        self.store.pending_flags(limit).await
    }

    /// The flag plus the conversation around the flagged message.
    pub async fn flag_context(&self, flag_id: i64) -> Result<FlagContext, ModerationError> {
        let flag = self
            .store
            .get_flag(flag_id)
            .await?
            .ok_or(ModerationError::NotFound("Flag"))?;

        let context_messages = match (flag.room_id, flag.message_created_at) {
            (Some(room_id), Some(at)) => {
                let window = Duration::minutes(CONTEXT_WINDOW_MINUTES);
                self.store
                    .messages_between(room_id, at - window, at + window)
                    .await?
            }
            _ => Vec::new(),
        };

        Ok(FlagContext {
            flagged_message_id: flag.message_id,
            flag_info: flag,
            context_messages,
        })
    }

    pub async fn search_users(
        &self,
        query: &str,
        limit: Option<i64>,
    ) -> Result<Vec<UserSearchResult>, ModerationError> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Err(ModerationError::InvalidInput(
                "Search query must be at least 2 characters".to_string(),
            ));
        }
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);
        self.store.search_users(query, limit).await
    }

    /// Whether the user is suspended right now, and until when.
    ///
    /// A suspension whose expiry has passed is lifted here.
    async fn refresh_suspension(
        &self,
        user: &UserRecord,
    ) -> Result<(bool, Option<DateTime<Utc>>), ModerationError> {
        if user.account_status != AccountStatus::Suspended {
            return Ok((false, None));
        }

        let now = Utc::now();
        match self.store.latest_suspension(user.id).await? {
            Some(SuspensionRecord {
                expires_at: Some(expires_at),
                ..
            }) if expires_at <= now => {
                self.store
                    .set_account_status(user.id, AccountStatus::Active)
                    .await?;
                tracing::info!(user_id = user.id, %expires_at, "Suspension expired, account reactivated");
                Ok((false, None))
            }
            Some(record) => Ok((true, record.expires_at)),
            None => Ok((true, None)),
        }
    }

    async fn require_user(&self, user_id: i64) -> Result<UserRecord, ModerationError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(ModerationError::NotFound("User"))
    }

    pub async fn user_profile(&self, user_id: i64) -> Result<UserProfile, ModerationError> {
        let user = self.require_user(user_id).await?;
        let (is_suspended, suspension_expires) = self.refresh_suspension(&user).await?;

        let summary = self
            .store
            .user_summary(user_id)
            .await?
            .ok_or(ModerationError::NotFound("User"))?;

        Ok(UserProfile {
            summary,
            recent_messages: self
                .store
                .recent_messages_by_user(user_id, PROFILE_MESSAGE_LIMIT)
                .await?,
            moderation_history: self
                .store
                .moderation_history(user_id, PROFILE_HISTORY_LIMIT)
                .await?,
            is_suspended,
            suspension_expires,
        })
    }

    /// Refuse chat access to suspended and banned users.
    pub async fn ensure_can_post(&self, user_id: i64) -> Result<(), ModerationError> {
        let user = self.require_user(user_id).await?;
        match user.account_status {
            AccountStatus::Banned => Err(ModerationError::AccountRestricted(AccountStatus::Banned)),
            AccountStatus::Suspended => {
                let (still_suspended, _) = self.refresh_suspension(&user).await?;
                if still_suspended {
                    Err(ModerationError::AccountRestricted(AccountStatus::Suspended))
                } else {
                    Ok(())
                }
            }
            AccountStatus::Active => Ok(()),
        }
    }

    fn require_reason(action: &ModerationAction) -> Result<String, ModerationError> {
        let reason = action.reason.trim();
        if reason.is_empty() {
            return Err(ModerationError::InvalidInput(
                "A reason is required".to_string(),
            ));
        }
        Ok(reason.to_string())
    }

    pub async fn warn(
        &self,
        user_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let reason = Self::require_reason(action)?;
        let user = self.require_user(user_id).await?;
        if user.account_status == AccountStatus::Banned {
            return Err(ModerationError::Conflict(
                "User is banned and cannot be warned".to_string(),
            ));
        }

        let warning_count = self
            .store
            .apply_warning(NewLogEntry {
                user_id,
                action_type: ActionType::Warn,
                action_reason: reason,
                moderator_id: admin.id,
                related_message_id: None,
                expires_at: None,
                metadata: json!({ "notes": action.admin_notes }),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id, moderator_id = admin.id, warning_count, "User warned");

        let threshold = self.config.warnings_before_suspend;
        let mut outcome = if warning_count >= threshold {
            let mut outcome = ActionOutcome::done(format!(
                "User has reached {} warnings. Consider suspension.",
                threshold
            ));
            outcome.auto_action_suggested = Some(ActionType::Suspend);
            outcome
        } else {
            ActionOutcome::done(format!(
                "Warning issued. User now has {} warning(s).",
                warning_count
            ))
        };
        outcome.warning_count = Some(warning_count);
        Ok(outcome)
    }

    pub async fn suspend(
        &self,
        user_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let reason = Self::require_reason(action)?;
        if matches!(action.duration_days, Some(days) if days <= 0) {
            return Err(ModerationError::InvalidInput(
                "duration_days must be positive".to_string(),
            ));
        }

        let user = self.require_user(user_id).await?;
        if user.account_status == AccountStatus::Banned {
            return Err(ModerationError::Conflict(
                "User is banned and cannot be suspended".to_string(),
            ));
        }

        let now = Utc::now();
        let expires_at = action.duration_days.map(|days| now + Duration::days(days));

        self.store
            .apply_status_change(
                AccountStatus::Suspended,
                NewLogEntry {
                    user_id,
                    action_type: ActionType::Suspend,
                    action_reason: reason,
                    moderator_id: admin.id,
                    related_message_id: None,
                    expires_at,
                    metadata: json!({
                        "duration_days": action.duration_days,
                        "notes": action.admin_notes,
                    }),
                    created_at: now,
                },
            )
            .await?;

        tracing::info!(user_id, moderator_id = admin.id, ?expires_at, "User suspended");

        let duration = match action.duration_days {
            Some(days) => format!("{} days", days),
            None => "permanently".to_string(),
        };
        let mut outcome = ActionOutcome::done(format!("User suspended for {}.", duration));
        outcome.expires_at = expires_at;
        Ok(outcome)
    }

    pub async fn ban(
        &self,
        user_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let reason = Self::require_reason(action)?;
        let user = self.require_user(user_id).await?;
        if user.account_status == AccountStatus::Banned {
            return Err(ModerationError::Conflict("User is already banned".to_string()));
        }

        self.store
            .apply_status_change(
                AccountStatus::Banned,
                NewLogEntry {
                    user_id,
                    action_type: ActionType::Ban,
                    action_reason: reason,
                    moderator_id: admin.id,
                    related_message_id: None,
                    expires_at: None,
                    metadata: json!({ "notes": action.admin_notes }),
                    created_at: Utc::now(),
                },
            )
            .await?;

        tracing::warn!(user_id, moderator_id = admin.id, "User permanently banned");
        Ok(ActionOutcome::done("User permanently banned."))
    }

    pub async fn delete_message(
        &self,
        message_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let reason = Self::require_reason(action)?;
        let message = self
            .store
            .get_message(message_id)
            .await?
            .ok_or(ModerationError::NotFound("Message"))?;

        self.store
            .apply_message_deletion(NewLogEntry {
                user_id: message.user_id,
                action_type: ActionType::DeleteMessage,
                action_reason: reason,
                moderator_id: admin.id,
                related_message_id: Some(message_id),
                expires_at: None,
                metadata: json!({
                    "message_text": truncate_chars(&message.message_text, LOGGED_TEXT_MAX_CHARS),
                    "room_id": message.room_id,
                }),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(message_id, author_id = message.user_id, moderator_id = admin.id, "Message deleted");
        Ok(ActionOutcome::done("Message deleted."))
    }

    pub async fn dismiss_flag(
        &self,
        flag_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let flag = self
            .store
            .get_flag(flag_id)
            .await?
            .ok_or(ModerationError::NotFound("Flag"))?;

        let now = Utc::now();
        let reason = match action.reason.trim() {
            "" => "Flag dismissed".to_string(),
            reason => reason.to_string(),
        };
        let entry = NewLogEntry {
            user_id: flag.message_author_id,
            action_type: ActionType::DismissFlag,
            action_reason: reason,
            moderator_id: admin.id,
            related_message_id: Some(flag.message_id),
            expires_at: None,
            metadata: json!({ "flag_id": flag_id, "notes": action.admin_notes }),
            created_at: now,
        };
        let review = FlagReview {
            status: FlagStatus::Dismissed,
            action_taken: None,
            reviewer_id: admin.id,
            admin_notes: action.admin_notes.clone(),
            reviewed_at: now,
        };

        if !self.store.review_flag(flag_id, review, Some(entry)).await? {
            return Err(ModerationError::NotFound("Flag"));
        }

        tracing::info!(flag_id, moderator_id = admin.id, "Flag dismissed");
        Ok(ActionOutcome::done("Flag dismissed."))
    }

    /// Mark a flag as handled. The action itself is taken through its own endpoint.
    pub async fn action_flag(
        &self,
        flag_id: i64,
        action: &ModerationAction,
        admin: &AdminUser,
    ) -> Result<ActionOutcome, ModerationError> {
        let flag = self
            .store
            .get_flag(flag_id)
            .await?
            .ok_or(ModerationError::NotFound("Flag"))?;

        let review = FlagReview {
            status: FlagStatus::Actioned,
            action_taken: Some(action.action_type),
            reviewer_id: admin.id,
            admin_notes: action.admin_notes.clone(),
            reviewed_at: Utc::now(),
        };
        if !self.store.review_flag(flag_id, review, None).await? {
            return Err(ModerationError::NotFound("Flag"));
        }

        tracing::info!(flag_id, action = %action.action_type, moderator_id = admin.id, "Flag actioned");

        let mut outcome =
            ActionOutcome::done(format!("Flag marked as actioned: {}", action.action_type));
        outcome.user_id = Some(flag.message_author_id);
        outcome.message_id = Some(flag.message_id);
        Ok(outcome)
    }

    /// Run the automatic checks on a freshly posted message.
    ///
    /// Profanity is checked first; the repeated-message check only runs on
    /// messages that pass it.
    pub async fn auto_flag_check(
        &self,
        message_id: i64,
        message_text: &str,
    ) -> Result<AutoFlagResult, ModerationError> {
        let message = self
            .store
            .get_message(message_id)
            .await?
            .ok_or(ModerationError::NotFound("Message"))?;
        let now = Utc::now();

        let filters = self.store.list_filters().await?;
        if let Some(hit) = find_profanity(message_text, &filters) {
            let flag_id = self
                .store
                .insert_flag(NewFlag {
                    message_id,
                    message_user_id: message.user_id,
                    flag_type: auto_flag_type(hit.severity),
                    flag_reason: Some(format!("Profanity detected: {}", hit.found_word)),
                    flag_details: Some(truncate_chars(message_text, FLAG_DETAILS_MAX_CHARS)),
                    flagged_by_user_id: None,
                    created_at: now,
                })
                .await?;

            tracing::info!(
                message_id,
                flag_id,
                severity = hit.severity.as_str(),
                should_delete = hit.auto_delete,
                "Message auto-flagged for profanity"
            );

            return Ok(AutoFlagResult {
                flagged: true,
                flag_id: Some(flag_id),
                should_delete: hit.auto_delete,
                severity: Some(hit.severity),
                found_word: Some(hit.found_word),
            });
        }

        let since = now - Duration::seconds(self.config.spam_window_secs);
        let repeats = self
            .store
            .count_repeats(message.user_id, message_text.trim(), since)
            .await?;

        if repeats > i64::from(self.config.spam_max_repeats) {
            let flag_id = self
                .store
                .insert_flag(NewFlag {
                    message_id,
                    message_user_id: message.user_id,
                    flag_type: FLAG_TYPE_SPAM.to_string(),
                    flag_reason: Some("Repeated message detected".to_string()),
                    flag_details: Some(truncate_chars(message_text, FLAG_DETAILS_MAX_CHARS)),
                    flagged_by_user_id: None,
                    created_at: now,
                })
                .await?;

            tracing::info!(message_id, flag_id, repeats, "Message auto-flagged as spam");

            return Ok(AutoFlagResult {
                flagged: true,
                flag_id: Some(flag_id),
                should_delete: false,
                severity: Some(Severity::Medium),
                found_word: None,
            });
        }

        Ok(AutoFlagResult::clear())
    }

    /// A user reporting someone else's message.
    pub async fn flag_message(
        &self,
        message_id: i64,
        reporter_id: i64,
        reason: Option<&str>,
    ) -> Result<i64, ModerationError> {
        let message = self
            .store
            .get_message(message_id)
            .await?
            .ok_or(ModerationError::NotFound("Message"))?;

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("Reported by user");

        let flag_id = self
            .store
            .insert_flag(NewFlag {
                message_id,
                message_user_id: message.user_id,
                flag_type: FLAG_TYPE_MANUAL.to_string(),
                flag_reason: Some(reason.to_string()),
                flag_details: Some(truncate_chars(&message.message_text, FLAG_DETAILS_MAX_CHARS)),
                flagged_by_user_id: Some(reporter_id),
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(message_id, flag_id, reporter_id, "Message reported");
        Ok(flag_id)
    }

    pub async fn list_filters(&self) -> Result<Vec<ProfanityFilter>, ModerationError> {
        self.store.list_filters().await
    }

    pub async fn add_filter(
        &self,
        word: &str,
        severity: Severity,
        auto_delete: bool,
        admin: &AdminUser,
    ) -> Result<ProfanityFilter, ModerationError> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(ModerationError::InvalidInput(
                "Filter word must not be empty".to_string(),
            ));
        }
        if self.store.find_filter(&word).await?.is_some() {
            return Err(ModerationError::Conflict(format!(
                "'{}' is already filtered",
                word
            )));
        }

        let filter = self
            .store
            .insert_filter(&word, severity, auto_delete, admin.id, Utc::now())
            .await?;
        tracing::info!(filter_id = filter.id, severity = severity.as_str(), auto_delete, "Profanity filter added");
        Ok(filter)
    }

    pub async fn delete_filter(&self, filter_id: i64) -> Result<(), ModerationError> {
        if !self.store.delete_filter(filter_id).await? {
            return Err(ModerationError::NotFound("Filter"));
        }
        tracing::info!(filter_id, "Profanity filter removed");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
