// Moderation domain models - data structures for the chat moderation system.
//
// These are pure domain types with no HTTP or SQL dependencies.
// The API layer serializes them, the infra layer maps rows into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account state of a user. `Banned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Banned => "banned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AccountStatus::Active),
            "suspended" => Some(AccountStatus::Suspended),
            "banned" => Some(AccountStatus::Banned),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Fan,
    Player,
    Coach,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Fan => "fan",
            Role::Player => "player",
            Role::Coach => "coach",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fan" => Some(Role::Fan),
            "player" => Some(Role::Player),
            "coach" => Some(Role::Coach),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Kinds of administrative actions recorded in the moderation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Warn,
    Suspend,
    Ban,
    DeleteMessage,
    DismissFlag,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Warn => "warn",
            ActionType::Suspend => "suspend",
            ActionType::Ban => "ban",
            ActionType::DeleteMessage => "delete_message",
            ActionType::DismissFlag => "dismiss_flag",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "warn" => Some(ActionType::Warn),
            "suspend" => Some(ActionType::Suspend),
            "ban" => Some(ActionType::Ban),
            "delete_message" => Some(ActionType::DeleteMessage),
            "dismiss_flag" => Some(ActionType::DismissFlag),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagStatus {
    Pending,
    Dismissed,
    Actioned,
}

impl FlagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagStatus::Pending => "pending",
            FlagStatus::Dismissed => "dismissed",
            FlagStatus::Actioned => "actioned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(FlagStatus::Pending),
            "dismissed" => Some(FlagStatus::Dismissed),
            "actioned" => Some(FlagStatus::Actioned),
            _ => None,
        }
    }
}

/// Profanity severity. Ordered so the worst match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

/// Flag type used for user reports.
pub const FLAG_TYPE_MANUAL: &str = "manual";
/// Flag type used by the repeated-message detector.
pub const FLAG_TYPE_SPAM: &str = "auto_spam";

/// Flag type for an automatic profanity flag, e.g. `auto_high`.
pub fn auto_flag_type(severity: Severity) -> String {
    format!("auto_{}", severity.as_str())
}

/// Name shown for a user: their username, or the local part of their email.
pub fn display_name(username: Option<&str>, email: &str) -> String {
    match username {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase(),
    }
}

/// Request body for every moderation action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationAction {
    pub action_type: ActionType,
    pub reason: String,
    /// Only meaningful for suspensions. `None` means indefinite.
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// The verified administrator performing an action.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// A user row as the moderation system sees it.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub account_status: AccountStatus,
    pub warning_count: u32,
    pub last_warning_at: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSearchResult {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub account_status: AccountStatus,
    pub warning_count: u32,
    pub last_warning_at: Option<DateTime<Utc>>,
    pub total_flags: i64,
    pub total_mod_actions: i64,
    pub last_action_date: Option<DateTime<Utc>>,
    pub last_active: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlaggedMessage {
    pub flag_id: i64,
    pub message_id: i64,
    pub message_text: String,
    pub room_id: i64,
    pub message_author_id: i64,
    pub message_author_username: String,
    pub flag_type: String,
    pub flag_reason: Option<String>,
    pub flagged_by_user_id: Option<i64>,
    pub flagged_by_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessageDetail {
    pub id: i64,
    pub room_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub message_text: String,
    pub was_censored: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModerationLogEntry {
    pub id: i64,
    pub action_type: ActionType,
    pub action_reason: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub related_message_id: Option<i64>,
    pub moderator_username: String,
}

/// A row to append to the moderation log.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub user_id: i64,
    pub action_type: ActionType,
    pub action_reason: String,
    pub moderator_id: i64,
    pub related_message_id: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// The most recent suspension logged for a user.
#[derive(Debug, Clone)]
pub struct SuspensionRecord {
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub summary: UserSearchResult,
    pub recent_messages: Vec<ChatMessageDetail>,
    pub moderation_history: Vec<ModerationLogEntry>,
    pub is_suspended: bool,
    pub suspension_expires: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFlaggedUser {
    pub user_id: i64,
    pub username: String,
    pub flag_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModerationStats {
    pub pending_flags: i64,
    pub total_warnings_today: i64,
    pub total_suspensions_today: i64,
    pub active_suspensions: i64,
    pub messages_deleted_today: i64,
    pub top_flagged_users: Vec<TopFlaggedUser>,
}

/// A flag joined with what is left of its message.
/// `room_id` and `message_created_at` are `None` once the message is gone.
#[derive(Debug, Clone, Serialize)]
pub struct FlagDetail {
    pub flag_id: i64,
    pub message_id: i64,
    pub message_author_id: i64,
    pub flag_type: String,
    pub flag_reason: Option<String>,
    pub flag_details: Option<String>,
    pub status: FlagStatus,
    pub room_id: Option<i64>,
    pub message_created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlagContext {
    pub flag_info: FlagDetail,
    pub context_messages: Vec<ChatMessageDetail>,
    pub flagged_message_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewFlag {
    pub message_id: i64,
    pub message_user_id: i64,
    pub flag_type: String,
    pub flag_reason: Option<String>,
    pub flag_details: Option<String>,
    pub flagged_by_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Review decision written onto a flag.
#[derive(Debug, Clone)]
pub struct FlagReview {
    pub status: FlagStatus,
    pub action_taken: Option<ActionType>,
    pub reviewer_id: i64,
    pub admin_notes: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Request body for adding a profanity filter.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProfanityFilter {
    pub word: String,
    pub severity: Severity,
    #[serde(default)]
    pub auto_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfanityFilter {
    pub id: i64,
    pub word_or_phrase: String,
    pub severity: Severity,
    pub auto_delete: bool,
    pub added_by_admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of the automatic flag check run on a new chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoFlagResult {
    pub flagged: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_id: Option<i64>,
    pub should_delete: bool,
    pub severity: Option<Severity>,
    pub found_word: Option<String>,
}

impl AutoFlagResult {
    /// Create a "nothing found" result
    pub fn clear() -> Self {
        Self {
            flagged: false,
            flag_id: None,
            should_delete: false,
            severity: None,
            found_word: None,
        }
    }
}

/// Response body for moderation actions.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_action_suggested: Option<ActionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
}

impl ActionOutcome {
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            warning_count: None,
            auto_action_suggested: None,
            expires_at: None,
            user_id: None,
            message_id: None,
        }
    }
}

/// Tunables for automatic flagging and warning escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Look-back window for the repeated-message check
    pub spam_window_secs: i64,
    /// Identical messages allowed in the window before flagging
    pub spam_max_repeats: u32,
    /// Warning count at which a suspension is suggested
    pub warnings_before_suspend: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            spam_window_secs: 300,
            spam_max_repeats: 3,
            warnings_before_suspend: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_username() {
        assert_eq!(display_name(Some("coachd"), "davis@joshua.org"), "coachd");
    }

    #[test]
    fn test_display_name_falls_back_to_email_local_part() {
        assert_eq!(display_name(None, "J.Miller@Example.com"), "j.miller");
        assert_eq!(display_name(Some("  "), "fan@example.com"), "fan");
    }

    #[test]
    fn test_severity_orders_worst_last() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(auto_flag_type(Severity::High), "auto_high");
    }

    #[test]
    fn test_moderation_action_parses_snake_case() {
        let action: ModerationAction = serde_json::from_str(
            r#"{"action_type": "delete_message", "reason": "slur"}"#,
        )
        .unwrap();
        assert_eq!(action.action_type, ActionType::DeleteMessage);
        assert!(action.duration_days.is_none());
    }
}
