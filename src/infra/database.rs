// Shared SQLite pool and schema.
//
// Every store works off one pool. Timestamps are stored as fixed-width
// RFC3339 text (microseconds, `Z` suffix) so string comparison in SQL
// matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        username TEXT UNIQUE,
        first_name TEXT,
        last_name TEXT,
        password_hash TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL DEFAULT 'fan',
        school TEXT,
        team_id INTEGER,
        account_status TEXT NOT NULL DEFAULT 'active',
        warning_count INTEGER NOT NULL DEFAULT 0,
        last_warning_at TEXT,
        last_active TEXT,
        created_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chat_messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id),
        message_text TEXT NOT NULL,
        was_censored BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_chat_messages_room ON chat_messages(room_id, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_chat_messages_user ON chat_messages(user_id, created_at);",
    r#"
    CREATE TABLE IF NOT EXISTS flagged_content (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        message_id INTEGER NOT NULL,
        message_user_id INTEGER NOT NULL,
        flag_type TEXT NOT NULL,
        flag_reason TEXT,
        flag_details TEXT,
        flagged_by_user_id INTEGER,
        status TEXT NOT NULL DEFAULT 'pending',
        action_taken TEXT,
        reviewed_by_admin_id INTEGER,
        reviewed_at TEXT,
        admin_notes TEXT,
        created_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_flagged_content_status ON flagged_content(status, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_flagged_content_message ON flagged_content(message_id);",
    r#"
    CREATE TABLE IF NOT EXISTS moderation_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        action_type TEXT NOT NULL,
        action_reason TEXT NOT NULL,
        moderator_id INTEGER NOT NULL,
        related_message_id INTEGER,
        expires_at TEXT,
        metadata TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_moderation_log_user ON moderation_log(user_id, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_moderation_log_action ON moderation_log(action_type, created_at);",
    r#"
    CREATE TABLE IF NOT EXISTS profanity_filters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        word_or_phrase TEXT NOT NULL UNIQUE,
        severity TEXT NOT NULL,
        auto_delete BOOLEAN NOT NULL DEFAULT 0,
        added_by_admin_id INTEGER,
        created_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        mascot TEXT,
        level TEXT NOT NULL DEFAULT 'HS',
        conference TEXT,
        classification TEXT,
        wins INTEGER NOT NULL DEFAULT 0,
        losses INTEGER NOT NULL DEFAULT 0
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        home_team_id INTEGER NOT NULL REFERENCES teams(id),
        away_team_id INTEGER NOT NULL REFERENCES teams(id),
        home_score INTEGER,
        away_score INTEGER,
        kickoff_at TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'scheduled',
        game_type TEXT NOT NULL DEFAULT 'regular'
    );
    "#,
];

/// Case-insensitive `LIKE` pattern matching `query` anywhere. Use with
/// `ESCAPE '\'` against a lowercased column.
pub fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Format a timestamp for storage.
pub fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp. A corrupt value is logged and read as the Unix
/// epoch so it can never pass for a recent event.
pub fn parse_ts(value: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::warn!(value, error = %e, "Unparseable timestamp in database");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

pub fn parse_opt_ts(value: Option<String>) -> Option<DateTime<Utc>> {
    value.as_deref().map(parse_ts)
}

/// Open (creating if needed) the database behind `url`.
pub async fn connect(url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create every table and index that does not exist yet.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

/// A migrated in-memory database. One connection, kept open, so every
/// query sees the same data.
#[cfg(test)]
pub async fn memory_pool() -> Pool<Sqlite> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    migrate(&pool).await.unwrap();
    pool
}

#[cfg(test)]
pub mod fixtures {
    use super::ts;
    use chrono::{DateTime, Utc};
    use sqlx::{Pool, Sqlite};

    pub async fn insert_user(
        pool: &Pool<Sqlite>,
        email: &str,
        username: Option<&str>,
        role: &str,
    ) -> i64 {
        sqlx::query(
            "INSERT INTO users (email, username, role, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(username)
        .bind(role)
        .bind(ts(Utc::now()))
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    pub async fn insert_message(
        pool: &Pool<Sqlite>,
        room_id: i64,
        user_id: i64,
        text: &str,
        at: DateTime<Utc>,
    ) -> i64 {
        sqlx::query(
            "INSERT INTO chat_messages (room_id, user_id, message_text, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(room_id)
        .bind(user_id)
        .bind(text)
        .bind(ts(at))
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    pub async fn insert_team(pool: &Pool<Sqlite>, name: &str, classification: &str) -> i64 {
        sqlx::query("INSERT INTO teams (name, classification) VALUES (?, ?)")
            .bind(name)
            .bind(classification)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }
}
