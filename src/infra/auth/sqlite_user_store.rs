// SQLite-backed user store for registration and login.

use crate::core::auth::{AuthError, NewUser, StoredUser, UserStore};
use crate::core::moderation::{AccountStatus, Role};
use crate::infra::database::{parse_ts, ts};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

const USER_SELECT: &str = r#"
    SELECT id, email, username, first_name, last_name, password_hash, role,
           school, team_id, account_status, created_at
    FROM users
"#;

fn user_from_row(row: &SqliteRow) -> StoredUser {
    StoredUser {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        password_hash: row.get("password_hash"),
        role: Role::parse(row.get("role")).unwrap_or(Role::Fan),
        school: row.get("school"),
        team_id: row.get("team_id"),
        account_status: AccountStatus::parse(row.get("account_status"))
            .unwrap_or(AccountStatus::Active),
        created_at: parse_ts(row.get("created_at")),
    }
}

pub struct SqliteUserStore {
    pool: Pool<Sqlite>,
}

impl SqliteUserStore {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<StoredUser>, AuthError> {
        let sql = format!("{} WHERE lower(email) = lower(?) OR username = ?", USER_SELECT);
        let row = sqlx::query(&sql)
            .bind(login)
            .bind(login)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
        let sql = format!("{} WHERE lower(email) = lower(?)", USER_SELECT);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn email_or_username_taken(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, AuthError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE lower(email) = lower(?) OR username = ?",
        )
        .bind(email)
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::StorageError(e.to_string()))?;
        Ok(count > 0)
    }

    async fn insert_user(&self, user: NewUser) -> Result<StoredUser, AuthError> {
        let id = sqlx::query(
            r#"
            INSERT INTO users (
                email, username, first_name, last_name, password_hash,
                role, team_id, account_status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?)
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.team_id)
        .bind(ts(user.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::AlreadyRegistered,
            other => AuthError::StorageError(other.to_string()),
        })?
        .last_insert_rowid();

        Ok(StoredUser {
            id,
            email: user.email,
            username: Some(user.username),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            password_hash: user.password_hash,
            role: user.role,
            school: None,
            team_id: user.team_id,
            account_status: AccountStatus::Active,
            created_at: user.created_at,
        })
    }

    async fn touch_last_active(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET last_active = ? WHERE id = ?")
            .bind(ts(at))
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;
        Ok(())
    }
}
