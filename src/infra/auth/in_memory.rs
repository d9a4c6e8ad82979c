// In-memory UserStore for service tests.

use crate::core::auth::{AuthError, NewUser, StoredUser, UserStore};
use crate::core::moderation::AccountStatus;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct InMemoryUserStore {
    /// Maps user id -> user
    users: DashMap<i64, StoredUser>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn find(&self, pred: impl Fn(&StoredUser) -> bool) -> Option<StoredUser> {
        self.users
            .iter()
            .find(|entry| pred(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.find(|u| {
            u.email.eq_ignore_ascii_case(login) || u.username.as_deref() == Some(login)
        }))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError> {
        Ok(self.find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    async fn email_or_username_taken(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, AuthError> {
        Ok(self
            .find(|u| u.email.eq_ignore_ascii_case(email) || u.username.as_deref() == Some(username))
            .is_some())
    }

    async fn insert_user(&self, user: NewUser) -> Result<StoredUser, AuthError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = StoredUser {
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
        };
        self.users.insert(id, stored.clone());
        Ok(stored)
    }

    async fn touch_last_active(&self, _user_id: i64, _at: DateTime<Utc>) -> Result<(), AuthError> {
        Ok(())
    }
}
