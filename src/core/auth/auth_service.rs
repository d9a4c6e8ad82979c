// Auth service - account registration, password login and JWT bearer tokens.

use super::auth_models::{Claims, NewUser, RegisterRequest, StoredUser, Token, UserResponse};
use super::password::{hash_password, verify_password, MAX_PASSWORD_BYTES};
use crate::core::moderation::Role;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
});
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.]{3,30}$").expect("valid username regex"));

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Email or username already registered")]
    AlreadyRegistered,

    #[error("Incorrect email/username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Token error: {0}")]
    TokenError(String),

    #[error("Password hashing failed: {0}")]
    HashError(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look a user up by email or username.
    async fn find_by_login(&self, login: &str) -> Result<Option<StoredUser>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, AuthError>;

    async fn email_or_username_taken(&self, email: &str, username: &str)
        -> Result<bool, AuthError>;

    async fn insert_user(&self, user: NewUser) -> Result<StoredUser, AuthError>;

    async fn touch_last_active(&self, user_id: i64, at: DateTime<Utc>) -> Result<(), AuthError>;
}

pub struct AuthService<S: UserStore> {
    store: S,
    secret: String,
    token_ttl: Duration,
}

impl<S: UserStore> AuthService<S> {
    pub fn new(store: S, secret: impl Into<String>, token_ttl_minutes: i64) -> Self {
        Self {
            store,
            secret: secret.into(),
            token_ttl: Duration::minutes(token_ttl_minutes),
        }
    }

    fn validate(request: &RegisterRequest) -> Result<(), AuthError> {
        if !EMAIL_RE.is_match(request.email.trim()) {
            return Err(AuthError::InvalidInput("A valid email is required".to_string()));
        }
        if !USERNAME_RE.is_match(request.username.trim()) {
            return Err(AuthError::InvalidInput(
                "Username must be 3-30 letters, digits, '_' or '.'".to_string(),
            ));
        }
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "First and last name are required".to_string(),
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }
        if request.password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        if request.role == Role::Admin {
            return Err(AuthError::InvalidInput(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AuthError> {
        Self::validate(&request)?;
        let email = request.email.trim().to_lowercase();
        let username = request.username.trim().to_string();

        if self.store.email_or_username_taken(&email, &username).await? {
            return Err(AuthError::AlreadyRegistered);
        }

        let password_hash = hash_password(&request.password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                email,
                username,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                password_hash,
                role: request.role,
                team_id: request.team_id,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = user.id, role = user.role.as_str(), "User registered");
        Ok(user.into())
    }

    pub async fn login(&self, login: &str, password: &str) -> Result<Token, AuthError> {
        let user = match self.store.find_by_login(login.trim()).await? {
            Some(user) if verify_password(password, &user.password_hash).await => user,
            _ => {
                tracing::debug!(login = %login, "Failed login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.store.touch_last_active(user.id, Utc::now()).await?;

        Ok(Token {
            access_token: self.issue_token(&user.email)?,
            token_type: "bearer".to_string(),
        })
    }

    pub fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// The email a valid, unexpired token was issued for.
    pub fn token_subject(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| AuthError::Unauthorized)?;
        Ok(data.claims.sub)
    }

    /// Resolve the user behind a bearer token.
    pub async fn authenticate(&self, token: &str) -> Result<StoredUser, AuthError> {
        let email = self.token_subject(token)?;
        self.store
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)
    }
}
