// Runtime configuration, read from the environment (and `.env`, loaded in main).

use crate::core::email::{
    EmailConfig, DEFAULT_BASE_URL, DEFAULT_FROM_EMAIL, DEFAULT_SUPPORT_EMAIL,
};
use crate::core::moderation::ModerationConfig;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/statiq.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60 * 24 * 7;

/// Longest look-back the repeated-message check may use (one day).
const MAX_SPAM_WINDOW_SECS: i64 = 86_400;
const MAX_SPAM_REPEATS: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Only `serve` needs it; operator commands run without one.
    pub jwt_secret: Option<String>,
    pub token_ttl_minutes: i64,
    pub moderation: ModerationConfig,
    pub email: EmailConfig,
}

fn var_or(name: &str, default: &str) -> Result<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Ok(_) => Err(anyhow!("{} is set but empty", name)),
        Err(_) => Ok(default.to_string()),
    }
}

fn parsed_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number, got {:?}", name, v)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = ModerationConfig::default();

        let jwt_secret = env::var("JWT_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let config = Self {
            database_url: var_or("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            bind_addr: var_or("BIND_ADDR", DEFAULT_BIND_ADDR)?,
            jwt_secret,
            token_ttl_minutes: parsed_or("ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?,
            moderation: ModerationConfig {
                spam_window_secs: parsed_or("SPAM_WINDOW_SECS", defaults.spam_window_secs)?,
                spam_max_repeats: parsed_or("SPAM_MAX_REPEATS", defaults.spam_max_repeats)?,
                warnings_before_suspend: parsed_or(
                    "WARNINGS_BEFORE_SUSPEND",
                    defaults.warnings_before_suspend,
                )?,
            },
            email: EmailConfig {
                from_email: var_or("STATIQ_FROM_EMAIL", DEFAULT_FROM_EMAIL)?,
                support_email: var_or("STATIQ_SUPPORT_EMAIL", DEFAULT_SUPPORT_EMAIL)?,
                base_url: var_or("STATIQ_BASE_URL", DEFAULT_BASE_URL)?,
            },
        };

        if config.token_ttl_minutes <= 0 {
            return Err(anyhow!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive"));
        }
        validate_moderation(&config.moderation)?;
        Ok(config)
    }

    pub fn require_jwt_secret(&self) -> Result<&str> {
        self.jwt_secret
            .as_deref()
            .ok_or_else(|| anyhow!("Missing JWT_SECRET environment variable! Add it to .env."))
    }
}

/// Reject tunables that would flag every message or never flag anything.
fn validate_moderation(moderation: &ModerationConfig) -> Result<()> {
    if !(1..=MAX_SPAM_WINDOW_SECS).contains(&moderation.spam_window_secs) {
        return Err(anyhow!(
            "SPAM_WINDOW_SECS must be between 1 and {}, got {}",
            MAX_SPAM_WINDOW_SECS,
            moderation.spam_window_secs
        ));
    }
    if !(1..=MAX_SPAM_REPEATS).contains(&moderation.spam_max_repeats) {
        return Err(anyhow!(
            "SPAM_MAX_REPEATS must be between 1 and {}, got {}",
            MAX_SPAM_REPEATS,
            moderation.spam_max_repeats
        ));
    }
    if moderation.warnings_before_suspend == 0 {
        return Err(anyhow!("WARNINGS_BEFORE_SUSPEND must be at least 1"));
    }
    Ok(())
}
