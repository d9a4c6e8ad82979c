// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "database.rs"]
pub mod database;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "chat/sqlite_chat_store.rs"]
pub mod chat;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "imports/sqlite_game_store.rs"]
pub mod imports;

#[path = "email/log_mailer.rs"]
pub mod email;
