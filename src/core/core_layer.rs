// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "chat/chat_service.rs"]
pub mod chat;

#[path = "auth/mod.rs"]
pub mod auth;

#[path = "dashboard/dashboard_service.rs"]
pub mod dashboard;

#[path = "scores/scores_service.rs"]
pub mod scores;

#[path = "games/games_service.rs"]
pub mod games;

#[path = "players/roster.rs"]
pub mod players;

#[path = "playoffs/bracket.rs"]
pub mod playoffs;

#[path = "search/search_service.rs"]
pub mod search;

#[path = "imports/mod.rs"]
pub mod imports;

#[path = "email/email_service.rs"]
pub mod email;
