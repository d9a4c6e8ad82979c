// Route catalog - one router per feature, nested by the API layer.

pub mod auth;
pub mod chat;
pub mod content;
pub mod moderation;
