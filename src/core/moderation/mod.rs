// Core moderation module - chat moderation business logic.
// Models, the profanity matcher and the service over a storage port.

pub mod moderation_models;
pub mod moderation_service;
pub mod profanity;

pub use moderation_models::*;
pub use moderation_service::*;
