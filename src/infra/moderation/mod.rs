// Moderation store implementations.

pub mod sqlite_moderation_store;

pub use sqlite_moderation_store::SqliteModerationStore;
