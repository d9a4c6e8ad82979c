// User store implementations.

#[cfg(test)]
pub mod in_memory;
pub mod sqlite_user_store;

pub use sqlite_user_store::SqliteUserStore;
