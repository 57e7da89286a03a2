//! Storage crate: SQLite persistence for conversation state.
//!
//! ## Modules
//!
//! - [`error`] – StorageError and its conversion into the core error
//! - [`models`] – ConversationRecord (one row per user and chat)
//! - [`state_repo`] – SqliteStateStore
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod sqlite_pool;
mod state_repo;

pub use error::StorageError;
pub use models::ConversationRecord;
pub use sqlite_pool::SqlitePoolManager;
pub use state_repo::SqliteStateStore;
