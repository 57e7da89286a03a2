//! SQLite-backed conversation state store.
//!
//! One row per (user, chat). `save` upserts, so the latest write wins.

use async_trait::async_trait;
use statebot_core::{ConversationKey, ConversationState, ConversationStateStore};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::ConversationRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteStateStore {
    pool_manager: SqlitePoolManager,
}

impl SqliteStateStore {
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let store = Self { pool_manager };
        store.init().await?;
        Ok(store)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating conversation_states table if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversation_states (
                user_id INTEGER NOT NULL,
                chat_id INTEGER NOT NULL,
                state TEXT NOT NULL,
                state_data TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, chat_id)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_conversation_states_state \
             ON conversation_states(state)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Raw row for `key`, including the last update time.
    pub async fn record(
        &self,
        key: ConversationKey,
    ) -> Result<Option<ConversationRecord>, StorageError> {
        let record = sqlx::query_as::<_, ConversationRecord>(
            r#"
            SELECT user_id, chat_id, state, state_data, updated_at
            FROM conversation_states
            WHERE user_id = ? AND chat_id = ?
            "#,
        )
        .bind(key.user_id)
        .bind(key.chat_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(record)
    }

    /// Keys of every conversation currently in `state`, oldest update first.
    pub async fn find_by_state(&self, state: &str) -> Result<Vec<ConversationKey>, StorageError> {
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT user_id, chat_id
            FROM conversation_states
            WHERE state = ?
            ORDER BY updated_at ASC
            "#,
        )
        .bind(state)
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, chat_id)| ConversationKey::new(user_id, chat_id))
            .collect())
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversation_states")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    async fn load_state(
        &self,
        key: ConversationKey,
    ) -> Result<Option<ConversationState>, StorageError> {
        let Some(record) = self.record(key).await? else {
            return Ok(None);
        };
        record
            .to_state()
            .map(Some)
            .map_err(|source| StorageError::CorruptData {
                user_id: key.user_id,
                chat_id: key.chat_id,
                source,
            })
    }

    async fn save_state(
        &self,
        key: ConversationKey,
        state: &ConversationState,
    ) -> Result<(), StorageError> {
        let record = ConversationRecord::new(key, state)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_states (user_id, chat_id, state, state_data, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, chat_id) DO UPDATE SET
                state = excluded.state,
                state_data = excluded.state_data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.user_id)
        .bind(record.chat_id)
        .bind(&record.state)
        .bind(&record.state_data)
        .bind(record.updated_at)
        .execute(self.pool_manager.pool())
        .await?;

        debug!(
            user_id = key.user_id,
            chat_id = key.chat_id,
            state = %record.state,
            "Saved conversation state"
        );
        Ok(())
    }

    async fn delete_state(&self, key: ConversationKey) -> Result<bool, StorageError> {
        let result =
            sqlx::query("DELETE FROM conversation_states WHERE user_id = ? AND chat_id = ?")
                .bind(key.user_id)
                .bind(key.chat_id)
                .execute(self.pool_manager.pool())
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ConversationStateStore for SqliteStateStore {
    async fn load(&self, key: ConversationKey) -> statebot_core::Result<Option<ConversationState>> {
        Ok(self.load_state(key).await?)
    }

    async fn save(
        &self,
        key: ConversationKey,
        state: &ConversationState,
    ) -> statebot_core::Result<()> {
        Ok(self.save_state(key, state).await?)
    }

    async fn delete(&self, key: ConversationKey) -> statebot_core::Result<bool> {
        Ok(self.delete_state(key).await?)
    }
}
