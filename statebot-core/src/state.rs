//! Conversation state: which step of a multi-turn flow a (user, chat) pair is in,
//! plus opaque JSON data owned by that step.
//!
//! Stores are injected into the router. The router processes updates one at a
//! time, so writes for one key never race as long as nothing else writes
//! concurrently; other writers must bring their own locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::Result;

/// Store key: one conversation per user per chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub user_id: i64,
    pub chat_id: i64,
}

impl ConversationKey {
    pub fn new(user_id: i64, chat_id: i64) -> Self {
        Self { user_id, chat_id }
    }
}

/// Active state name plus its associated data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub state: String,
    #[serde(default)]
    pub data: Value,
}

impl ConversationState {
    /// Implicit entry state for users the store has never seen.
    pub const MAIN: &'static str = "MAIN";

    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            data: Value::Null,
        }
    }

    pub fn with_data<T: Serialize>(state: impl Into<String>, data: &T) -> Result<Self> {
        Ok(Self {
            state: state.into(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Replaces the data and keeps the state name.
    pub fn set_data<T: Serialize>(&mut self, data: &T) -> Result<()> {
        self.data = serde_json::to_value(data)?;
        Ok(())
    }

    pub fn is(&self, state: &str) -> bool {
        self.state == state
    }

    /// Deserializes the data; `None` when no data is attached.
    pub fn data<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        if self.data.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(self.data.clone())?))
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(Self::MAIN)
    }
}

/// Persistence for conversation state.
#[async_trait]
pub trait ConversationStateStore: Send + Sync {
    /// Returns the stored state, or `None` for an unknown key.
    async fn load(&self, key: ConversationKey) -> Result<Option<ConversationState>>;

    /// Replaces the state for `key`.
    async fn save(&self, key: ConversationKey, state: &ConversationState) -> Result<()>;

    /// Forgets `key`. Returns whether anything was stored.
    async fn delete(&self, key: ConversationKey) -> Result<bool>;
}

/// Map-backed store for tests and single-process bots. Data is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    states: Arc<RwLock<HashMap<ConversationKey, ConversationState>>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ConversationStateStore for InMemoryStateStore {
    async fn load(&self, key: ConversationKey) -> Result<Option<ConversationState>> {
        Ok(self.states.read().await.get(&key).cloned())
    }

    async fn save(&self, key: ConversationKey, state: &ConversationState) -> Result<()> {
        self.states.write().await.insert(key, state.clone());
        Ok(())
    }

    async fn delete(&self, key: ConversationKey) -> Result<bool> {
        Ok(self.states.write().await.remove(&key).is_some())
    }
}
