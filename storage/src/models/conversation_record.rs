//! Row model for the `conversation_states` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statebot_core::{ConversationKey, ConversationState};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationRecord {
    pub user_id: i64,
    pub chat_id: i64,
    pub state: String,
    /// JSON text of the state data; `null` when the state has none.
    pub state_data: String,
    pub updated_at: DateTime<Utc>,
}

impl ConversationRecord {
    /// Builds a record stamped with the current time.
    pub fn new(key: ConversationKey, state: &ConversationState) -> Result<Self, serde_json::Error> {
        Ok(Self {
            user_id: key.user_id,
            chat_id: key.chat_id,
            state: state.state.clone(),
            state_data: serde_json::to_string(&state.data)?,
            updated_at: Utc::now(),
        })
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey::new(self.user_id, self.chat_id)
    }

    pub fn to_state(&self) -> Result<ConversationState, serde_json::Error> {
        Ok(ConversationState {
            state: self.state.clone(),
            data: serde_json::from_str(&self.state_data)?,
        })
    }
}
