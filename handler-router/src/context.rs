//! Per-update context handed to handlers: who, where, what, and the conversation state.

use std::sync::Arc;

use callback_codec::Registry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use statebot_core::{
    Bot, CallbackQuery, Chat, ConversationKey, ConversationState, HandlerError, InlineButton,
    InlineKeyboard, Message, Result, User,
};
use tracing::debug;

use crate::route::Payload;

/// Inbound event with its decoded button payload.
#[derive(Debug, Clone)]
pub enum Event<B> {
    Message(Message),
    Callback {
        query: CallbackQuery,
        /// `None` when the callback carried no data or its id is not registered.
        payload: Option<B>,
    },
}

/// Typed context for one update. Built by the router, mutated by exactly one handler.
pub struct Context<B: Payload> {
    pub user: User,
    pub chat: Chat,
    pub event: Event<B>,
    conversation: ConversationState,
    state_changed: bool,
    answered: bool,
    bot: Arc<dyn Bot>,
    registry: Arc<Registry<B>>,
}

impl<B: Payload> Context<B> {
    pub fn new(
        user: User,
        chat: Chat,
        event: Event<B>,
        conversation: ConversationState,
        bot: Arc<dyn Bot>,
        registry: Arc<Registry<B>>,
    ) -> Self {
        Self {
            user,
            chat,
            event,
            conversation,
            state_changed: false,
            answered: false,
            bot,
            registry,
        }
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey::new(self.user.id, self.chat.id)
    }

    pub fn bot(&self) -> &Arc<dyn Bot> {
        &self.bot
    }

    pub fn registry(&self) -> &Registry<B> {
        &self.registry
    }

    // --- event accessors ---

    pub fn message(&self) -> Option<&Message> {
        match &self.event {
            Event::Message(m) => Some(m),
            Event::Callback { .. } => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.message().and_then(Message::text)
    }

    pub fn callback(&self) -> Option<&CallbackQuery> {
        match &self.event {
            Event::Callback { query, .. } => Some(query),
            Event::Message(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&B> {
        match &self.event {
            Event::Callback { payload, .. } => payload.as_ref(),
            Event::Message(_) => None,
        }
    }

    /// Payload or [`HandlerError::MissingPayload`], for handlers bound to a button kind.
    pub fn require_payload(&self) -> Result<&B> {
        self.payload()
            .ok_or_else(|| HandlerError::MissingPayload.into())
    }

    // --- conversation state ---

    pub fn state(&self) -> &str {
        &self.conversation.state
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn data<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.conversation.data()
    }

    /// Whether a handler changed state or data during this update.
    pub fn state_changed(&self) -> bool {
        self.state_changed
    }

    /// Switches to `state` and drops the current data.
    pub fn set_state(&mut self, state: impl Into<String>) {
        self.conversation = ConversationState::new(state);
        self.state_changed = true;
    }

    /// Switches to `state` and keeps the current data.
    pub fn set_state_keep_data(&mut self, state: impl Into<String>) {
        self.conversation.state = state.into();
        self.state_changed = true;
    }

    /// Switches to `state` with new data.
    pub fn set_state_with<T: Serialize>(
        &mut self,
        state: impl Into<String>,
        data: &T,
    ) -> Result<()> {
        self.conversation = ConversationState::with_data(state, data)?;
        self.state_changed = true;
        Ok(())
    }

    /// Replaces the data and keeps the state.
    pub fn set_data<T: Serialize>(&mut self, data: &T) -> Result<()> {
        self.conversation.set_data(data)?;
        self.state_changed = true;
        Ok(())
    }

    // --- outbound ---

    /// Encodes buttons into an inline keyboard through the registry.
    pub fn keyboard<S: Into<String>>(&self, rows: Vec<Vec<(S, B)>>) -> Result<InlineKeyboard> {
        let mut keyboard = Vec::with_capacity(rows.len());
        for row in rows {
            let mut buttons = Vec::with_capacity(row.len());
            for (text, payload) in row {
                buttons.push(InlineButton {
                    text: text.into(),
                    callback_data: self.registry.encode(&payload)?,
                });
            }
            keyboard.push(buttons);
        }
        Ok(InlineKeyboard::new(keyboard))
    }

    pub async fn reply(&self, text: &str) -> Result<()> {
        self.bot.send_message(&self.chat, text).await
    }

    pub async fn reply_with_buttons<S: Into<String>>(
        &self,
        text: &str,
        rows: Vec<Vec<(S, B)>>,
    ) -> Result<()> {
        let keyboard = self.keyboard(rows)?;
        self.bot.send_keyboard(&self.chat, text, &keyboard).await
    }

    /// Edits the message carrying the pressed keyboard; sends a new message when
    /// there is nothing to edit (plain message update or inaccessible message).
    pub async fn edit_with_buttons<S: Into<String>>(
        &self,
        text: &str,
        rows: Vec<Vec<(S, B)>>,
    ) -> Result<()> {
        let keyboard = self.keyboard(rows)?;
        match self.callback().and_then(|q| q.message_id.as_deref()) {
            Some(message_id) => {
                self.bot
                    .edit_message(&self.chat, message_id, text, Some(&keyboard))
                    .await
            }
            None => self.bot.send_keyboard(&self.chat, text, &keyboard).await,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// Acknowledges the callback query. Only the first call per update reaches
    /// the bot; later calls and calls on message updates return `Ok(false)`.
    pub async fn answer(&mut self, text: Option<&str>) -> Result<bool> {
        if self.answered {
            debug!(user_id = self.user.id, "Callback already answered");
            return Ok(false);
        }
        let Some(callback_id) = self.callback().map(|q| q.id.clone()) else {
            return Ok(false);
        };
        self.answered = true;
        self.bot.answer_callback(&callback_id, text).await?;
        Ok(true)
    }
}
