//! Bot abstraction for sending messages, keyboards and callback acknowledgements.
//!
//! [`Bot`] is transport-agnostic; statebot-telegram implements it via teloxide and
//! tests substitute a recording mock.

use crate::error::Result;
use crate::types::{Chat, InlineKeyboard};
use async_trait::async_trait;

/// Outbound operations used by handlers. Failures are returned as [`crate::StatebotError::Bot`].
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a text message with an inline keyboard.
    async fn send_keyboard(&self, chat: &Chat, text: &str, keyboard: &InlineKeyboard) -> Result<()>;

    /// Replaces text and keyboard of an already-sent message. `message_id` is transport-specific.
    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()>;

    /// Acknowledges a callback query, optionally with a toast text.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
