//! Wraps teloxide::Bot and implements [`statebot_core::Bot`]. Production code talks to Telegram;
//! tests substitute a recording Bot.

use async_trait::async_trait;
use statebot_core::{Bot as CoreBot, Chat, InlineKeyboard, Result, StatebotError};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQueryId, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId,
};

/// Thin wrapper around teloxide::Bot that implements statebot-core's Bot trait.
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide Bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.text.clone(), b.callback_data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn bot_error(e: teloxide::RequestError) -> StatebotError {
    StatebotError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn send_keyboard(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .reply_markup(markup(keyboard))
            .await
            .map_err(bot_error)?;
        Ok(())
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        let id: i32 = message_id.parse().map_err(|_| {
            StatebotError::Bot(format!("Invalid message_id for edit: {}", message_id))
        })?;
        let request = self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(id), text.to_string());
        match keyboard {
            Some(keyboard) => request.reply_markup(markup(keyboard)).await,
            None => request.await,
        }
        .map_err(bot_error)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        let request = self
            .bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()));
        match text {
            Some(text) => request.text(text.to_string()).await,
            None => request.await,
        }
        .map_err(bot_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statebot_core::InlineButton;

    #[test]
    fn test_markup_keeps_rows_and_callback_data() {
        let keyboard = InlineKeyboard::new(vec![
            vec![
                InlineButton {
                    text: "Add".to_string(),
                    callback_data: "AQ".to_string(),
                },
                InlineButton {
                    text: "List".to_string(),
                    callback_data: "Ag".to_string(),
                },
            ],
            vec![InlineButton {
                text: "Back".to_string(),
                callback_data: "Aw".to_string(),
            }],
        ]);

        let markup = markup(&keyboard);

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);
        assert_eq!(markup.inline_keyboard[0][1].text, "List");
        assert_eq!(markup.inline_keyboard[1][0].text, "Back");
    }
}
