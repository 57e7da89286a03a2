//! Mock implementation of [`statebot_core::Bot`] that records every outbound call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use statebot_core::{Bot, Chat, InlineKeyboard, Result, StatebotError};

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Message {
        chat_id: i64,
        text: String,
    },
    Keyboard {
        chat_id: i64,
        text: String,
        keyboard: InlineKeyboard,
    },
    Edit {
        chat_id: i64,
        message_id: String,
        text: String,
        keyboard: Option<InlineKeyboard>,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
    },
}

#[derive(Default)]
pub struct MockBot {
    sent: Mutex<Vec<Sent>>,
    fail_sends: AtomicBool,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every send / edit fail with a bot error (answers still succeed).
    pub fn fail_sends(&self) {
        self.fail_sends.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn answers(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Answer { .. }))
            .collect()
    }

    fn record(&self, sent: Sent) -> Result<()> {
        let is_answer = matches!(sent, Sent::Answer { .. });
        if !is_answer && self.fail_sends.load(Ordering::SeqCst) {
            return Err(StatebotError::Bot("send failed".to_string()));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.record(Sent::Message {
            chat_id: chat.id,
            text: text.to_string(),
        })
    }

    async fn send_keyboard(
        &self,
        chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.record(Sent::Keyboard {
            chat_id: chat.id,
            text: text.to_string(),
            keyboard: keyboard.clone(),
        })
    }

    async fn edit_message(
        &self,
        chat: &Chat,
        message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.record(Sent::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        })
    }

    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.record(Sent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(str::to_string),
        })
    }
}
