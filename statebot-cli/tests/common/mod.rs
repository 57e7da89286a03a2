//! Fixtures for end-to-end tests of the tracker: a recording bot that keeps the
//! last keyboard around so tests can press its buttons, and update builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use statebot_core::{
    Bot, CallbackQuery, Chat, ChatType, Document, InlineKeyboard, Message, Result, Update, User,
};

pub const USER_ID: i64 = 42;

/// One outbound call; answers have no keyboard and `edited` marks edits.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub text: String,
    pub keyboard: Option<InlineKeyboard>,
    pub edited: bool,
    pub answer: bool,
}

#[derive(Default)]
pub struct RecordingBot {
    outbound: Mutex<Vec<Outbound>>,
}

impl RecordingBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn outbound(&self) -> Vec<Outbound> {
        self.outbound.lock().unwrap().clone()
    }

    /// Text of the last message sent or edited (answers excluded).
    pub fn last_text(&self) -> String {
        self.outbound()
            .into_iter()
            .rev()
            .find(|o| !o.answer)
            .map(|o| o.text)
            .unwrap_or_default()
    }

    pub fn last_answer(&self) -> Option<String> {
        self.outbound()
            .into_iter()
            .rev()
            .find(|o| o.answer)
            .map(|o| o.text)
    }

    /// Callback update for the button labelled `label` on the most recent keyboard.
    pub fn press(&self, label: &str) -> Update {
        let keyboard = self
            .outbound()
            .into_iter()
            .rev()
            .find_map(|o| o.keyboard)
            .expect("no keyboard was sent");
        let button = keyboard
            .buttons()
            .find(|b| b.text.contains(label))
            .unwrap_or_else(|| panic!("no button labelled {:?} in {:?}", label, keyboard));
        callback(&button.callback_data)
    }

    fn push(&self, text: &str, keyboard: Option<&InlineKeyboard>, edited: bool, answer: bool) {
        self.outbound.lock().unwrap().push(Outbound {
            text: text.to_string(),
            keyboard: keyboard.cloned(),
            edited,
            answer,
        });
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, _chat: &Chat, text: &str) -> Result<()> {
        self.push(text, None, false, false);
        Ok(())
    }

    async fn send_keyboard(
        &self,
        _chat: &Chat,
        text: &str,
        keyboard: &InlineKeyboard,
    ) -> Result<()> {
        self.push(text, Some(keyboard), false, false);
        Ok(())
    }

    async fn edit_message(
        &self,
        _chat: &Chat,
        _message_id: &str,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<()> {
        self.push(text, keyboard, true, false);
        Ok(())
    }

    async fn answer_callback(&self, _callback_id: &str, text: Option<&str>) -> Result<()> {
        self.push(text.unwrap_or_default(), None, false, true);
        Ok(())
    }
}

fn user() -> User {
    User {
        id: USER_ID,
        username: Some("ann".to_string()),
        first_name: Some("Ann".to_string()),
        last_name: None,
    }
}

pub fn text(content: &str) -> Update {
    Update::Message(Message {
        id: "1".to_string(),
        user: user(),
        chat: Chat::private(USER_ID),
        content: content.to_string(),
        document: None,
        created_at: Utc::now(),
    })
}

pub fn document() -> Update {
    Update::Message(Message {
        id: "2".to_string(),
        user: user(),
        chat: Chat::private(USER_ID),
        content: String::new(),
        document: Some(Document {
            file_id: "F1".to_string(),
            file_name: Some("scan.pdf".to_string()),
            mime_type: Some("application/pdf".to_string()),
        }),
        created_at: Utc::now(),
    })
}

pub fn group_text(content: &str) -> Update {
    Update::Message(Message {
        id: "3".to_string(),
        user: user(),
        chat: Chat {
            id: -500,
            chat_type: ChatType::Supergroup,
        },
        content: content.to_string(),
        document: None,
        created_at: Utc::now(),
    })
}

pub fn callback(data: &str) -> Update {
    Update::Callback(CallbackQuery {
        id: "cb".to_string(),
        user: user(),
        chat: Chat::private(USER_ID),
        message_id: Some("100".to_string()),
        data: Some(data.to_string()),
    })
}
