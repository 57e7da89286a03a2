//! Core types: user, chat, message, callback query, update, and inline keyboards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User identity (id, username, names).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatType {
    Private,
    Group,
    Supergroup,
    Channel,
}

/// Chat (private, group or channel) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: ChatType,
}

impl Chat {
    pub fn private(id: i64) -> Self {
        Self {
            id,
            chat_type: ChatType::Private,
        }
    }

    pub fn is_private(&self) -> bool {
        self.chat_type == ChatType::Private
    }
}

/// File attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
}

/// Inbound message: text and/or a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Message text or document caption; empty when absent.
    pub content: String,
    pub document: Option<Document>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Text of the message, if any.
    pub fn text(&self) -> Option<&str> {
        if self.content.is_empty() {
            None
        } else {
            Some(&self.content)
        }
    }

    /// Command name without the leading slash or `@botname` suffix, e.g. `start` for
    /// `/start@my_bot now`.
    pub fn command(&self) -> Option<&str> {
        let first = self.text()?.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        (!name.is_empty()).then_some(name)
    }
}

/// Inline-keyboard button press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub user: User,
    /// Chat of the message carrying the keyboard; falls back to the user's private chat.
    pub chat: Chat,
    /// Id of the message carrying the keyboard, when Telegram still has it.
    pub message_id: Option<String>,
    /// Raw callback data as echoed by Telegram.
    pub data: Option<String>,
}

/// One inbound event delivered by the update feed.
#[derive(Debug, Clone)]
pub enum Update {
    Message(Message),
    Callback(CallbackQuery),
}

impl Update {
    pub fn user(&self) -> &User {
        match self {
            Update::Message(m) => &m.user,
            Update::Callback(q) => &q.user,
        }
    }

    pub fn chat(&self) -> &Chat {
        match self {
            Update::Message(m) => &m.chat,
            Update::Callback(q) => &q.chat,
        }
    }
}

/// Button with already-encoded callback data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub callback_data: String,
}

/// Rows of inline buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

/// Converts a transport-specific user type to core [`User`].
pub trait ToCoreUser: Send + Sync {
    fn to_core(&self) -> User;
}

/// Converts a transport-specific message type to core [`Message`].
pub trait ToCoreMessage: Send + Sync {
    fn to_core(&self) -> Message;
}

/// Converts a transport-specific callback query to core [`CallbackQuery`].
pub trait ToCoreCallback: Send + Sync {
    fn to_core(&self) -> CallbackQuery;
}
