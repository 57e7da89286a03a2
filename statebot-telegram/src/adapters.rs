//! Adapters from Telegram (teloxide) types to statebot_core types.
//! Depends only on teloxide and statebot_core type definitions.

use statebot_core::{
    CallbackQuery, Chat, ChatType, Document, Message, ToCoreCallback, ToCoreMessage, ToCoreUser,
    Update, User,
};
use teloxide::types::{MaybeInaccessibleMessage, UpdateKind};

/// Wraps a teloxide User for conversion to core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Wraps a teloxide Chat for conversion to core [`Chat`].
pub struct TelegramChatWrapper<'a>(pub &'a teloxide::types::Chat);

impl<'a> TelegramChatWrapper<'a> {
    pub fn to_core(&self) -> Chat {
        let chat = self.0;
        let chat_type = if chat.is_private() {
            ChatType::Private
        } else if chat.is_supergroup() {
            ChatType::Supergroup
        } else if chat.is_group() {
            ChatType::Group
        } else {
            ChatType::Channel
        };
        Chat {
            id: chat.id.0,
            chat_type,
        }
    }
}

/// Wraps a teloxide Message for conversion to core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let content = msg.text().or_else(|| msg.caption()).unwrap_or("");
        Message {
            id: msg.id.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: TelegramChatWrapper(&msg.chat).to_core(),
            content: content.to_string(),
            document: msg.document().map(|doc| Document {
                file_id: doc.file.id.0.clone(),
                file_name: doc.file_name.clone(),
                mime_type: doc.mime_type.as_ref().map(|m| m.to_string()),
            }),
            created_at: msg.date,
        }
    }
}

/// Wraps a teloxide CallbackQuery for conversion to core [`CallbackQuery`].
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCoreCallback for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> CallbackQuery {
        let q = self.0;
        let user = TelegramUserWrapper(&q.from).to_core();
        let chat = q
            .message
            .as_ref()
            .map(|m| TelegramChatWrapper(m.chat()).to_core())
            .unwrap_or_else(|| Chat::private(user.id));
        let message_id = match q.message.as_ref() {
            Some(MaybeInaccessibleMessage::Regular(m)) => Some(m.id.to_string()),
            _ => None,
        };
        CallbackQuery {
            id: q.id.0.clone(),
            user,
            chat,
            message_id,
            data: q.data.clone(),
        }
    }
}

/// Converts a Telegram update into a core [`Update`]. Returns `None` for update kinds
/// the router does not handle and for messages with neither text nor a document.
pub fn to_core_update(update: &teloxide::types::Update) -> Option<Update> {
    match &update.kind {
        UpdateKind::Message(msg) if msg.text().is_some() || msg.document().is_some() => {
            Some(Update::Message(TelegramMessageWrapper(msg).to_core()))
        }
        UpdateKind::CallbackQuery(q) => {
            Some(Update::Callback(TelegramCallbackWrapper(q).to_core()))
        }
        _ => None,
    }
}
