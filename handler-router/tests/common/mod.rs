//! Shared fixtures for router and poller tests: a recording [`MockBot`], a small
//! button family, and update builders.

#![allow(dead_code)]

pub mod mock_bot;

use callback_codec::{BitBuffer, BufferError, Primitives, Registry, Variant};
use chrono::Utc;
use statebot_core::{CallbackQuery, Chat, ChatType, Document, Message, Update, User};

#[derive(Debug, Clone, PartialEq)]
pub enum TestButton {
    Foo { count: i32 },
    Bar,
    Unlisted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
    Foo,
    Bar,
    Unlisted,
}

impl Variant for TestButton {
    type Kind = TestKind;

    fn kind(&self) -> TestKind {
        match self {
            TestButton::Foo { .. } => TestKind::Foo,
            TestButton::Bar => TestKind::Bar,
            TestButton::Unlisted => TestKind::Unlisted,
        }
    }

    fn write_fields(&self, buf: &mut BitBuffer) -> Result<(), BufferError> {
        match self {
            TestButton::Foo { count } => buf.push_int(*count),
            TestButton::Bar | TestButton::Unlisted => Ok(()),
        }
    }
}

/// Foo → 0x01, Bar → 0x02; Unlisted stays unregistered.
pub fn registry() -> Registry<TestButton> {
    Registry::new()
        .register(0x01, TestKind::Foo, |buf| {
            Ok(TestButton::Foo {
                count: buf.pop_int()?,
            })
        })
        .unwrap()
        .register(0x02, TestKind::Bar, |_| Ok(TestButton::Bar))
        .unwrap()
}

pub const USER_ID: i64 = 123;

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some("test_user".to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

pub fn text_update(text: &str) -> Update {
    Update::Message(Message {
        id: "test_message_id".to_string(),
        user: user(USER_ID),
        chat: Chat::private(USER_ID),
        content: text.to_string(),
        document: None,
        created_at: Utc::now(),
    })
}

pub fn document_update(file_name: &str) -> Update {
    Update::Message(Message {
        id: "doc_message_id".to_string(),
        user: user(USER_ID),
        chat: Chat::private(USER_ID),
        content: String::new(),
        document: Some(Document {
            file_id: "file-1".to_string(),
            file_name: Some(file_name.to_string()),
            mime_type: None,
        }),
        created_at: Utc::now(),
    })
}

pub fn group_text_update(text: &str) -> Update {
    Update::Message(Message {
        id: "group_message_id".to_string(),
        user: user(USER_ID),
        chat: Chat {
            id: -100,
            chat_type: ChatType::Group,
        },
        content: text.to_string(),
        document: None,
        created_at: Utc::now(),
    })
}

pub fn callback_update(data: Option<String>) -> Update {
    Update::Callback(CallbackQuery {
        id: "cb-1".to_string(),
        user: user(USER_ID),
        chat: Chat::private(USER_ID),
        message_id: Some("42".to_string()),
        data,
    })
}

/// Callback update carrying `button` encoded through [`registry`].
pub fn button_update(button: &TestButton) -> Update {
    callback_update(Some(registry().encode(button).unwrap()))
}
