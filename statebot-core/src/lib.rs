//! # statebot-core
//!
//! Core types and traits shared by every bot: [`Bot`], message / callback / update types,
//! inline keyboards, conversation state and its store, errors, and tracing initialization.
//! Transport-agnostic; used by handler-router, storage and statebot-telegram.

pub mod bot;
pub mod error;
pub mod logger;
pub mod state;
pub mod types;

pub use bot::Bot;
pub use error::{HandlerError, Result, StatebotError};
pub use logger::init_tracing;
pub use state::{ConversationKey, ConversationState, ConversationStateStore, InMemoryStateStore};
pub use types::{
    CallbackQuery, Chat, ChatType, Document, InlineButton, InlineKeyboard, Message, ToCoreCallback,
    ToCoreMessage, ToCoreUser, Update, User,
};
