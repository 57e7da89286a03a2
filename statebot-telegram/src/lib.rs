//! # statebot-telegram
//!
//! Telegram layer: adapters to [`statebot_core`] types, [`statebot_core::Bot`] implementation,
//! a `getUpdates` [`handler_router::UpdateSource`], and env config.
//! No routing or persistence logic lives here.

mod adapters;
mod bot_adapter;
mod config;
mod update_source;

pub use adapters::{
    to_core_update, TelegramCallbackWrapper, TelegramChatWrapper, TelegramMessageWrapper,
    TelegramUserWrapper,
};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use update_source::TelegramUpdateSource;
