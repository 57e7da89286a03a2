//! # statebot-cli
//!
//! Life-event tracker bot: button family, handlers, and the runner that wires
//! SQLite state, the Telegram adapter and the poller together.

pub mod cli;
pub mod events;
mod runner;

pub use cli::{load_config, Cli, Commands};
pub use runner::{build_router, run_bot, PRIVATE_ONLY_REJECTION};
