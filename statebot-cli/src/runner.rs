//! Wires config, storage, Telegram and the router, then polls until Ctrl-C.

use std::sync::Arc;

use anyhow::Result;
use handler_router::{Poller, Router};
use statebot_core::{init_tracing, Bot, ConversationStateStore};
use statebot_telegram::{TelegramBotAdapter, TelegramConfig, TelegramUpdateSource};
use storage::SqliteStateStore;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::events::{self, EventButton};

pub const PRIVATE_ONLY_REJECTION: &str = "This bot only works in private chats.";

/// Router with the life-event routes and the access policy from config.
pub fn build_router(
    store: Arc<dyn ConversationStateStore>,
    bot: Arc<dyn Bot>,
    private_chats_only: bool,
) -> Result<Router<EventButton>> {
    let registry = Arc::new(events::registry()?);
    let builder = Router::builder(registry, store, bot).routes(events::routes());
    let builder = if private_chats_only {
        builder.private_chats_only(PRIVATE_ONLY_REJECTION)
    } else {
        builder
    };
    Ok(builder.build())
}

/// Runs the bot until Ctrl-C.
#[instrument(skip(config))]
pub async fn run_bot(config: TelegramConfig) -> Result<()> {
    config.validate()?;
    init_tracing(&config.log_file)?;

    info!(
        database_url = %config.database_url,
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        private_chats_only = config.private_chats_only,
        "Initializing bot"
    );

    let store = SqliteStateStore::new(&config.database_url)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                database_url = %config.database_url,
                "Failed to initialize state storage"
            );
            anyhow::anyhow!("Failed to initialize state storage: {}", e)
        })?;

    let teloxide_bot = config.build_bot()?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let router = build_router(Arc::new(store), bot, config.private_chats_only)?;
    info!(routes = router.routes().len(), "Router built");

    let poller = Poller::new(
        router,
        TelegramUpdateSource::new(teloxide_bot),
        config.poll_interval,
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => error!(error = %e, "Listening for Ctrl-C failed"),
        }
    });

    info!("Bot started successfully");
    poller.run(cancel).await;
    Ok(())
}
