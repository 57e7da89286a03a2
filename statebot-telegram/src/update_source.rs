//! `getUpdates` long-poll client feeding the router's poller.

use async_trait::async_trait;
use handler_router::UpdateSource;
use statebot_core::Update;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use tracing::{debug, instrument};

use crate::adapters::to_core_update;

/// Pulls message and callback updates, acknowledging each batch through the offset.
pub struct TelegramUpdateSource {
    bot: teloxide::Bot,
    offset: i32,
}

impl TelegramUpdateSource {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot, offset: 0 }
    }

    /// Next update id to request; everything below it has been acknowledged.
    pub fn offset(&self) -> i32 {
        self.offset
    }
}

#[async_trait]
impl UpdateSource for TelegramUpdateSource {
    #[instrument(skip(self), fields(offset = self.offset))]
    async fn fetch(&mut self) -> anyhow::Result<Vec<Update>> {
        let raw = self
            .bot
            .get_updates()
            .offset(self.offset)
            .timeout(0)
            .allowed_updates(vec![AllowedUpdate::Message, AllowedUpdate::CallbackQuery])
            .await?;

        let mut updates = Vec::with_capacity(raw.len());
        for update in &raw {
            self.offset = self.offset.max(update.id.0 as i32 + 1);
            match to_core_update(update) {
                Some(core) => updates.push(core),
                None => debug!(update_id = update.id.0, "Skipping unsupported update"),
            }
        }
        Ok(updates)
    }
}
