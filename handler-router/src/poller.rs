//! Fixed-rate poller: fetch a batch, dispatch it in order, wait for the next tick.
//!
//! Updates are handled one after another on the poller's task, so handlers of
//! the same user never race on conversation state. Cancelling stops the next
//! fetch; an update already being dispatched runs to completion.

use std::time::Duration;

use async_trait::async_trait;
use statebot_core::Update;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::route::Payload;
use crate::router::{Dispatch, Router};

/// Inbound update feed (e.g. Telegram `getUpdates`).
#[async_trait]
pub trait UpdateSource: Send {
    /// Returns the next batch in delivery order; an empty batch when nothing is pending.
    async fn fetch(&mut self) -> anyhow::Result<Vec<Update>>;
}

pub struct Poller<B: Payload, S: UpdateSource> {
    router: Router<B>,
    source: S,
    interval: Duration,
}

impl<B: Payload, S: UpdateSource> Poller<B, S> {
    pub fn new(router: Router<B>, source: S, interval: Duration) -> Self {
        Self {
            router,
            source,
            interval,
        }
    }

    pub fn router(&self) -> &Router<B> {
        &self.router
    }

    /// Fetches one batch and dispatches every update sequentially.
    pub async fn poll_once(&mut self) -> anyhow::Result<Vec<Dispatch>> {
        let updates = self.source.fetch().await?;
        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            outcomes.push(self.router.dispatch(update).await);
        }
        Ok(outcomes)
    }

    /// Polls every `interval` until `cancel` fires. Fetch errors are logged and
    /// retried on the next tick.
    #[instrument(skip(self, cancel), fields(interval_ms = self.interval.as_millis() as u64))]
    pub async fn run(mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Poller started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.poll_once().await {
                Ok(outcomes) if !outcomes.is_empty() => {
                    info!(updates = outcomes.len(), "step: batch processed");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Fetching updates failed"),
            }
        }

        info!("Poller stopped");
    }
}
