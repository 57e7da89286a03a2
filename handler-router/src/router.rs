//! Ordered routing table and the per-update dispatch algorithm.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use callback_codec::Registry;
use futures::FutureExt;
use statebot_core::{
    Bot, ConversationKey, ConversationState, ConversationStateStore, Update,
};
use tracing::{error, info, instrument, warn};

use crate::context::{Context, Event};
use crate::route::{Payload, Route};

/// Which chats the router serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    AnyChat,
    /// Group and channel updates get `rejection` and never reach the routes.
    PrivateOnly { rejection: String },
}

/// What happened to one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The named route ran and succeeded.
    Handled { route: String },
    /// No route matched.
    Unmatched,
    /// The access policy refused the chat.
    Rejected,
    /// Callback data failed to decode; answered silently and dropped before routing.
    Malformed,
    /// State lookup, the handler, or saving the new state failed.
    Failed,
}

/// Builds a [`Router`]. Routes are tried in the order they are added.
pub struct RouterBuilder<B: Payload> {
    routes: Vec<Route<B>>,
    registry: Arc<Registry<B>>,
    store: Arc<dyn ConversationStateStore>,
    bot: Arc<dyn Bot>,
    access: AccessPolicy,
}

impl<B: Payload> RouterBuilder<B> {
    /// Appends a route (runs in order; first match wins).
    pub fn route(mut self, route: Route<B>) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route<B>>) -> Self {
        self.routes.extend(routes);
        self
    }

    pub fn access(mut self, access: AccessPolicy) -> Self {
        self.access = access;
        self
    }

    pub fn private_chats_only(self, rejection: impl Into<String>) -> Self {
        self.access(AccessPolicy::PrivateOnly {
            rejection: rejection.into(),
        })
    }

    pub fn build(self) -> Router<B> {
        Router {
            routes: self.routes,
            registry: self.registry,
            store: self.store,
            bot: self.bot,
            access: self.access,
        }
    }
}

/// Immutable routing table plus the collaborators every handler needs.
pub struct Router<B: Payload> {
    routes: Vec<Route<B>>,
    registry: Arc<Registry<B>>,
    store: Arc<dyn ConversationStateStore>,
    bot: Arc<dyn Bot>,
    access: AccessPolicy,
}

impl<B: Payload> Router<B> {
    pub fn builder(
        registry: Arc<Registry<B>>,
        store: Arc<dyn ConversationStateStore>,
        bot: Arc<dyn Bot>,
    ) -> RouterBuilder<B> {
        RouterBuilder {
            routes: Vec::new(),
            registry,
            store,
            bot,
            access: AccessPolicy::AnyChat,
        }
    }

    pub fn routes(&self) -> &[Route<B>] {
        &self.routes
    }

    pub fn registry(&self) -> &Arc<Registry<B>> {
        &self.registry
    }

    /// Handles one update: access check, state lookup, payload decode, first
    /// matching route, state save, callback acknowledgement. Never returns an
    /// error; every failure is logged and reported through [`Dispatch`].
    #[instrument(
        skip(self, update),
        fields(user_id = update.user().id, chat_id = update.chat().id)
    )]
    pub async fn dispatch(&self, update: Update) -> Dispatch {
        let user = update.user().clone();
        let chat = update.chat().clone();

        if let AccessPolicy::PrivateOnly { rejection } = &self.access {
            if !chat.is_private() {
                warn!(chat_type = ?chat.chat_type, "step: update rejected, chat is not private");
                self.reject(&update, rejection).await;
                return Dispatch::Rejected;
            }
        }

        let key = ConversationKey::new(user.id, chat.id);
        let conversation = match self.store.load(key).await {
            Ok(Some(state)) => state,
            Ok(None) => ConversationState::default(),
            Err(e) => {
                error!(error = %e, "Loading conversation state failed");
                return Dispatch::Failed;
            }
        };

        let event = match update {
            Update::Message(message) => Event::Message(message),
            Update::Callback(query) => {
                let payload = match query.data.as_deref() {
                    None => None,
                    Some(data) => match self.registry.decode_str(data) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(
                                error = %e,
                                callback_id = %query.id,
                                "Dropping callback with malformed data"
                            );
                            if let Err(e) = self.bot.answer_callback(&query.id, None).await {
                                warn!(error = %e, "Answering callback failed");
                            }
                            return Dispatch::Malformed;
                        }
                    },
                };
                Event::Callback { query, payload }
            }
        };

        let mut ctx = Context::new(
            user,
            chat,
            event,
            conversation,
            self.bot.clone(),
            self.registry.clone(),
        );

        info!(
            state = %ctx.state(),
            payload = ?ctx.payload(),
            "step: routing started"
        );

        let outcome = match self.routes.iter().find(|route| route.matches(&ctx)) {
            Some(route) => self.run(route, &mut ctx).await,
            None => {
                warn!(state = %ctx.state(), payload = ?ctx.payload(), "No route matched");
                Dispatch::Unmatched
            }
        };

        if ctx.callback().is_some() && !ctx.is_answered() {
            if let Err(e) = ctx.answer(None).await {
                warn!(error = %e, "Answering callback failed");
            }
        }

        info!(outcome = ?outcome, "step: routing finished");
        outcome
    }

    async fn run(&self, route: &Route<B>, ctx: &mut Context<B>) -> Dispatch {
        info!(route = %route.name(), state = %ctx.state(), "step: route matched");

        let result = AssertUnwindSafe(route.handler().handle(ctx))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(())) => {
                if ctx.state_changed() {
                    if let Err(e) = self.store.save(ctx.key(), ctx.conversation()).await {
                        error!(
                            route = %route.name(),
                            error = %e,
                            "Saving conversation state failed"
                        );
                        return Dispatch::Failed;
                    }
                    info!(
                        route = %route.name(),
                        new_state = %ctx.state(),
                        "step: conversation state saved"
                    );
                }
                Dispatch::Handled {
                    route: route.name().to_string(),
                }
            }
            Ok(Err(e)) => {
                error!(route = %route.name(), error = %e, "Handler failed");
                Dispatch::Failed
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(route = %route.name(), reason = %reason, "Handler panicked");
                Dispatch::Failed
            }
        }
    }

    async fn reject(&self, update: &Update, rejection: &str) {
        let result = match update {
            Update::Message(message) => self.bot.send_message(&message.chat, rejection).await,
            Update::Callback(query) => self.bot.answer_callback(&query.id, Some(rejection)).await,
        };
        if let Err(e) = result {
            warn!(error = %e, "Sending rejection failed");
        }
    }
}
