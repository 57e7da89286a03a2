//! Routes: state scope + trigger + optional guard + handler.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use callback_codec::Variant;
use statebot_core::Result;

use crate::context::{Context, Event};

/// Button payload family usable by the router.
pub trait Payload: Variant + Send + Sync + fmt::Debug + 'static {}

impl<T> Payload for T where T: Variant + Send + Sync + fmt::Debug + 'static {}

/// Action run when a route matches. May reply, answer the callback and change the
/// conversation state.
#[async_trait]
pub trait Handler<B: Payload>: Send + Sync {
    async fn handle(&self, ctx: &mut Context<B>) -> Result<()>;
}

/// Extra predicate over the context, e.g. on button fields.
pub type Guard<B> = Arc<dyn Fn(&Context<B>) -> bool + Send + Sync>;

/// What kind of event a route reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger<K> {
    /// Any message (text, document or empty).
    AnyMessage,
    /// Message with non-empty text.
    Text,
    /// `/name` command message.
    Command(String),
    /// Message with a document attached.
    Document,
    /// Any callback query, whether or not its data decoded to a payload.
    AnyCallback,
    /// Callback query whose payload decoded to kind `K`.
    Callback(K),
}

/// One entry of the routing table. Immutable once built.
pub struct Route<B: Payload> {
    name: String,
    state: Option<String>,
    trigger: Trigger<B::Kind>,
    guard: Option<Guard<B>>,
    handler: Arc<dyn Handler<B>>,
}

impl<B: Payload> Route<B> {
    /// Route named after the handler type.
    pub fn on<H>(trigger: Trigger<B::Kind>, handler: H) -> Self
    where
        H: Handler<B> + 'static,
    {
        let name = std::any::type_name::<H>()
            .rsplit("::")
            .next()
            .unwrap_or("handler")
            .to_string();
        Self {
            name,
            state: None,
            trigger,
            guard: None,
            handler: Arc::new(handler),
        }
    }

    pub fn on_message<H: Handler<B> + 'static>(handler: H) -> Self {
        Self::on(Trigger::AnyMessage, handler)
    }

    pub fn on_text<H: Handler<B> + 'static>(handler: H) -> Self {
        Self::on(Trigger::Text, handler)
    }

    pub fn on_command<H: Handler<B> + 'static>(command: &str, handler: H) -> Self {
        Self::on(Trigger::Command(command.trim_start_matches('/').to_string()), handler)
    }

    pub fn on_document<H: Handler<B> + 'static>(handler: H) -> Self {
        Self::on(Trigger::Document, handler)
    }

    pub fn on_callback<H: Handler<B> + 'static>(handler: H) -> Self {
        Self::on(Trigger::AnyCallback, handler)
    }

    pub fn on_button<H: Handler<B> + 'static>(kind: B::Kind, handler: H) -> Self {
        Self::on(Trigger::Callback(kind), handler)
    }

    /// Restricts the route to one conversation state (exact match).
    pub fn in_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Adds a predicate evaluated after state and trigger matched.
    pub fn when<F>(mut self, guard: F) -> Self
    where
        F: Fn(&Context<B>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Overrides the name used in logs and [`crate::Dispatch::Handled`].
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub fn trigger(&self) -> &Trigger<B::Kind> {
        &self.trigger
    }

    pub(crate) fn handler(&self) -> &Arc<dyn Handler<B>> {
        &self.handler
    }

    /// State equality (when scoped), then trigger, then guard.
    pub fn matches(&self, ctx: &Context<B>) -> bool {
        if let Some(state) = &self.state {
            if ctx.state() != state {
                return false;
            }
        }
        let triggered = match (&self.trigger, &ctx.event) {
            (Trigger::AnyMessage, Event::Message(_)) => true,
            (Trigger::Text, Event::Message(m)) => m.text().is_some(),
            (Trigger::Command(name), Event::Message(m)) => m.command() == Some(name.as_str()),
            (Trigger::Document, Event::Message(m)) => m.document.is_some(),
            (Trigger::AnyCallback, Event::Callback { .. }) => true,
            (Trigger::Callback(kind), Event::Callback { payload, .. }) => {
                payload.as_ref().map(|p| p.kind()) == Some(*kind)
            }
            _ => false,
        };
        triggered && self.guard.as_ref().map_or(true, |guard| guard(ctx))
    }
}

impl<B: Payload> fmt::Debug for Route<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("trigger", &self.trigger)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}
