//! # Handler router
//!
//! Routes each inbound update to the first matching [`Route`]. A route is scoped to a
//! conversation state (or to none) and triggered by a message shape or a decoded button
//! kind. Registration order is the precedence order: specific routes go before catch-alls.
//!
//! [`Poller`] drives a [`Router`] from an [`UpdateSource`], one update at a time.

mod context;
mod poller;
mod route;
mod router;

pub use context::{Context, Event};
pub use poller::{Poller, UpdateSource};
pub use route::{Guard, Handler, Payload, Route, Trigger};
pub use router::{AccessPolicy, Dispatch, Router, RouterBuilder};

// Integration tests live in tests/router_test.rs and tests/poller_test.rs
