//! Life-event tracker: buttons, journal data and the routing table.

mod buttons;
mod handlers;
mod journal;

pub use buttons::{registry, EventButton, EventKind};
pub use handlers::{routes, AWAIT_EVENT_NAME, MAX_EVENTS, PAGE_SIZE};
pub use journal::{Journal, LifeEvent};
