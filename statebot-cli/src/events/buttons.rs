//! Inline-button family of the tracker and its wire ids.
//!
//! Fields are pushed in declaration order, so decoders pop them last-first.

use callback_codec::{BitBuffer, BufferError, Primitives, Registry, RegistryError, Variant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventButton {
    /// Back to the main menu.
    Menu,
    /// Start adding an event.
    Add,
    /// Show one page of the journal.
    ListEvents { page: u8 },
    /// Delete the event with journal id `id`; asks first unless `confirm` is set.
    DeleteEvent { id: i32, confirm: bool },
    /// Abort the current input step.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Menu,
    Add,
    ListEvents,
    DeleteEvent,
    Cancel,
}

impl Variant for EventButton {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            EventButton::Menu => EventKind::Menu,
            EventButton::Add => EventKind::Add,
            EventButton::ListEvents { .. } => EventKind::ListEvents,
            EventButton::DeleteEvent { .. } => EventKind::DeleteEvent,
            EventButton::Cancel => EventKind::Cancel,
        }
    }

    fn write_fields(&self, buf: &mut BitBuffer) -> Result<(), BufferError> {
        match self {
            EventButton::ListEvents { page } => buf.push_u8(*page),
            EventButton::DeleteEvent { id, confirm } => {
                buf.push_int(*id)?;
                buf.push_bool(*confirm)
            }
            EventButton::Menu | EventButton::Add | EventButton::Cancel => Ok(()),
        }
    }
}

fn decode_list(buf: &mut BitBuffer) -> Result<EventButton, BufferError> {
    Ok(EventButton::ListEvents {
        page: buf.pop_u8()?,
    })
}

fn decode_delete(buf: &mut BitBuffer) -> Result<EventButton, BufferError> {
    let confirm = buf.pop_bool()?;
    let id = buf.pop_int()?;
    Ok(EventButton::DeleteEvent { id, confirm })
}

/// Ids are part of the wire format: never reuse one for a different kind.
pub fn registry() -> Result<Registry<EventButton>, RegistryError> {
    Registry::new()
        .register(0x01, EventKind::Menu, |_| Ok(EventButton::Menu))?
        .register(0x02, EventKind::Add, |_| Ok(EventButton::Add))?
        .register(0x03, EventKind::ListEvents, decode_list)?
        .register(0x04, EventKind::DeleteEvent, decode_delete)?
        .register(0x05, EventKind::Cancel, |_| Ok(EventButton::Cancel))
}
