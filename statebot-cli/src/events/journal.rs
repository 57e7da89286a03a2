//! The user's event list, carried in the conversation state data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEvent {
    /// Stable for the life of the journal; never reused after a delete.
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
}

/// Newest events last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default)]
    pub next_id: i32,
    pub events: Vec<LifeEvent>,
}

impl Journal {
    /// Appends an event and returns its id; `None` once ids run out.
    pub fn add(&mut self, name: impl Into<String>, date: NaiveDate) -> Option<i32> {
        let id = self.next_id;
        self.next_id = id.checked_add(1)?;
        self.events.push(LifeEvent {
            id,
            name: name.into(),
            date,
        });
        Some(id)
    }

    /// Position and event for `id`.
    pub fn find(&self, id: i32) -> Option<(usize, &LifeEvent)> {
        self.events.iter().enumerate().find(|(_, e)| e.id == id)
    }

    /// Removes the event with `id`, returning it with its former position.
    pub fn remove(&mut self, id: i32) -> Option<(usize, LifeEvent)> {
        let position = self.events.iter().position(|e| e.id == id)?;
        Some((position, self.events.remove(position)))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn page_count(&self, page_size: usize) -> usize {
        self.events.len().div_ceil(page_size).max(1)
    }

    /// Events on `page`.
    pub fn page(&self, page: usize, page_size: usize) -> impl Iterator<Item = &LifeEvent> {
        self.events.iter().skip(page * page_size).take(page_size)
    }
}
