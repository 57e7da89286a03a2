//! Id ↔ payload-kind table.
//!
//! A payload family is an enum implementing [`Variant`]. Each kind is bound to
//! one id byte and one decoder at startup; after that the registry is only read.
//! Encoding writes the variant's fields and then its id on top, so the id is
//! the first byte of the callback data.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, warn};

use crate::bit_buffer::BitBuffer;
use crate::error::{BufferError, RegistryError};

/// Id written for kinds nobody registered. Never decodes to a payload.
pub const UNREGISTERED_ID: u8 = 0xff;

/// A family of payloads that can travel in callback data.
pub trait Variant: Sized {
    /// Field-less tag naming each variant.
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;

    /// Pushes this variant's fields. The registry pushes the id afterwards.
    fn write_fields(&self, buf: &mut BitBuffer) -> Result<(), BufferError>;
}

/// Reads the fields of one kind after its id has been popped.
pub type Decoder<T> = fn(&mut BitBuffer) -> Result<T, BufferError>;

struct Entry<T: Variant> {
    kind: T::Kind,
    decoder: Decoder<T>,
}

/// Bidirectional id ↔ kind map with a decoder per id.
pub struct Registry<T: Variant> {
    entries: HashMap<u8, Entry<T>>,
    ids: HashMap<T::Kind, u8>,
}

impl<T: Variant> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            ids: HashMap::new(),
        }
    }

    /// Binds `id` to `kind`. Fails if either side is already bound or `id` is
    /// [`UNREGISTERED_ID`].
    pub fn register(
        mut self,
        id: u8,
        kind: T::Kind,
        decoder: Decoder<T>,
    ) -> Result<Self, RegistryError> {
        if id == UNREGISTERED_ID {
            return Err(RegistryError::ReservedId(id));
        }
        if let Some(existing) = self.entries.get(&id) {
            return Err(RegistryError::DuplicateId {
                id,
                existing: format!("{:?}", existing.kind),
            });
        }
        if let Some(&bound) = self.ids.get(&kind) {
            return Err(RegistryError::DuplicateKind {
                kind: format!("{:?}", kind),
                id: bound,
            });
        }
        self.entries.insert(id, Entry { kind, decoder });
        self.ids.insert(kind, id);
        Ok(self)
    }

    /// Removes the entry for `id`, returning its kind.
    pub fn unregister(&mut self, id: u8) -> Option<T::Kind> {
        let entry = self.entries.remove(&id)?;
        self.ids.remove(&entry.kind);
        Some(entry.kind)
    }

    /// Id bound to the kind of `value`, or `None` if nobody registered it.
    pub fn id_of(&self, value: &T) -> Option<u8> {
        self.id_of_kind(value.kind())
    }

    pub fn id_of_kind(&self, kind: T::Kind) -> Option<u8> {
        self.ids.get(&kind).copied()
    }

    pub fn kind_of(&self, id: u8) -> Option<T::Kind> {
        self.entries.get(&id).map(|e| e.kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes `value` into callback data.
    ///
    /// An unregistered kind is written with [`UNREGISTERED_ID`] and logged; the
    /// resulting button will not decode.
    pub fn encode(&self, value: &T) -> Result<String, BufferError> {
        let mut buf = BitBuffer::new();
        value.write_fields(&mut buf)?;
        let id = match self.id_of(value) {
            Some(id) => id,
            None => {
                warn!(
                    kind = ?value.kind(),
                    sentinel = UNREGISTERED_ID,
                    "Encoding unregistered payload kind"
                );
                UNREGISTERED_ID
            }
        };
        buf.push_byte(id)?;
        Ok(buf.serialize())
    }

    /// Decodes the payload on top of `buf`.
    ///
    /// `Ok(None)` when the leading id has no entry; the buffer is left
    /// untouched in that case. An empty buffer is malformed input.
    pub fn decode(&self, buf: &mut BitBuffer) -> Result<Option<T>, BufferError> {
        let id = buf.peek_byte()?;
        let Some(entry) = self.entries.get(&id) else {
            debug!(id, "No payload registered for id");
            return Ok(None);
        };
        buf.pop_byte()?;
        (entry.decoder)(buf).map(Some)
    }

    /// Parses callback data and decodes it.
    pub fn decode_str(&self, data: &str) -> Result<Option<T>, BufferError> {
        let mut buf = BitBuffer::parse(data)?;
        self.decode(&mut buf)
    }
}

impl<T: Variant> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Variant> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.entries.iter().map(|(id, e)| (*id, e.kind)).collect();
        ids.sort_by_key(|(id, _)| *id);
        f.debug_struct("Registry").field("entries", &ids).finish()
    }
}
