//! Codec error types.

use thiserror::Error;

/// Errors raised while reading, writing or parsing a [`crate::BitBuffer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer capacity of {capacity} bytes exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Buffer is empty")]
    EmptyBuffer,

    #[error("Requested {requested} bytes but only {available} remain")]
    InsufficientBytes { requested: usize, available: usize },

    #[error("Malformed callback data: {0}")]
    Malformed(String),

    #[error("String of {0} bytes does not fit a one-byte length prefix")]
    StringTooLong(usize),

    #[error("String field is not valid UTF-8")]
    InvalidUtf8,
}

/// Setup-time failures when building a [`crate::Registry`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Id {id:#04x} is already registered to {existing}")]
    DuplicateId { id: u8, existing: String },

    #[error("Kind {kind} is already registered under id {id:#04x}")]
    DuplicateKind { kind: String, id: u8 },

    #[error("Id {0:#04x} is reserved for unregistered payloads")]
    ReservedId(u8),
}
