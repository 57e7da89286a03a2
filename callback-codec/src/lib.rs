//! # callback-codec
//!
//! Packs typed button payloads into Telegram's 64-character callback data.
//!
//! - [`BitBuffer`] – byte stack with the 7-bit string packing
//! - [`Primitives`] – int / long / bool / string helpers over the buffer
//! - [`Registry`] – single-byte id ↔ payload kind table with per-id decoders

mod bit_buffer;
mod error;
mod primitives;
mod registry;

pub use bit_buffer::{BitBuffer, MAX_CALLBACK_DATA_LEN, MAX_PAYLOAD_BYTES};
pub use error::{BufferError, RegistryError};
pub use primitives::Primitives;
pub use registry::{Decoder, Registry, Variant, UNREGISTERED_ID};
