//! Byte stack that serializes into 7-bit characters.
//!
//! Telegram caps callback data at [`MAX_CALLBACK_DATA_LEN`] bytes. Every output
//! character carries 7 payload bits and stays in the single-byte UTF-8 range, so
//! the buffer holds at most [`MAX_PAYLOAD_BYTES`] bytes.
//!
//! The buffer is a stack: pushes and pops happen at the top. On the wire the
//! top byte comes first, so a payload's id (pushed last) is the first decoded
//! byte and is the first one popped after [`BitBuffer::parse`].

use crate::error::BufferError;

/// Telegram's callback-data limit in bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Largest payload that packs into [`MAX_CALLBACK_DATA_LEN`] 7-bit characters.
pub const MAX_PAYLOAD_BYTES: usize = MAX_CALLBACK_DATA_LEN * 7 / 8;

const CHAR_BITS: u32 = 7;
const CHAR_MASK: u32 = 0x7f;

/// Bounded byte stack with the packed string form used as callback data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitBuffer {
    /// Bottom of the stack first; the top is the last element.
    bytes: Vec<u8>,
}

impl BitBuffer {
    /// Creates an empty buffer for writing.
    pub fn new() -> Self {
        Self {
            bytes: Vec::with_capacity(MAX_PAYLOAD_BYTES),
        }
    }

    /// Rebuilds the buffer from a string produced by [`BitBuffer::serialize`].
    ///
    /// Fails with [`BufferError::Malformed`] on characters above 0x7f, on
    /// leftover bits that do not form padding, or on more bytes than fit.
    pub fn parse(data: &str) -> Result<Self, BufferError> {
        let mut wire = Vec::with_capacity(MAX_PAYLOAD_BYTES);
        let mut acc: u32 = 0;
        let mut bits: u32 = 0;

        for (pos, ch) in data.chars().enumerate() {
            let code = u32::from(ch);
            if code > CHAR_MASK {
                return Err(BufferError::Malformed(format!(
                    "character {} at position {} is outside the 7-bit range",
                    code, pos
                )));
            }
            acc |= code << bits;
            bits += CHAR_BITS;
            if bits >= 8 {
                wire.push((acc & 0xff) as u8);
                acc >>= 8;
                bits -= 8;
            }
            if wire.len() > MAX_PAYLOAD_BYTES {
                return Err(BufferError::Malformed(format!(
                    "more than {} payload bytes",
                    MAX_PAYLOAD_BYTES
                )));
            }
        }

        if bits >= CHAR_BITS || acc != 0 {
            return Err(BufferError::Malformed(format!(
                "{} leftover bits (value {:#x})",
                bits, acc
            )));
        }

        // Wire order is top first; the stack keeps the top last.
        wire.reverse();
        Ok(Self { bytes: wire })
    }

    /// Packs the contents into characters with code points 0..=127, top byte first.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity((self.bytes.len() * 8).div_ceil(7));
        let mut acc: u32 = 0;
        let mut bits: u32 = 0;

        for &byte in self.bytes.iter().rev() {
            acc |= u32::from(byte) << bits;
            bits += 8;
            while bits >= CHAR_BITS {
                out.push(char::from((acc & CHAR_MASK) as u8));
                acc >>= CHAR_BITS;
                bits -= CHAR_BITS;
            }
        }
        if bits > 0 {
            out.push(char::from((acc & CHAR_MASK) as u8));
        }
        out
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        MAX_PAYLOAD_BYTES
    }

    /// Bytes that can still be pushed.
    pub fn remaining(&self) -> usize {
        MAX_PAYLOAD_BYTES - self.bytes.len()
    }

    /// Contents in push order (bottom of the stack first).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pushes one byte onto the top.
    pub fn push_byte(&mut self, byte: u8) -> Result<(), BufferError> {
        self.ensure_room(1)?;
        self.bytes.push(byte);
        Ok(())
    }

    /// Pushes all bytes in order, or none of them if they do not fit.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.ensure_room(bytes.len())?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Removes and returns the top byte.
    pub fn pop_byte(&mut self) -> Result<u8, BufferError> {
        self.bytes.pop().ok_or(BufferError::EmptyBuffer)
    }

    /// Returns the top byte without removing it.
    pub fn peek_byte(&self) -> Result<u8, BufferError> {
        self.bytes.last().copied().ok_or(BufferError::EmptyBuffer)
    }

    /// Removes the top `n` bytes and returns them in push order.
    pub fn pop_bytes(&mut self, n: usize) -> Result<Vec<u8>, BufferError> {
        self.ensure_available(n)?;
        let start = self.bytes.len() - n;
        Ok(self.bytes.split_off(start))
    }

    /// Returns the top `n` bytes in push order without removing them.
    pub fn peek_bytes(&self, n: usize) -> Result<&[u8], BufferError> {
        self.ensure_available(n)?;
        Ok(&self.bytes[self.bytes.len() - n..])
    }

    fn ensure_room(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            return Err(BufferError::CapacityExceeded {
                capacity: MAX_PAYLOAD_BYTES,
            });
        }
        Ok(())
    }

    fn ensure_available(&self, n: usize) -> Result<(), BufferError> {
        if n > self.bytes.len() {
            return Err(BufferError::InsufficientBytes {
                requested: n,
                available: self.bytes.len(),
            });
        }
        Ok(())
    }
}
