//! Typed push / pop helpers layered on [`BitBuffer`].
//!
//! Multi-byte values are pushed as one unit in big-endian order, so `pop_*`
//! reads them back through [`BitBuffer::pop_bytes`]. Because the buffer is a
//! stack, the fields of a record come back in reverse push order.

use crate::bit_buffer::BitBuffer;
use crate::error::BufferError;

/// Primitive field codecs. Implemented for [`BitBuffer`].
pub trait Primitives {
    fn push_u8(&mut self, value: u8) -> Result<(), BufferError>;
    fn pop_u8(&mut self) -> Result<u8, BufferError>;

    /// 4 bytes, big-endian.
    fn push_int(&mut self, value: i32) -> Result<(), BufferError>;
    fn pop_int(&mut self) -> Result<i32, BufferError>;
    /// Reads the top int without consuming it.
    fn peek_int(&self) -> Result<i32, BufferError>;

    /// 8 bytes, big-endian.
    fn push_long(&mut self, value: i64) -> Result<(), BufferError>;
    fn pop_long(&mut self) -> Result<i64, BufferError>;

    /// Writes 0 or 1; any non-zero byte reads as `true`.
    fn push_bool(&mut self, value: bool) -> Result<(), BufferError>;
    fn pop_bool(&mut self) -> Result<bool, BufferError>;

    /// UTF-8 bytes followed by a one-byte length on top (at most 255 bytes).
    fn push_str(&mut self, value: &str) -> Result<(), BufferError>;
    fn pop_str(&mut self) -> Result<String, BufferError>;
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], BufferError> {
    bytes
        .try_into()
        .map_err(|_| BufferError::InsufficientBytes {
            requested: N,
            available: bytes.len(),
        })
}

impl Primitives for BitBuffer {
    fn push_u8(&mut self, value: u8) -> Result<(), BufferError> {
        self.push_byte(value)
    }

    fn pop_u8(&mut self) -> Result<u8, BufferError> {
        self.pop_byte()
    }

    fn push_int(&mut self, value: i32) -> Result<(), BufferError> {
        self.push_bytes(&value.to_be_bytes())
    }

    fn pop_int(&mut self) -> Result<i32, BufferError> {
        let bytes = self.pop_bytes(4)?;
        Ok(i32::from_be_bytes(fixed(&bytes)?))
    }

    fn peek_int(&self) -> Result<i32, BufferError> {
        Ok(i32::from_be_bytes(fixed(self.peek_bytes(4)?)?))
    }

    fn push_long(&mut self, value: i64) -> Result<(), BufferError> {
        self.push_bytes(&value.to_be_bytes())
    }

    fn pop_long(&mut self) -> Result<i64, BufferError> {
        let bytes = self.pop_bytes(8)?;
        Ok(i64::from_be_bytes(fixed(&bytes)?))
    }

    fn push_bool(&mut self, value: bool) -> Result<(), BufferError> {
        self.push_byte(u8::from(value))
    }

    fn pop_bool(&mut self) -> Result<bool, BufferError> {
        Ok(self.pop_byte()? != 0)
    }

    fn push_str(&mut self, value: &str) -> Result<(), BufferError> {
        let raw = value.as_bytes();
        let len = u8::try_from(raw.len()).map_err(|_| BufferError::StringTooLong(raw.len()))?;
        if raw.len() + 1 > self.remaining() {
            return Err(BufferError::CapacityExceeded {
                capacity: self.capacity(),
            });
        }
        self.push_bytes(raw)?;
        self.push_byte(len)
    }

    fn pop_str(&mut self) -> Result<String, BufferError> {
        let len = usize::from(self.peek_byte()?);
        if len + 1 > self.len() {
            return Err(BufferError::InsufficientBytes {
                requested: len,
                available: self.len() - 1,
            });
        }
        self.pop_byte()?;
        let raw = self.pop_bytes(len)?;
        String::from_utf8(raw).map_err(|_| BufferError::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit_buffer::MAX_PAYLOAD_BYTES;

    #[test]
    fn test_int_is_big_endian() {
        let mut buf = BitBuffer::new();
        buf.push_int(0x0102_0304).unwrap();
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4]);
        assert_eq!(buf.peek_int().unwrap(), 0x0102_0304);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.pop_int().unwrap(), 0x0102_0304);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_negative_int_and_long() {
        let mut buf = BitBuffer::new();
        buf.push_long(-9_000_000_000).unwrap();
        buf.push_int(-1).unwrap();
        assert_eq!(buf.pop_int().unwrap(), -1);
        assert_eq!(buf.pop_long().unwrap(), -9_000_000_000);
    }

    #[test]
    fn test_pop_int_underrun() {
        let mut buf = BitBuffer::new();
        buf.push_bytes(&[1, 2]).unwrap();
        assert!(matches!(
            buf.pop_int(),
            Err(BufferError::InsufficientBytes { .. })
        ));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_bool_reads_any_nonzero_as_true() {
        let mut buf = BitBuffer::new();
        buf.push_byte(0x42).unwrap();
        buf.push_bool(false).unwrap();
        buf.push_bool(true).unwrap();
        assert_eq!(buf.as_bytes(), &[0x42, 0, 1]);
        assert!(buf.pop_bool().unwrap());
        assert!(!buf.pop_bool().unwrap());
        assert!(buf.pop_bool().unwrap());
    }

    #[test]
    fn test_string_fields_come_back_in_reverse_push_order() {
        let mut buf = BitBuffer::new();
        buf.push_str("first").unwrap();
        buf.push_str("второй").unwrap();
        assert_eq!(buf.pop_str().unwrap(), "второй");
        assert_eq!(buf.pop_str().unwrap(), "first");
    }

    #[test]
    fn test_empty_string() {
        let mut buf = BitBuffer::new();
        buf.push_str("").unwrap();
        assert_eq!(buf.as_bytes(), &[0]);
        assert_eq!(buf.pop_str().unwrap(), "");
    }

    #[test]
    fn test_string_longer_than_prefix_allows() {
        let mut buf = BitBuffer::new();
        let long = "x".repeat(256);
        assert_eq!(buf.push_str(&long), Err(BufferError::StringTooLong(256)));
    }

    #[test]
    fn test_string_must_fit_remaining_capacity() {
        let mut buf = BitBuffer::new();
        buf.push_int(7).unwrap();
        let text = "y".repeat(MAX_PAYLOAD_BYTES - 4);
        assert!(matches!(
            buf.push_str(&text),
            Err(BufferError::CapacityExceeded { .. })
        ));
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn test_pop_str_with_truncated_body() {
        let mut buf = BitBuffer::new();
        buf.push_bytes(&[b'a', 5]).unwrap();
        assert!(matches!(
            buf.pop_str(),
            Err(BufferError::InsufficientBytes { .. })
        ));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn test_pop_str_invalid_utf8() {
        let mut buf = BitBuffer::new();
        buf.push_bytes(&[0xff, 0xfe, 2]).unwrap();
        assert_eq!(buf.pop_str(), Err(BufferError::InvalidUtf8));
    }
}
