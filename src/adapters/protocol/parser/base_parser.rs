use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use super::traits::*;
use super::varint;
use crate::domain::error::{DecodeError, DecodeResult};

/// Cursor over an immutable byte buffer with an explicit position.
///
/// Reads never return partial data: a read that would run past the end fails
/// with [`DecodeError::OutOfBounds`] and leaves the position untouched.
#[derive(Debug, Clone)]
pub struct BufferCursor {
    buf: Bytes,
    pos: usize,
}

impl BufferCursor {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self {
            buf: buf.into(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Moves to an absolute position; seeking to the very end is allowed.
    pub fn seek(&mut self, pos: usize) -> DecodeResult<()> {
        if pos > self.buf.len() {
            return Err(DecodeError::OutOfBounds {
                needed: pos - self.pos,
                remaining: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, len: usize) -> DecodeResult<()> {
        self.ensure_remaining(len)?;
        self.pos += len;
        Ok(())
    }

    /// Everything from the current position to the end, without consuming it.
    pub fn rest(&self) -> Bytes {
        self.buf.slice(self.pos..)
    }

    fn take<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        self.ensure_remaining(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn checked_len(&self, stored: u64) -> DecodeResult<usize> {
        let len = usize::try_from(stored - 1).map_err(|_| DecodeError::InvalidLength(stored as i64))?;
        self.ensure_remaining(len)?;
        Ok(len)
    }
}

impl ByteParser for BufferCursor {
    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

impl PrimitiveParser for BufferCursor {
    fn read_fixed(&mut self, len: usize) -> DecodeResult<Bytes> {
        self.ensure_remaining(len)?;
        let out = self.buf.slice(self.pos..self.pos + len);
        self.pos += len;
        Ok(out)
    }

    fn read_i8(&mut self) -> DecodeResult<i8> {
        Ok(i8::from_be_bytes(self.take()?))
    }

    fn read_i16(&mut self) -> DecodeResult<i16> {
        Ok(i16::from_be_bytes(self.take()?))
    }

    fn read_i32(&mut self) -> DecodeResult<i32> {
        Ok(i32::from_be_bytes(self.take()?))
    }

    fn read_i64(&mut self) -> DecodeResult<i64> {
        Ok(i64::from_be_bytes(self.take()?))
    }

    fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(u8::from_be_bytes(self.take()?))
    }

    fn read_u16(&mut self) -> DecodeResult<u16> {
        Ok(u16::from_be_bytes(self.take()?))
    }

    fn read_uuid(&mut self) -> DecodeResult<Uuid> {
        Ok(Uuid::from_bytes(self.take()?))
    }
}

impl VarIntParser for BufferCursor {
    fn read_unsigned_varint(&mut self) -> DecodeResult<u64> {
        let (value, consumed) = varint::decode_unsigned(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    fn read_signed_varint(&mut self) -> DecodeResult<i64> {
        let (value, consumed) = varint::decode_signed(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }
}

impl CompactParser for BufferCursor {
    fn read_compact_nullable_string(&mut self) -> DecodeResult<Option<String>> {
        match self.read_compact_bytes()? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|_| DecodeError::InvalidUtf8),
        }
    }

    fn read_compact_bytes(&mut self) -> DecodeResult<Option<Bytes>> {
        let start = self.pos;
        let stored = self.read_unsigned_varint()?;
        if stored == 0 {
            return Ok(None);
        }
        match self.checked_len(stored) {
            Ok(len) => self.read_fixed(len).map(Some),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }

    fn read_compact_array<T, F>(&mut self, mut element: F) -> DecodeResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> DecodeResult<T>,
    {
        let stored = self.read_unsigned_varint()?;
        if stored == 0 {
            return Ok(Vec::new());
        }
        let count = usize::try_from(stored - 1).map_err(|_| DecodeError::InvalidLength(stored as i64))?;
        // every element occupies at least one byte
        self.ensure_remaining(count)?;

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(element(self)?);
        }
        Ok(items)
    }

    fn read_tag_buffer(&mut self) -> DecodeResult<usize> {
        let count = self.read_unsigned_varint()?;
        if count == 0 {
            return Ok(0);
        }
        let count = usize::try_from(count).map_err(|_| DecodeError::InvalidLength(count as i64))?;
        self.ensure_remaining(count)?;
        for _ in 0..count {
            let tag = self.read_unsigned_varint()?;
            let size = self.read_unsigned_varint()?;
            let size = usize::try_from(size).map_err(|_| DecodeError::InvalidLength(size as i64))?;
            self.skip(size)?;
            debug!(tag, size, "skipped unknown tagged field");
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::protocol::parser::varint::PutVarint;

    #[test]
    fn test_fixed_width_big_endian() {
        let mut cursor = BufferCursor::new(vec![0x00, 0x12, 0xff, 0xff, 0xff, 0xfe, 0x7f]);
        assert_eq!(cursor.read_i16().unwrap(), 0x12);
        assert_eq!(cursor.read_i32().unwrap(), -2);
        assert_eq!(cursor.read_u8().unwrap(), 0x7f);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_out_of_bounds_is_not_partial() {
        let mut cursor = BufferCursor::new(vec![0, 0, 1]);
        assert_eq!(
            cursor.read_i32(),
            Err(DecodeError::OutOfBounds { needed: 4, remaining: 3 })
        );
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_fixed(3).unwrap().as_ref(), &[0, 0, 1]);
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn test_compact_string() {
        let mut cursor = BufferCursor::new(vec![6, b'h', b'e', b'l', b'l', b'o']);
        assert_eq!(cursor.read_compact_string().unwrap(), "hello");

        // present but empty
        let mut cursor = BufferCursor::new(vec![1]);
        assert_eq!(cursor.read_compact_nullable_string().unwrap(), Some(String::new()));

        // absent
        let mut cursor = BufferCursor::new(vec![0]);
        assert_eq!(cursor.read_compact_nullable_string().unwrap(), None);
        let mut cursor = BufferCursor::new(vec![0]);
        assert_eq!(cursor.read_compact_string().unwrap(), "");

        let mut cursor = BufferCursor::new(vec![2, 0xff]);
        assert_eq!(cursor.read_compact_string(), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn test_compact_string_longer_than_buffer() {
        let mut cursor = BufferCursor::new(vec![10, b'a', b'b']);
        assert!(matches!(
            cursor.read_compact_string(),
            Err(DecodeError::OutOfBounds { needed: 9, .. })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_compact_array() {
        let mut cursor = BufferCursor::new(vec![3, 0, 0, 0, 1, 0, 0, 0, 2]);
        let items = cursor.read_compact_array(|c| c.read_i32()).unwrap();
        assert_eq!(items, vec![1, 2]);

        let mut cursor = BufferCursor::new(vec![1]);
        assert!(cursor.read_compact_array(|c| c.read_i32()).unwrap().is_empty());

        let mut cursor = BufferCursor::new(vec![0]);
        assert!(cursor.read_compact_array(|c| c.read_i32()).unwrap().is_empty());
    }

    #[test]
    fn test_compact_array_count_exceeding_buffer() {
        let mut buf = Vec::new();
        buf.put_uvarint(1_000_001);
        buf.extend_from_slice(&[0, 0, 0, 1]);
        let mut cursor = BufferCursor::new(buf);
        assert!(matches!(
            cursor.read_compact_array(|c| c.read_i32()),
            Err(DecodeError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_tag_buffer() {
        let mut cursor = BufferCursor::new(vec![0, 0xaa]);
        assert_eq!(cursor.read_tag_buffer().unwrap(), 0);
        assert_eq!(cursor.position(), 1);

        // two tagged fields: tag 0 with 2 bytes, tag 5 with 0 bytes
        let mut cursor = BufferCursor::new(vec![2, 0, 2, 0xde, 0xad, 5, 0, 0x7f]);
        assert_eq!(cursor.read_tag_buffer().unwrap(), 2);
        assert_eq!(cursor.read_u8().unwrap(), 0x7f);

        let mut cursor = BufferCursor::new(vec![1, 0, 4, 0xde]);
        assert!(cursor.read_tag_buffer().is_err());

        let mut cursor = BufferCursor::new(Vec::<u8>::new());
        assert_eq!(cursor.read_tag_buffer(), Err(DecodeError::TruncatedVarint));
    }

    #[test]
    fn test_seek() {
        let mut cursor = BufferCursor::new(vec![1, 2, 3]);
        cursor.seek(3).unwrap();
        assert!(cursor.is_at_end());
        cursor.seek(1).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 2);
        assert!(cursor.seek(4).is_err());
        assert_eq!(cursor.rest().as_ref(), &[3]);
    }
}
