use bytes::Bytes;
use uuid::Uuid;

use crate::domain::error::{DecodeError, DecodeResult};

/// Sequential, bounds-checked access to a byte buffer.
pub trait ByteParser {
    fn remaining(&self) -> usize;

    /// 남은 바이트가 충분한지 확인
    fn ensure_remaining(&self, required: usize) -> DecodeResult<()> {
        if self.remaining() < required {
            return Err(DecodeError::OutOfBounds {
                needed: required,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Fixed-width big-endian reads.
pub trait PrimitiveParser: ByteParser {
    fn read_fixed(&mut self, len: usize) -> DecodeResult<Bytes>;
    fn read_i8(&mut self) -> DecodeResult<i8>;
    fn read_i16(&mut self) -> DecodeResult<i16>;
    fn read_i32(&mut self) -> DecodeResult<i32>;
    fn read_i64(&mut self) -> DecodeResult<i64>;
    fn read_u8(&mut self) -> DecodeResult<u8>;
    fn read_u16(&mut self) -> DecodeResult<u16>;
    fn read_uuid(&mut self) -> DecodeResult<Uuid>;
}

pub trait VarIntParser: ByteParser {
    fn read_unsigned_varint(&mut self) -> DecodeResult<u64>;
    fn read_signed_varint(&mut self) -> DecodeResult<i64>;
}

/// Compact (`length + 1`) encodings and tagged-field sections.
pub trait CompactParser: VarIntParser + PrimitiveParser {
    /// `None` when the stored length is 0.
    fn read_compact_nullable_string(&mut self) -> DecodeResult<Option<String>>;

    /// Like [`CompactParser::read_compact_nullable_string`] but absent reads as empty.
    fn read_compact_string(&mut self) -> DecodeResult<String> {
        Ok(self.read_compact_nullable_string()?.unwrap_or_default())
    }

    fn read_compact_bytes(&mut self) -> DecodeResult<Option<Bytes>>;

    fn read_compact_array<T, F>(&mut self, element: F) -> DecodeResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> DecodeResult<T>,
        Self: Sized;

    /// Consumes a tag buffer and returns how many tagged fields were skipped.
    fn read_tag_buffer(&mut self) -> DecodeResult<usize>;
}
