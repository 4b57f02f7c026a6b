use bytes::BufMut;

use crate::domain::error::{DecodeError, DecodeResult};

/// A u64 never needs more than ten 7-bit groups.
pub const MAX_VARINT_LEN: usize = 10;

/// Decodes an unsigned varint from the front of `buf`, least-significant
/// group first. Returns the value and the number of bytes consumed.
pub fn decode_unsigned(buf: &[u8]) -> DecodeResult<(u64, usize)> {
    let mut value: u64 = 0;

    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(DecodeError::VarintOverflow);
        }
        let group = (byte & 0x7f) as u64;
        let shift = 7 * i as u32;
        // the tenth group only has room for a single bit
        if i == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(DecodeError::VarintOverflow);
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }

    Err(DecodeError::TruncatedVarint)
}

/// Decodes a zig-zag signed varint from the front of `buf`.
pub fn decode_signed(buf: &[u8]) -> DecodeResult<(i64, usize)> {
    let (raw, consumed) = decode_unsigned(buf)?;
    Ok((zigzag_decode(raw), consumed))
}

#[inline]
pub fn zigzag_decode(raw: u64) -> i64 {
    ((raw >> 1) as i64) ^ -((raw & 1) as i64)
}

#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

pub fn encoded_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

pub trait PutVarint {
    fn put_uvarint(&mut self, value: u64);

    fn put_varint(&mut self, value: i64) {
        self.put_uvarint(zigzag_encode(value));
    }
}

impl<B: BufMut> PutVarint for B {
    fn put_uvarint(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.put_u8(value as u8);
    }
}
