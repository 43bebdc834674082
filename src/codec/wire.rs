//! Protobuf-compatible wire primitives.
//!
//! Only what the error schema needs: varints, field keys, length-delimited
//! payloads, and skipping of the fixed-width wire types for fields this
//! version does not know.

use bytes::{BufMut, BytesMut};

use super::DecodeError;

pub(crate) const WIRE_VARINT: u8 = 0;
pub(crate) const WIRE_FIXED64: u8 = 1;
pub(crate) const WIRE_LEN: u8 = 2;
pub(crate) const WIRE_FIXED32: u8 = 5;

/// Longest varint encoding of a `u64`.
const MAX_VARINT_LEN: usize = 10;

pub(crate) fn put_varint(buf: &mut BytesMut, mut value: u64) {
    while value >= 0x80 {
        buf.put_u8((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

pub(crate) fn varint_len(value: u64) -> usize {
    // Each byte carries 7 bits; zero still takes one byte.
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

pub(crate) fn put_key(buf: &mut BytesMut, field: u32, wire_type: u8) {
    put_varint(buf, (u64::from(field) << 3) | u64::from(wire_type));
}

pub(crate) fn key_len(field: u32) -> usize {
    varint_len(u64::from(field) << 3)
}

/// Writes a length-delimited string field. Empty strings are omitted, as
/// absent fields decode to empty values anyway.
pub(crate) fn put_str_field(buf: &mut BytesMut, field: u32, value: &str) {
    if value.is_empty() {
        return;
    }
    put_bytes_field(buf, field, value.as_bytes());
}

/// Writes a repeated-string element; empty values are kept so positions survive.
pub(crate) fn put_bytes_field(buf: &mut BytesMut, field: u32, value: &[u8]) {
    put_key(buf, field, WIRE_LEN);
    put_varint(buf, value.len() as u64);
    buf.put_slice(value);
}

pub(crate) fn str_field_len(field: u32, value: &str) -> usize {
    if value.is_empty() {
        0
    } else {
        bytes_field_len(field, value.len())
    }
}

pub(crate) fn bytes_field_len(field: u32, len: usize) -> usize {
    key_len(field) + varint_len(len as u64) + len
}

/// Cursor over an encoded message.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let mut value = 0u64;
        for (i, &byte) in self.buf.iter().enumerate().take(MAX_VARINT_LEN) {
            let bits = u64::from(byte & 0x7f);
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeError::VarintOverflow);
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                self.buf = &self.buf[i + 1..];
                return Ok(value);
            }
        }

        if self.buf.len() >= MAX_VARINT_LEN {
            Err(DecodeError::VarintOverflow)
        } else {
            Err(DecodeError::Truncated)
        }
    }

    /// Reads a field key, returning `(field number, wire type)`.
    pub(crate) fn read_key(&mut self) -> Result<(u32, u8), DecodeError> {
        let key = self.read_varint()?;
        let field = key >> 3;
        if field == 0 || field > u64::from(u32::MAX >> 3) {
            return Err(DecodeError::InvalidFieldNumber(field));
        }
        Ok((field as u32, (key & 0x7) as u8))
    }

    pub(crate) fn read_len_delimited(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow(len))?;
        self.take(len)
    }

    pub(crate) fn read_string(&mut self, field: u32) -> Result<String, DecodeError> {
        let bytes = self.read_len_delimited()?;
        core::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { field })
    }

    /// Skips a value of a field this decoder does not know.
    pub(crate) fn skip(&mut self, field: u32, wire_type: u8) -> Result<(), DecodeError> {
        match wire_type {
            WIRE_VARINT => self.read_varint().map(drop),
            WIRE_FIXED64 => self.take(8).map(drop),
            WIRE_LEN => self.read_len_delimited().map(drop),
            WIRE_FIXED32 => self.take(4).map(drop),
            _ => Err(DecodeError::InvalidWireType { field, wire_type }),
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.buf.len() < len {
            return Err(DecodeError::Truncated);
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }
}
