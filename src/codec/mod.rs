//! Binary transport of error chains.
//!
//! The encoding is protobuf compatible, so peers in other languages can read
//! it with a generated message type:
//!
//! ```text
//! message Error {
//!   string   text   = 1;
//!   string   detail = 2;
//!   repeated string   stack = 3;   // "file:line -> func()"
//!   repeated KeyValue debug = 4;   // { string key = 1; string value = 2; }
//!   Error    next   = 5;
//! }
//! ```
//!
//! Each encoding is framed the way protobuf's delimited streams are: the
//! message body is preceded by its varint length. The frame is what lets a
//! decoder tell a complete message from one cut at a field boundary.
//!
//! Stacks survive only as strings: [`View::decode`] keeps them, while
//! [`Error::decode`] rebuilds undecorated nodes without stack or prototype.
//!
//! # Examples
//!
//! ```
//! use errx::Error;
//!
//! let err = Error::new("load failed")
//!     .attach_reason(Error::new("404 Not Found").attach_detail(format_args!("user 7")));
//!
//! let back = Error::decode(&err.encode()).unwrap();
//! assert_eq!(back.text(), "load failed");
//! assert_eq!(back.reason().and_then(|r| r.as_node()).map(|n| n.detail()), Some("user 7"));
//! ```

mod pool;
mod wire;

pub use pool::{BufferPool, PoolConfig, PooledBuffer};

use bytes::BytesMut;

use crate::macros::log_event;
use crate::types::{Error, View};
use wire::{Reader, WIRE_LEN};

const FIELD_TEXT: u32 = 1;
const FIELD_DETAIL: u32 = 2;
const FIELD_STACK: u32 = 3;
const FIELD_DEBUG: u32 = 4;
const FIELD_NEXT: u32 = 5;

const FIELD_KEY: u32 = 1;
const FIELD_VALUE: u32 = 2;

/// Most nested messages, counting the outermost, the decoder accepts.
pub const MAX_DECODE_DEPTH: usize = 64;

/// Why a byte string is not a valid encoded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("input ends in the middle of a value")]
    Truncated,
    #[error("varint longer than 64 bits")]
    VarintOverflow,
    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),
    #[error("field {field} has unsupported wire type {wire_type}")]
    InvalidWireType { field: u32, wire_type: u8 },
    #[error("field {field} is not valid UTF-8")]
    InvalidUtf8 { field: u32 },
    #[error("length {0} does not fit in memory")]
    LengthOverflow(u64),
    #[error("reason chain nested deeper than 64 levels")]
    NestingTooDeep,
    #[error("{0} bytes after the end of the message")]
    TrailingBytes(usize),
}

impl Error {
    /// Encodes the exported chain using the global buffer pool.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_with(BufferPool::global())
    }

    /// Encodes the exported chain using a scratch buffer from `pool`.
    pub fn encode_with(&self, pool: &BufferPool) -> Vec<u8> {
        self.export().encode_with(pool)
    }

    /// Decodes a chain produced by [`encode`](Error::encode).
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for truncated or malformed input.
    pub fn decode(bytes: &[u8]) -> Result<Error, DecodeError> {
        View::decode(bytes).map(Error::from)
    }
}

impl View {
    /// Encodes the view and its `next` views using the global buffer pool.
    pub fn encode(&self) -> Vec<u8> {
        self.encode_with(BufferPool::global())
    }

    /// Encodes using a scratch buffer from `pool`.
    ///
    /// Only the first [`MAX_DECODE_DEPTH`] views are written, so the output
    /// always decodes.
    pub fn encode_with(&self, pool: &BufferPool) -> Vec<u8> {
        let views: Vec<&View> = self.iter().take(MAX_DECODE_DEPTH).collect();
        if views.len() == MAX_DECODE_DEPTH && views[MAX_DECODE_DEPTH - 1].next.is_some() {
            log_event!(trace, depth = MAX_DECODE_DEPTH, "view chain truncated while encoding");
        }

        // Body length of each view, computed innermost first.
        let mut lens = vec![0usize; views.len()];
        let mut next_len = None;
        for (i, view) in views.iter().enumerate().rev() {
            let len = body_len(view, next_len);
            lens[i] = len;
            next_len = Some(len);
        }

        let total = lens.first().copied().unwrap_or(0);
        let mut buf = pool.checkout();
        buf.reserve(wire::varint_len(total as u64) + total);
        wire::put_varint(&mut buf, total as u64);
        for (i, view) in views.iter().enumerate() {
            write_fields(&mut buf, view);
            if let Some(len) = lens.get(i + 1) {
                wire::put_key(&mut buf, FIELD_NEXT, WIRE_LEN);
                wire::put_varint(&mut buf, *len as u64);
            }
        }
        buf.to_vec()
    }

    /// Decodes an encoded chain, keeping the stack strings.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for truncated or malformed input.
    pub fn decode(bytes: &[u8]) -> Result<View, DecodeError> {
        let result = decode_framed(bytes);
        if let Err(_err) = &result {
            log_event!(debug, error = %_err, len = bytes.len(), "failed to decode error chain");
        }
        result
    }
}

fn debug_entry_len(key: &str, value: &str) -> usize {
    wire::str_field_len(FIELD_KEY, key) + wire::str_field_len(FIELD_VALUE, value)
}

fn body_len(view: &View, next_len: Option<usize>) -> usize {
    let stack: usize = view
        .stack
        .iter()
        .map(|frame| wire::bytes_field_len(FIELD_STACK, frame.len()))
        .sum();
    let debug: usize = view
        .debug
        .iter()
        .map(|(key, value)| wire::bytes_field_len(FIELD_DEBUG, debug_entry_len(key, value)))
        .sum();

    wire::str_field_len(FIELD_TEXT, &view.text)
        + wire::str_field_len(FIELD_DETAIL, &view.detail)
        + stack
        + debug
        + next_len.map_or(0, |len| wire::bytes_field_len(FIELD_NEXT, len))
}

/// Writes every field of `view` except `next`.
fn write_fields(buf: &mut BytesMut, view: &View) {
    wire::put_str_field(buf, FIELD_TEXT, &view.text);
    wire::put_str_field(buf, FIELD_DETAIL, &view.detail);
    for frame in &view.stack {
        wire::put_bytes_field(buf, FIELD_STACK, frame.as_bytes());
    }
    for (key, value) in &view.debug {
        wire::put_key(buf, FIELD_DEBUG, WIRE_LEN);
        wire::put_varint(buf, debug_entry_len(key, value) as u64);
        wire::put_str_field(buf, FIELD_KEY, key);
        wire::put_str_field(buf, FIELD_VALUE, value);
    }
}

/// Strips the length frame; the body must fill the rest of the input exactly.
fn decode_framed(bytes: &[u8]) -> Result<View, DecodeError> {
    let mut reader = Reader::new(bytes);
    let body = reader.read_len_delimited()?;
    if !reader.is_empty() {
        return Err(DecodeError::TrailingBytes(reader.remaining()));
    }
    decode_view(body, 0)
}

fn decode_view(bytes: &[u8], depth: usize) -> Result<View, DecodeError> {
    if depth >= MAX_DECODE_DEPTH {
        return Err(DecodeError::NestingTooDeep);
    }

    let mut view = View::default();
    let mut reader = Reader::new(bytes);

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_key()?;
        match (field, wire_type) {
            (FIELD_TEXT, WIRE_LEN) => view.text = reader.read_string(field)?,
            (FIELD_DETAIL, WIRE_LEN) => view.detail = reader.read_string(field)?,
            (FIELD_STACK, WIRE_LEN) => view.stack.push(reader.read_string(field)?),
            (FIELD_DEBUG, WIRE_LEN) => {
                let (key, value) = decode_entry(reader.read_len_delimited()?)?;
                view.debug.insert(key, value);
            }
            (FIELD_NEXT, WIRE_LEN) => {
                let next = decode_view(reader.read_len_delimited()?, depth + 1)?;
                view.next = Some(Box::new(next));
            }
            (FIELD_TEXT..=FIELD_NEXT, _) => {
                return Err(DecodeError::InvalidWireType { field, wire_type });
            }
            _ => reader.skip(field, wire_type)?,
        }
    }

    Ok(view)
}

fn decode_entry(bytes: &[u8]) -> Result<(String, String), DecodeError> {
    let mut key = String::new();
    let mut value = String::new();
    let mut reader = Reader::new(bytes);

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_key()?;
        match (field, wire_type) {
            (FIELD_KEY, WIRE_LEN) => key = reader.read_string(field)?,
            (FIELD_VALUE, WIRE_LEN) => value = reader.read_string(field)?,
            (FIELD_KEY | FIELD_VALUE, _) => {
                return Err(DecodeError::InvalidWireType { field, wire_type });
            }
            _ => reader.skip(field, wire_type)?,
        }
    }

    Ok((key, value))
}
