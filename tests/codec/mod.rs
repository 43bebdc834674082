use std::io;

use errx::codec::MAX_DECODE_DEPTH;
use errx::{debug_map, BufferPool, DecodeError, Error, PoolConfig, View};

fn sample() -> Error {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "EOF");
    Error::new("load failed")
        .attach_debug(debug_map!("id" => 7, "path" => "/etc/app.toml"))
        .attach_reason(
            Error::new("404 Not Found")
                .attach_detail(format_args!("user 7"))
                .attach_reason(eof),
        )
}

#[test]
fn decode_restores_the_whole_chain() {
    let err = sample();
    let back = Error::decode(&err.encode()).unwrap();

    assert_eq!(back.text(), "load failed");
    assert_eq!(back.debug()["path"], "\"/etc/app.toml\"");
    assert!(back.stack().is_empty());
    assert_eq!(back.export(), err.export().without_stacks());
}

#[test]
fn view_decode_keeps_stack_strings() {
    let err = sample();
    let view = View::decode(&err.encode()).unwrap();

    assert!(!view.stack.is_empty());
    assert_eq!(view, err.export());
}

/// Frames `body` with its varint length.
fn framed(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(body.len() + 2);
    let mut len = body.len();
    while len >= 0x80 {
        bytes.push((len as u8 & 0x7f) | 0x80);
        len >>= 7;
    }
    bytes.push(len as u8);
    bytes.extend_from_slice(body);
    bytes
}

#[test]
fn empty_body_is_an_empty_node() {
    let bytes = Error::new("").encode();
    assert_eq!(bytes, [0x00]);

    let err = Error::decode(&bytes).unwrap();
    assert_eq!(err.text(), "");
    assert!(err.reason().is_none());
}

#[test]
fn reads_bytes_from_other_protobuf_writers() {
    // text = "x", detail = "y", next = { text = "z" }
    let bytes = framed(&[0x0a, 0x01, b'x', 0x12, 0x01, b'y', 0x2a, 0x03, 0x0a, 0x01, b'z']);
    let view = View::decode(&bytes).unwrap();

    assert_eq!(view.text, "x");
    assert_eq!(view.detail, "y");
    assert_eq!(view.next.as_deref(), Some(&View::leaf("z")));
    assert_eq!(view.encode(), bytes);
}

#[test]
fn unknown_fields_are_skipped() {
    let mut body = vec![0x0a, 0x01, b'x'];
    body.extend([0x30, 0x96, 0x01]); // field 6, varint 150
    body.extend([0x39, 0, 0, 0, 0, 0, 0, 0, 0]); // field 7, fixed64
    body.extend([0x42, 0x01, b'z']); // field 8, bytes
    body.extend([0x4d, 0, 0, 0, 0]); // field 9, fixed32

    assert_eq!(Error::decode(&framed(&body)).unwrap().text(), "x");
}

#[test]
fn truncated_input_is_rejected() {
    let bytes = sample().encode();

    assert_eq!(Error::decode(&bytes[..3]).err(), Some(DecodeError::Truncated));
    assert_eq!(Error::decode(&[0x0a]).err(), Some(DecodeError::Truncated));
    assert_eq!(Error::decode(&[0x0a, 0x80]).err(), Some(DecodeError::Truncated));
    assert_eq!(Error::decode(&[]).err(), Some(DecodeError::Truncated));
}

#[test]
fn every_strict_prefix_is_rejected() {
    let bytes = sample().encode();

    for len in 0..bytes.len() {
        assert!(Error::decode(&bytes[..len]).is_err(), "prefix of {len} bytes decoded");
    }
    assert!(Error::decode(&bytes).is_ok());
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = Error::new("x").encode();
    bytes.push(0x00);

    assert_eq!(Error::decode(&bytes).err(), Some(DecodeError::TrailingBytes(1)));
}

#[test]
fn corrupt_input_is_rejected() {
    assert_eq!(
        Error::decode(&framed(&[0x0a, 0x02, 0xff, 0xfe])).err(),
        Some(DecodeError::InvalidUtf8 { field: 1 })
    );
    assert_eq!(
        Error::decode(&framed(&[0x08, 0x01])).err(),
        Some(DecodeError::InvalidWireType { field: 1, wire_type: 0 })
    );
    assert_eq!(
        Error::decode(&framed(&[0x33])).err(),
        Some(DecodeError::InvalidWireType { field: 6, wire_type: 3 })
    );
    assert_eq!(Error::decode(&framed(&[0x00])).err(), Some(DecodeError::InvalidFieldNumber(0)));
    assert_eq!(Error::decode(&[0xff; 12]).err(), Some(DecodeError::VarintOverflow));
}

fn nested(levels: usize) -> View {
    let mut view = View::leaf("0");
    for level in 1..levels {
        view = View { next: Some(Box::new(view)), ..View::leaf(level.to_string()) };
    }
    view
}

#[test]
fn nesting_is_limited() {
    let bytes = nested(MAX_DECODE_DEPTH).encode();
    assert_eq!(View::decode(&bytes).unwrap().iter().count(), MAX_DECODE_DEPTH);

    // Empty views, each one the next of the one before.
    let mut body = Vec::new();
    for _ in 0..MAX_DECODE_DEPTH {
        let mut outer = vec![0x2a];
        outer.extend(framed(&body));
        body = outer;
    }
    assert_eq!(View::decode(&framed(&body)).err(), Some(DecodeError::NestingTooDeep));
}

#[test]
fn encoding_stops_at_the_decodable_depth() {
    let deep = nested(MAX_DECODE_DEPTH + 5);
    let back = View::decode(&deep.encode()).unwrap();

    assert_eq!(back.iter().count(), MAX_DECODE_DEPTH);
    assert_eq!(back.text, deep.text);
    assert_eq!(back.iter().last().map(|view| view.text.as_str()), Some("5"));
}

#[test]
fn decode_errors_have_readable_messages() {
    assert_eq!(
        DecodeError::InvalidWireType { field: 3, wire_type: 7 }.to_string(),
        "field 3 has unsupported wire type 7"
    );
}

#[test]
fn encode_reuses_pooled_buffers() {
    let pool = BufferPool::new(PoolConfig { capacity: 2, ..PoolConfig::default() });
    let err = sample();

    let first = err.encode_with(&pool);
    assert_eq!(pool.idle(), 1);
    let second = err.encode_with(&pool);
    assert_eq!(pool.idle(), 1);

    assert_eq!(first, second);
    assert_eq!(pool.config().capacity, 2);
}

#[test]
fn encode_from_many_threads_through_one_pool() {
    let pool = BufferPool::new(PoolConfig { capacity: 4, ..PoolConfig::default() });

    std::thread::scope(|scope| {
        for worker in 0..8 {
            let pool = &pool;
            scope.spawn(move || {
                for round in 0..50 {
                    let err = Error::new(format!("worker {worker}"))
                        .attach_detail(format_args!("round {round}"))
                        .attach_reason(Error::new("x".repeat(worker * 10 + round)));
                    let back = Error::decode(&err.encode_with(pool)).unwrap();

                    assert_eq!(back.text(), format!("worker {worker}"));
                    assert_eq!(back.detail(), format!("round {round}"));
                    assert_eq!(back.reason().map(|r| r.to_string()), Some("x".repeat(worker * 10 + round)));
                }
            });
        }
    });

    assert!(pool.idle() <= 4);
}

#[test]
fn pool_defaults() {
    let config = PoolConfig::default();
    assert_eq!(config.capacity, 32);
    assert_eq!(config.initial_buffer_size, 128);
    assert_eq!(config.max_retained_size, 64 * 1024);
}
