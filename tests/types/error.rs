use std::io;
use std::sync::Arc;
use std::thread;

use errx::{debug_map, Error, Reason, SharedError};

fn eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")
}

#[test]
fn new_node_is_undecorated() {
    for text in ["", "x", "404 Not Found", "multi\nline"] {
        let err = Error::new(text);

        assert_eq!(err.to_string(), text);
        assert_eq!(err.text(), text);
        assert!(err.detail().is_empty());
        assert!(err.debug().is_empty());
        assert!(err.stack().is_empty());
        assert!(err.reason().is_none());
        assert!(err.prototype().is_none());
        assert!(!err.is_decorated());
    }
}

#[test]
fn owned_text_converts_into_a_node() {
    let err: Error = format!("user {} missing", 7).into();
    assert_eq!(err.text(), "user 7 missing");
}

#[test]
fn attach_stack_is_idempotent() {
    let base = Error::new("some msg");
    let once = base.attach_stack();
    let twice = once.attach_stack();

    assert!(once.ptr_eq(&twice));
    assert!(!base.ptr_eq(&once));
    assert!(once.prototype().is_some_and(|proto| proto.ptr_eq(&base)));
    assert_eq!(once.stack(), twice.stack());
}

#[test]
fn decorated_node_records_the_calling_file() {
    let err = Error::new("x").attach_stack();

    assert!(err.is_decorated());
    assert!(
        err.stack().iter().any(|frame| frame.file() == "error.rs"),
        "stack: {:?}",
        err.stack()
    );
}

#[inline(never)]
fn decorate_here() -> Error {
    Error::new("x").attach_detail(format_args!("y"))
}

#[test]
fn first_frame_is_the_decorating_function() {
    let err = decorate_here();

    assert!(
        err.stack()[0].function().ends_with("decorate_here"),
        "stack: {:?}",
        err.stack()
    );
}

#[test]
fn decorations_leave_the_receiver_untouched() {
    let base = Error::new("error 3");
    let detailed = base.attach_detail(format_args!("some {} msg", 42));
    let caused = detailed.attach_reason(eof());

    assert!(base.detail().is_empty());
    assert!(base.reason().is_none());
    assert!(base.stack().is_empty());

    assert_eq!(detailed.detail(), "some 42 msg");
    assert!(detailed.reason().is_none());

    assert_eq!(caused.detail(), "some 42 msg");
    assert!(caused.reason().is_some());
    assert_eq!(caused.stack(), detailed.stack());
    assert!(caused.prototype().is_some_and(|proto| proto.ptr_eq(&base)));
}

#[test]
fn attach_debug_replaces_the_previous_map() {
    let err = Error::new("x")
        .attach_debug(debug_map!("first" => 1))
        .attach_debug(debug_map!("second" => 2));

    assert_eq!(err.debug().len(), 1);
    assert_eq!(err.debug()["second"], "2");

    let cleared = err.attach_debug(debug_map!());
    assert!(cleared.debug().is_empty());
}

#[test]
fn detail_template_marks_problems_instead_of_failing() {
    let err = Error::new("x").attach_detail_template("%d of %d", &["one".into()]);
    assert_eq!(err.detail(), "%!d(string=one) of %!d(MISSING)");
}

#[test]
fn every_decoration_still_matches_the_original() {
    let base = Error::new("x");
    let decorated = base
        .attach_detail(format_args!("a"))
        .attach_debug(debug_map!("k" => 1))
        .attach_reason(eof())
        .attach_detail_template("user %d", &[7.into()])
        .attach_stack();

    assert!(decorated.is(&base));
    assert!(!decorated.ptr_eq(&base));
    assert!(decorated.prototype().is_some_and(|proto| proto.ptr_eq(&base)));
}

#[test]
fn shared_reason_keeps_identity() {
    let cause: SharedError = Arc::new(eof());
    let base = Error::new("x");
    let err = base.attach_shared_reason(cause.clone());

    assert!(err.is(&base));
    assert!(err.is(&*cause));
    assert!(err.reason().is_some_and(|reason| reason.is_same(&*cause)));

    match err.reason() {
        Some(Reason::Foreign(stored)) => assert!(Arc::ptr_eq(stored, &cause)),
        other => panic!("unexpected reason {other:?}"),
    }
}

#[test]
fn node_reason_joins_the_chain() {
    let inner = Error::new("404 Not Found");
    let err = Error::new("load failed").attach_reason(inner.clone());

    assert!(err.reason().and_then(Reason::as_node).is_some_and(|node| node.ptr_eq(&inner)));
    assert!(err.is(&inner));
}

#[test]
fn foreign_reason_matches_by_text() {
    let err = Error::new("read failed").attach_reason(eof());

    assert!(err.is(&io::Error::new(io::ErrorKind::Other, "EOF")));
    assert!(!err.is(&io::Error::new(io::ErrorKind::Other, "closed")));
}

#[test]
fn unrelated_targets_do_not_match() {
    let err = Error::new("404 Not Found").attach_detail(format_args!("user 7"));

    assert!(!err.is(&Error::new("500 Internal Server Error")));
    assert!(!err.matches(None));
    assert!(err.matches(Some(&Error::new("404 Not Found"))));
    assert!(!err.is_any(&[]));
    assert!(err.is_any(&[&Error::new("401 Unauthorized"), &Error::new("404 Not Found")]));
}

#[test]
fn find_reason_searches_the_whole_chain() {
    let err = Error::new("outer").attach_reason(Error::new("middle").attach_reason(eof()));

    let found = err.find_reason::<io::Error>().expect("io error in chain");
    assert_eq!(found.kind(), io::ErrorKind::UnexpectedEof);
    assert!(err.find_reason::<std::fmt::Error>().is_none());
}

#[test]
fn source_exposes_the_reason() {
    use std::error::Error as _;

    let err = Error::new("outer").attach_reason(eof());
    assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("EOF"));
    assert!(Error::new("leaf").source().is_none());
}

#[test]
fn shared_node_can_be_decorated_from_many_threads() {
    let base = Error::new("503 Service Unavailable");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let base = base.clone();
            thread::spawn(move || base.attach_detail(format_args!("worker {i}")))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let err = handle.join().unwrap();
        assert_eq!(err.detail(), format!("worker {i}"));
        assert!(err.prototype().is_some_and(|proto| proto.ptr_eq(&base)));
    }

    assert!(base.detail().is_empty());
    assert!(!base.is_decorated());
}
