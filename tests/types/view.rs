use std::io;

use errx::{debug_map, Error, View, MAX_DEPTH};

#[test]
fn export_copies_node_content() {
    let view = Error::new("404 Not Found").attach_detail(format_args!("user {}", 7)).export();

    assert_eq!(view.text, "404 Not Found");
    assert_eq!(view.detail, "user 7");
    assert!(!view.stack.is_empty());
    assert!(view.stack.iter().all(|frame| frame.contains(" -> ")));
    assert!(view.next.is_none());

    let templated = Error::new("404 Not Found")
        .attach_detail_template("user %d", &[7.into()])
        .export();
    assert_eq!(templated.detail, view.detail);
}

#[test]
fn foreign_reason_exports_as_a_leaf() {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "EOF");
    let view = Error::new("read failed").attach_reason(eof).export();

    assert_eq!(view.next.as_deref(), Some(&View::leaf("EOF")));
}

#[test]
fn export_is_limited_to_max_depth_links() {
    let mut err = Error::new("level 0");
    for level in 1..=12 {
        err = Error::new(format!("level {level}")).attach_reason(err);
    }

    let view = err.export();
    assert_eq!(view.iter().count(), MAX_DEPTH + 1);
    assert_eq!(view.iter().last().map(|v| v.text.as_str()), Some("level 2"));
}

#[test]
fn import_rebuilds_an_undecorated_chain() {
    let err = Error::new("load failed")
        .attach_debug(debug_map!("id" => 7))
        .attach_reason(Error::new("404 Not Found").attach_detail(format_args!("user 7")));

    let back = err.export().into_error();

    assert_eq!(back.text(), "load failed");
    assert_eq!(back.debug()["id"], "7");
    assert!(back.stack().is_empty());
    assert!(back.prototype().is_none());

    let inner = back.reason().and_then(|reason| reason.as_node()).expect("node reason");
    assert_eq!(inner.text(), "404 Not Found");
    assert_eq!(inner.detail(), "user 7");
    assert!(inner.stack().is_empty());

    assert_eq!(back.export(), err.export().without_stacks());
}

#[test]
fn import_handles_long_chains() {
    let mut view = View::leaf("0");
    for level in 1..1000 {
        view = View { next: Some(Box::new(view)), ..View::leaf(level.to_string()) };
    }

    let err = Error::from(view);
    assert_eq!(err.text(), "999");
    assert_eq!(err.export().iter().count(), MAX_DEPTH + 1);
}

#[cfg(feature = "serde")]
#[test]
fn view_serializes_to_compact_json() {
    let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "EOF");
    let view = Error::new("404 Not Found")
        .attach_detail(format_args!("user 7"))
        .attach_reason(eof)
        .export()
        .without_stacks();

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "text": "404 Not Found",
            "detail": "user 7",
            "next": { "text": "EOF" }
        })
    );

    let back: View = serde_json::from_value(json).unwrap();
    assert_eq!(back, view);
}

#[cfg(feature = "serde")]
#[test]
fn view_deserializes_with_missing_fields() {
    let view: View = serde_json::from_str(r#"{"text":"x","debug":{"k":"v"}}"#).unwrap();

    assert_eq!(view.text, "x");
    assert!(view.detail.is_empty());
    assert_eq!(view.debug["k"], "v");
}
