//! Detached, serialization-friendly copy of an error chain.
//!
//! A [`View`] holds plain strings only, so it can be inspected, compared,
//! serialized with `serde` (with the `serde` feature) or encoded with the
//! binary codec, independently of the nodes it was exported from.
//!
//! # Examples
//!
//! ```
//! use errx::{Error, View};
//!
//! let view = Error::new("404 Not Found").attach_detail(format_args!("user {}", 7)).export();
//! assert_eq!(view.text, "404 Not Found");
//! assert_eq!(view.detail, "user 7");
//!
//! let back = Error::from(view);
//! assert_eq!(back.detail(), "user 7");
//! assert!(back.stack().is_empty());
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::macros::log_event;
use crate::types::{DebugMap, Error, Reason, MAX_DEPTH};

/// Content of one node plus, recursively, its reason.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct View {
    pub text: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    pub detail: String,
    /// Rendered frames, `"file:line -> function()"`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub stack: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "DebugMap::is_empty"))]
    pub debug: DebugMap,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub next: Option<Box<View>>,
}

impl View {
    /// View with only a text, as produced for foreign causes.
    pub fn leaf(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    /// Iterates over this view and its `next` views.
    pub fn iter(&self) -> impl Iterator<Item = &View> {
        core::iter::successors(Some(self), |view| view.next.as_deref())
    }

    /// Clears the stack of this view and every `next` view.
    pub fn without_stacks(mut self) -> Self {
        let mut current = Some(&mut self);
        while let Some(view) = current {
            view.stack.clear();
            current = view.next.as_deref_mut();
        }
        self
    }

    /// Rebuilds the error chain. Stacks and prototypes are not restored.
    pub fn into_error(self) -> Error {
        Error::from(self)
    }
}

impl Error {
    /// Exports the node and up to [`MAX_DEPTH`] reasons into a [`View`].
    pub fn export(&self) -> View {
        export_node(self, 0)
    }
}

fn export_node(node: &Error, depth: usize) -> View {
    let mut view = View {
        text: node.text().to_owned(),
        detail: node.detail().to_owned(),
        stack: node.stack().iter().map(ToString::to_string).collect(),
        debug: node.debug().clone(),
        next: None,
    };

    match node.reason() {
        Some(_) if depth >= MAX_DEPTH => {
            log_event!(trace, depth, "reason chain truncated while exporting");
        }
        Some(Reason::Node(next)) => view.next = Some(Box::new(export_node(next, depth + 1))),
        Some(Reason::Foreign(err)) => view.next = Some(Box::new(View::leaf(err.to_string()))),
        None => {}
    }

    view
}

impl From<&Error> for View {
    fn from(err: &Error) -> Self {
        err.export()
    }
}

/// Rebuilds from the innermost view outwards, so arbitrarily long chains do
/// not recurse.
impl From<View> for Error {
    fn from(view: View) -> Self {
        let mut outer = Vec::new();
        let mut current = view;
        while let Some(next) = current.next.take() {
            outer.push(current);
            current = *next;
        }

        let mut node = Error::from_parts(current.text, current.detail, current.debug, None);
        for view in outer.into_iter().rev() {
            node = Error::from_parts(view.text, view.detail, view.debug, Some(Reason::Node(node)));
        }
        node
    }
}
