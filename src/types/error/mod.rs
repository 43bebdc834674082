//! The error node and its decorations.
//!
//! An [`Error`] is a cheap handle to immutable state. Decorations never touch
//! the receiver: each one returns a new node that shares the unchanged fields
//! and overrides the decorated one, so a sentinel read by many threads at once
//! can be decorated concurrently without locks.
//!
//! The first decoration of a node captures the call stack and records the
//! node as the *prototype* of the result. Later decorations keep both, which
//! is what lets a heavily decorated error still match its original sentinel.

use core::fmt;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::panic::Location;
use std::sync::Arc;

use crate::format::{format_template, Arg};
use crate::stack::{self, Frame};
use crate::traits::{Compact, Pretty};
use crate::types::{DebugMap, Reason, SharedError, Stack};

pub(crate) mod compare;
mod traits;

/// Chainable, decoratable error value.
///
/// # Examples
///
/// ```
/// use errx::Error;
///
/// let base = Error::new("x");
/// let eof = std::io::Error::from(std::io::ErrorKind::UnexpectedEof);
/// let decorated = base.attach_reason(eof);
///
/// assert!(decorated.is(&base));
/// assert_eq!(decorated.text(), "x");
/// assert!(base.reason().is_none());
/// ```
#[derive(Clone)]
#[must_use]
pub struct Error {
    pub(crate) inner: Arc<Inner>,
}

#[derive(Clone)]
pub(crate) struct Inner {
    pub(crate) text: Cow<'static, str>,
    pub(crate) detail: String,
    pub(crate) debug: DebugMap,
    pub(crate) stack: Stack,
    pub(crate) reason: Option<Reason>,
    pub(crate) prototype: Option<Error>,
}

impl Error {
    /// Creates an undecorated node: no detail, debug, stack, reason or prototype.
    #[inline]
    pub fn new(text: impl Into<Cow<'static, str>>) -> Self {
        Self::from_inner(Inner {
            text: text.into(),
            detail: String::new(),
            debug: DebugMap::new(),
            stack: Stack::new(),
            reason: None,
            prototype: None,
        })
    }

    /// Rebuilds an undecorated node from transported content.
    pub(crate) fn from_parts(text: String, detail: String, debug: DebugMap, reason: Option<Reason>) -> Self {
        Self::from_inner(Inner {
            text: Cow::Owned(text),
            detail,
            debug,
            stack: Stack::new(),
            reason,
            prototype: None,
        })
    }

    #[inline]
    fn from_inner(inner: Inner) -> Self {
        Self { inner: Arc::new(inner) }
    }

    /// The display message given at construction.
    #[inline]
    pub fn text(&self) -> &str {
        &self.inner.text
    }

    /// The user-facing detail, empty when absent.
    #[inline]
    pub fn detail(&self) -> &str {
        &self.inner.detail
    }

    /// Debug metadata, label to pretty-printed value.
    #[inline]
    pub fn debug(&self) -> &DebugMap {
        &self.inner.debug
    }

    /// Captured call stack, innermost first. Empty until the first decoration.
    #[inline]
    pub fn stack(&self) -> &[Frame] {
        &self.inner.stack
    }

    /// The wrapped cause, if any.
    #[inline]
    pub fn reason(&self) -> Option<&Reason> {
        self.inner.reason.as_ref()
    }

    /// The undecorated node this one was derived from.
    #[inline]
    pub fn prototype(&self) -> Option<&Error> {
        self.inner.prototype.as_ref()
    }

    /// Whether this node was produced by a decoration.
    #[inline]
    pub fn is_decorated(&self) -> bool {
        self.inner.prototype.is_some()
    }

    /// Whether both handles refer to the same node.
    #[inline]
    pub fn ptr_eq(&self, other: &Error) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Captures the call stack.
    ///
    /// Already decorated nodes are returned as they are (the same node, not a
    /// copy), so the stack always points at the first decoration.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::Error;
    ///
    /// let once = Error::new("some msg").attach_stack();
    /// let twice = once.attach_stack();
    /// assert!(once.ptr_eq(&twice));
    /// ```
    #[track_caller]
    pub fn attach_stack(&self) -> Self {
        if self.is_decorated() {
            return self.clone();
        }
        Self::from_inner(self.derive(Location::caller()))
    }

    /// Sets the cause of the error.
    ///
    /// A cause that is itself an [`Error`] becomes part of the chain and is
    /// formatted and exported recursively; any other error is kept as a leaf.
    #[track_caller]
    pub fn attach_reason<E>(&self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut inner = self.derive(Location::caller());
        inner.reason = Some(Reason::from_error(cause));
        Self::from_inner(inner)
    }

    /// Sets an already shared cause, keeping its identity for
    /// [`Reason::is_same`] and `Arc` based comparisons.
    #[track_caller]
    pub fn attach_shared_reason(&self, cause: SharedError) -> Self {
        let mut inner = self.derive(Location::caller());
        inner.reason = Some(Reason::from_shared(cause));
        Self::from_inner(inner)
    }

    /// Sets the user-facing detail from pre-checked format arguments.
    ///
    /// A `Display` implementation that fails while formatting leaves the
    /// `%!(ERROR)` marker instead of panicking.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::Error;
    ///
    /// let err = Error::new("404 Not Found").attach_detail(format_args!("user {}", 7));
    /// assert_eq!(err.detail(), "user 7");
    /// ```
    #[track_caller]
    pub fn attach_detail(&self, args: fmt::Arguments<'_>) -> Self {
        let mut detail = String::new();
        if fmt::write(&mut detail, args).is_err() {
            detail.push_str("%!(ERROR)");
        }
        self.with_detail(Location::caller(), detail)
    }

    /// Sets the user-facing detail from a runtime printf-style template.
    ///
    /// Never fails; see [`format_template`] for the markers produced by bad
    /// verbs and argument mismatches.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::Error;
    ///
    /// let err = Error::new("404 Not Found").attach_detail_template("user %d", &[7.into()]);
    /// assert_eq!(err.detail(), "user 7");
    ///
    /// let err = Error::new("404 Not Found").attach_detail_template("user %d", &[]);
    /// assert_eq!(err.detail(), "user %!d(MISSING)");
    /// ```
    #[track_caller]
    pub fn attach_detail_template(&self, template: &str, args: &[Arg<'_>]) -> Self {
        self.with_detail(Location::caller(), format_template(template, args))
    }

    /// Replaces the debug metadata, rendering each value with `{:?}`.
    ///
    /// The previous map, if any, is discarded rather than merged.
    #[track_caller]
    pub fn attach_debug<'a, I, K>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, &'a dyn fmt::Debug)>,
        K: Into<String>,
    {
        self.attach_debug_with(Compact, entries)
    }

    /// Replaces the debug metadata, rendering each value with `printer`.
    #[track_caller]
    pub fn attach_debug_with<'a, P, I, K>(&self, printer: P, entries: I) -> Self
    where
        P: Pretty,
        I: IntoIterator<Item = (K, &'a dyn fmt::Debug)>,
        K: Into<String>,
    {
        let mut inner = self.derive(Location::caller());
        inner.debug = entries
            .into_iter()
            .map(|(key, value)| (key.into(), printer.pretty(value)))
            .collect();
        Self::from_inner(inner)
    }

    fn with_detail(&self, caller: &'static Location<'static>, detail: String) -> Self {
        let mut inner = self.derive(caller);
        inner.detail = detail;
        Self::from_inner(inner)
    }

    /// State for a new decorated node derived from this one.
    fn derive(&self, caller: &'static Location<'static>) -> Inner {
        if self.is_decorated() {
            return (*self.inner).clone();
        }

        Inner {
            text: self.inner.text.clone(),
            detail: self.inner.detail.clone(),
            debug: self.inner.debug.clone(),
            stack: stack::capture(caller),
            reason: self.inner.reason.clone(),
            prototype: Some(self.clone()),
        }
    }
}
