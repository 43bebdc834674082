//! Chain-aware identity matching.

use std::borrow::Cow;
use std::error::Error as StdError;

use super::Error;
use crate::macros::log_event;
use crate::types::{Reason, MAX_DEPTH};

impl Error {
    /// Reports whether this error is, or was derived from, or was caused by
    /// `target`.
    ///
    /// Checked in order: same node, equal text (`target.to_string()` for
    /// foreign errors), the prototype, then the reason chain. Foreign causes
    /// match on identity or equal text and have their own `source()` chain
    /// searched. At most [`MAX_DEPTH`] reason links are followed.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::Error;
    ///
    /// let not_found = Error::new("404 Not Found");
    /// let err = Error::new("load failed").attach_reason(not_found.attach_detail(format_args!("user 7")));
    ///
    /// assert!(err.is(&not_found));
    /// assert!(err.is(&Error::new("load failed")));
    /// assert!(!err.is(&Error::new("500 Internal Server Error")));
    /// ```
    pub fn is(&self, target: &(dyn StdError + 'static)) -> bool {
        let text = target_text(target);
        matches_node(self, target, &text, 0)
    }

    /// Like [`is`](Error::is) with a possibly absent target; `None` never matches.
    pub fn matches(&self, target: Option<&(dyn StdError + 'static)>) -> bool {
        target.is_some_and(|target| self.is(target))
    }

    /// Whether any of `targets` matches.
    pub fn is_any(&self, targets: &[&(dyn StdError + 'static)]) -> bool {
        targets.iter().any(|target| self.is(*target))
    }

    /// Finds the first cause in the reason chain of type `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::Error;
    /// use std::num::ParseIntError;
    ///
    /// let cause = "x".parse::<u8>().unwrap_err();
    /// let err = Error::new("bad input").attach_reason(cause.clone());
    /// assert_eq!(err.find_reason::<ParseIntError>(), Some(&cause));
    /// ```
    pub fn find_reason<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        crate::chain::chain(self).skip(1).find_map(|err| err.downcast_ref::<T>())
    }
}

pub(crate) fn target_text<'a>(target: &'a (dyn StdError + 'static)) -> Cow<'a, str> {
    match target.downcast_ref::<Error>() {
        Some(node) => Cow::Borrowed(node.text()),
        None => Cow::Owned(target.to_string()),
    }
}

pub(crate) fn matches_node(
    node: &Error,
    target: &(dyn StdError + 'static),
    text: &str,
    depth: usize,
) -> bool {
    if target.downcast_ref::<Error>().is_some_and(|other| node.ptr_eq(other)) {
        return true;
    }

    if node.text() == text {
        return true;
    }

    // The prototype is never decorated itself, so this is a single extra hop.
    if node.prototype().is_some_and(|proto| matches_node(proto, target, text, depth)) {
        return true;
    }

    let Some(reason) = node.reason() else {
        return false;
    };

    if depth >= MAX_DEPTH {
        log_event!(trace, depth, "reason chain truncated while matching");
        return false;
    }

    match reason {
        Reason::Node(next) => matches_node(next, target, text, depth + 1),
        Reason::Foreign(err) => matches_foreign(err.as_ref(), target, text, depth + 1),
    }
}

pub(crate) fn matches_foreign(
    err: &(dyn StdError + 'static),
    target: &(dyn StdError + 'static),
    text: &str,
    depth: usize,
) -> bool {
    let mut current = Some(err);
    let mut depth = depth;

    while let Some(err) = current {
        if let Some(node) = err.downcast_ref::<Error>() {
            return matches_node(node, target, text, depth);
        }

        if core::ptr::addr_eq(err as *const dyn StdError, target as *const dyn StdError)
            || err.to_string() == text
        {
            return true;
        }

        if depth >= MAX_DEPTH {
            log_event!(trace, depth, "source chain truncated while matching");
            return false;
        }
        current = err.source();
        depth += 1;
    }

    false
}
