//! Free functions over arbitrary error chains.
//!
//! These follow the standard `source()` convention, so they work with any
//! error type and see through [`Error`](crate::Error) nodes, whose `source()` is their
//! reason.
//!
//! # Examples
//!
//! ```
//! use errx::{chain, Error};
//! use std::sync::Arc;
//!
//! let eof: errx::SharedError = Arc::new(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
//! let base = Error::new("x");
//! let err = base.attach_shared_reason(eof.clone());
//!
//! assert!(chain::is(&err, &[&base]));
//! assert!(chain::is(&err, &[&*eof]));
//! assert!(err.reason().is_some_and(|reason| reason.is_same(&*eof)));
//! assert_eq!(chain::chain(&err).count(), 2);
//! ```

use std::error::Error as StdError;

use crate::types::error::compare::{matches_foreign, target_text};
use crate::types::MAX_DEPTH;

/// Reports whether `err` matches any of `targets`.
///
/// [`Error`](crate::Error) values use [`Error::is`](crate::Error::is); other errors match a target by
/// identity or equal text anywhere in their `source()` chain. An empty target
/// list never matches.
pub fn is(err: &(dyn StdError + 'static), targets: &[&(dyn StdError + 'static)]) -> bool {
    targets.iter().any(|target| {
        let text = target_text(*target);
        matches_foreign(err, *target, &text, 0)
    })
}

/// The direct cause of `err`, as reported by `source()`.
pub fn unwrap<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    err.source()
}

/// Finds the first error of type `T` in the chain starting at `err` itself.
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(err).find_map(|err| err.downcast_ref::<T>())
}

/// Iterates over `err` and its causes, at most [`MAX_DEPTH`] links deep.
pub fn chain<'a>(err: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain { next: Some(err), depth: 0 }
}

/// Iterator returned by [`chain`].
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
    depth: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        if self.depth < MAX_DEPTH {
            self.next = current.source();
            self.depth += 1;
        }
        Some(current)
    }
}

impl core::fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Chain").field("depth", &self.depth).finish_non_exhaustive()
    }
}
