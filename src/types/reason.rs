//! The cause wrapped by a decorated [`Error`].

use core::any::Any;
use core::fmt;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::types::Error;

/// Shared foreign error, as stored in [`Reason::Foreign`].
pub type SharedError = Arc<dyn StdError + Send + Sync + 'static>;

/// Cause of an [`Error`].
///
/// Causes are shared rather than owned: several nodes may wrap the same
/// underlying value, and equality on `Reason` is identity.
#[derive(Clone)]
pub enum Reason {
    /// Another node of this crate; formatted and exported recursively.
    Node(Error),
    /// Any other error value; formatted and exported as a leaf.
    Foreign(SharedError),
}

impl Reason {
    /// Wraps an owned cause, recognising nodes of this crate.
    pub(crate) fn from_error<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match (&cause as &dyn Any).downcast_ref::<Error>() {
            Some(node) => Self::Node(node.clone()),
            None => Self::Foreign(Arc::new(cause)),
        }
    }

    /// Wraps an already shared cause, keeping its identity.
    pub(crate) fn from_shared(cause: SharedError) -> Self {
        match cause.downcast_ref::<Error>() {
            Some(node) => Self::Node(node.clone()),
            None => Self::Foreign(cause),
        }
    }

    /// Returns the node if this cause is one.
    pub fn as_node(&self) -> Option<&Error> {
        match self {
            Self::Node(node) => Some(node),
            Self::Foreign(_) => None,
        }
    }

    /// Returns the cause as a standard error trait object.
    pub fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::Node(node) => node,
            Self::Foreign(err) => err.as_ref(),
        }
    }

    /// Whether `other` is the very value this cause refers to.
    pub fn is_same(&self, other: &(dyn StdError + 'static)) -> bool {
        let own: &(dyn StdError + 'static) = self.as_error();
        core::ptr::addr_eq(own as *const dyn StdError, other as *const dyn StdError)
    }
}

impl PartialEq for Reason {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Node(a), Self::Node(b)) => a.ptr_eq(b),
            (Self::Foreign(a), Self::Foreign(b)) => {
                core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => fmt::Display::fmt(node.text(), f),
            Self::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl fmt::Debug for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(node) => f.debug_tuple("Node").field(&node.text()).finish(),
            Self::Foreign(err) => f.debug_tuple("Foreign").field(err).finish(),
        }
    }
}

impl From<Error> for Reason {
    fn from(node: Error) -> Self {
        Self::Node(node)
    }
}

impl From<SharedError> for Reason {
    fn from(cause: SharedError) -> Self {
        Self::from_shared(cause)
    }
}
