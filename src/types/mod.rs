//! Error node types and their renderings.
//!
//! This module provides the [`Error`] node, the [`Reason`] link to its cause,
//! the leveled text [`Render`] and the detached [`View`].
//!
//! # Examples
//!
//! ```
//! use errx::{Error, Verbosity};
//!
//! let err = Error::new("error 3").attach_detail(format_args!("some {} msg", 42));
//!
//! assert_eq!(err.render(Verbosity::Plain).to_string(), "> error 3 (some 42 msg)");
//! assert_eq!(err.export().detail, "some 42 msg");
//! ```
use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::stack::Frame;

pub mod error;
pub mod error_formatter;
pub mod reason;
pub mod view;

pub use error::*;
pub use error_formatter::*;
pub use reason::*;
pub use view::*;

/// Maximum number of reason links followed by formatting, export and
/// identity matching. Deeper links are silently dropped.
pub const MAX_DEPTH: usize = 10;

/// Captured call stack, innermost frame first.
///
/// Uses inline storage for up to 8 frames to avoid a second allocation for
/// shallow stacks.
pub type Stack = SmallVec<[Frame; 8]>;

/// Debug metadata: label to pretty-printed value.
pub type DebugMap = BTreeMap<String, String>;
