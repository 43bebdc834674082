//! Chainable, decoratable errors with identity matching, leveled rendering
//! and a portable export format.
//!
//! An [`Error`] is an immutable node: a display text plus optional detail,
//! debug metadata, captured call stack and a cause. Decorating a node never
//! mutates it; it returns a new node that remembers the original as its
//! prototype, so a decorated copy of a shared sentinel still matches the
//! sentinel with [`Error::is`].
//!
//! # Examples
//!
//! ## Decorate a sentinel
//!
//! ```
//! use errx::sentinel::NOT_FOUND;
//!
//! let err = NOT_FOUND.attach_detail(format_args!("user {}", 7));
//!
//! assert!(err.is(&*NOT_FOUND));
//! assert_eq!(err.to_string(), "404 Not Found");
//! assert_eq!(err.detail(), "user 7");
//! ```
//!
//! ## Wrap a foreign cause
//!
//! ```
//! use errx::{Error, Verbosity};
//!
//! let eof = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "EOF");
//! let err = Error::new("read failed").attach_reason(eof);
//!
//! assert_eq!(err.render(Verbosity::Verbose).to_string(), "> read failed\n|-> EOF");
//! assert_eq!(format!("{err:#}"), "> read failed\n|-> EOF");
//! ```
//!
//! ## Ship it across a process boundary
//!
//! ```
//! use errx::Error;
//!
//! let err = Error::new("load failed").attach_reason(Error::new("timeout"));
//! let back = Error::decode(&err.encode()).unwrap();
//!
//! assert_eq!(back.export(), err.export().without_stacks());
//! ```

/// Matching and traversal over any `source()` chain
pub mod chain;
/// Protobuf-compatible binary encoding and its buffer pool
pub mod codec;
/// Runtime printf-style detail templates
pub mod format;
/// Decoration macros
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// HTTP status sentinels
pub mod sentinel;
/// Call stack capture and the process-wide capture policy
pub mod stack;
/// Extension traits and the debug value printer
pub mod traits;
/// The error node, its cause, renderings and exported view
pub mod types;

pub use chain::{find, is, unwrap};
pub use codec::{BufferPool, DecodeError, PoolConfig};
pub use format::{format_template, Arg};
pub use stack::{Frame, StackPolicy};
pub use types::{DebugMap, Error, Reason, Render, SharedError, Stack, Verbosity, View, MAX_DEPTH};
