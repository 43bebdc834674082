//! Extension and capability traits.
//!
//! - [`Pretty`]: replaceable printer used to stringify debug values
//! - [`ResultExt`]: wraps a foreign `Result` error as the reason of a node
//! - [`ErrorResultExt`]: decorates `Result<T, Error>` failures in place
//!
//! # Examples
//!
//! ```
//! use errx::traits::{Expanded, ResultExt};
//! use errx::Error;
//!
//! let err = "nope".parse::<i32>().wrap(&Error::new("bad input")).unwrap_err();
//! let err = err.attach_debug_with(&Expanded, [("pair", &(1, 2) as &dyn std::fmt::Debug)]);
//! assert!(err.debug()["pair"].contains('\n'));
//! ```

pub mod pretty;
pub mod result_ext;

pub use pretty::{Compact, Expanded, Pretty};
pub use result_ext::{ErrorResultExt, ResultExt};
