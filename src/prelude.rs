//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use errx::prelude::*;
//!
//! fn read_port(raw: &str) -> Result<u16, Error> {
//!     raw.parse::<u16>().wrap(&BAD_REQUEST)
//! }
//!
//! let err = read_port("http").unwrap_err();
//! assert!(err.is(&*BAD_REQUEST));
//! ```

// Macros
pub use crate::{debug_map, detail};

// Core types
pub use crate::types::{Error, Reason, Verbosity, View};

// Traits
pub use crate::traits::{ErrorResultExt, ResultExt};

// Sentinels
pub use crate::sentinel::{
    BAD_REQUEST, FORBIDDEN, INTERNAL, NOT_ACCEPTABLE, NOT_ALLOWED, NOT_FOUND, NOT_IMPLEMENTED,
    UNAUTHORIZED, UNAVAILABLE, UNPROCESSABLE,
};
