//! Ergonomic macros for decorating [`Error`](crate::Error) values.
//!
//! - [`macro@crate::debug_map`] - Builds a heterogeneous list of debug entries for
//!   [`Error::attach_debug`](crate::Error::attach_debug) without spelling out trait objects.
//! - [`macro@crate::detail`] - Attaches a compile-time checked detail message, keeping the
//!   caller's location for stack capture.
//!
//! # Examples
//!
//! ```
//! use errx::{debug_map, detail, Error};
//!
//! let err = Error::new("404 Not Found");
//! let user = 7;
//! let decorated = detail!(err, "user {}", user).attach_debug(debug_map!(
//!     "user" => user,
//!     "roles" => vec!["admin", "ops"],
//! ));
//!
//! assert_eq!(decorated.detail(), "user 7");
//! assert_eq!(decorated.debug()["roles"], r#"["admin", "ops"]"#);
//! ```

/// Builds a list of `(key, &dyn Debug)` pairs for
/// [`Error::attach_debug`](crate::Error::attach_debug).
///
/// Values of different types can be mixed freely; each value is borrowed, so
/// the result is meant to be passed straight into a decoration call.
///
/// # Examples
///
/// ```
/// use errx::{debug_map, Error};
///
/// let err = Error::new("some msg").attach_debug(debug_map!(
///     "int" => 42,
///     "list" => vec!["some", "test"],
/// ));
///
/// assert_eq!(err.debug()["int"], "42");
/// ```
#[macro_export]
macro_rules! debug_map {
    () => {
        ::std::vec::Vec::<(&str, &dyn ::core::fmt::Debug)>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        [$(($key, &$value as &dyn ::core::fmt::Debug)),+]
    };
}

/// Attaches a formatted detail message to an error.
///
/// Shorthand for `err.attach_detail(format_args!(...))`. Arguments are checked
/// at compile time; use [`Error::attach_detail_template`](crate::Error::attach_detail_template)
/// when the template is only known at runtime.
///
/// # Examples
///
/// ```
/// use errx::{detail, Error};
///
/// let err = detail!(Error::new("error 3"), "some {} {}", 42, "msg");
/// assert_eq!(err.detail(), "some 42 msg");
/// ```
#[macro_export]
macro_rules! detail {
    ($err:expr, $($arg:tt)+) => {
        $err.attach_detail(::core::format_args!($($arg)+))
    };
}

/// Forwards to the matching `tracing` macro when the `tracing` feature is
/// enabled and expands to nothing otherwise.
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {{
        #[cfg(feature = "tracing")]
        {
            ::tracing::$level!($($arg)+);
        }
    }};
}

pub(crate) use log_event;
