//! Extension traits for wrapping `Result` errors into [`Error`] nodes.
//!
//! [`ResultExt`] turns any foreign error into the cause of a decorated
//! sentinel without a `.map_err()` closure, and [`ErrorResultExt`] decorates
//! errors that are already nodes. Both keep the caller's location for stack
//! capture.
//!
//! # Examples
//!
//! ```
//! use errx::sentinel::NOT_FOUND;
//! use errx::traits::ResultExt;
//!
//! fn load_config() -> Result<String, errx::Error> {
//!     std::fs::read_to_string("/definitely/missing/config.toml").wrap(&NOT_FOUND)
//! }
//!
//! let err = load_config().unwrap_err();
//! assert!(err.is(&*NOT_FOUND));
//! assert!(err.reason().is_some());
//! ```

use std::error::Error as StdError;

use crate::types::Error;

/// Wraps foreign `Result` errors as the reason of an [`Error`].
pub trait ResultExt<T> {
    /// Replaces the error with `base.attach_reason(err)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::{Error, traits::ResultExt};
    ///
    /// let parsed = "x1".parse::<u32>().wrap(&Error::new("bad port"));
    /// assert_eq!(parsed.unwrap_err().text(), "bad port");
    /// ```
    fn wrap(self, base: &Error) -> Result<T, Error>;

    /// Like [`wrap`](ResultExt::wrap), building the base node only on failure.
    fn wrap_with<F>(self, base: F) -> Result<T, Error>
    where
        F: FnOnce() -> Error;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    #[track_caller]
    #[inline]
    fn wrap(self, base: &Error) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(base.attach_reason(err)),
        }
    }

    #[track_caller]
    #[inline]
    fn wrap_with<F>(self, base: F) -> Result<T, Error>
    where
        F: FnOnce() -> Error,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(base().attach_reason(err)),
        }
    }
}

/// Decorates errors of results that already carry an [`Error`].
///
/// # Examples
///
/// ```
/// use errx::{Error, traits::ErrorResultExt};
///
/// let result: Result<(), Error> = Err(Error::new("404 Not Found"));
/// let err = result.detail_with(|| format!("user {}", 7)).unwrap_err();
/// assert_eq!(err.detail(), "user 7");
/// ```
pub trait ErrorResultExt<T> {
    /// Attaches a lazily built detail message on failure.
    fn detail_with<F>(self, detail: F) -> Self
    where
        F: FnOnce() -> String;

    /// Attaches a cause on failure.
    fn reason<E>(self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static;
}

impl<T> ErrorResultExt<T> for Result<T, Error> {
    #[track_caller]
    #[inline]
    fn detail_with<F>(self, detail: F) -> Self
    where
        F: FnOnce() -> String,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.attach_detail(format_args!("{}", detail()))),
        }
    }

    #[track_caller]
    #[inline]
    fn reason<E>(self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.attach_reason(cause)),
        }
    }
}
