//! Process-wide sentinel errors for the common HTTP statuses.
//!
//! Each sentinel is built once on first use, so every decoration of it can be
//! matched back with [`Error::is`].
//!
//! # Examples
//!
//! ```
//! use errx::sentinel::{self, NOT_FOUND};
//!
//! let err = NOT_FOUND.attach_detail(format_args!("user {}", 7));
//! assert!(err.is(&*NOT_FOUND));
//! assert_eq!(sentinel::status(&err), Some(404));
//! ```

use std::sync::LazyLock;

use crate::types::Error;

macro_rules! sentinels {
    ($($name:ident = $status:literal $text:literal;)+) => {
        $(
            #[doc = concat!("`", $text, "`")]
            pub static $name: LazyLock<Error> = LazyLock::new(|| Error::new($text));
        )+

        /// Every sentinel with its status code, in status order.
        pub fn all() -> [(u16, &'static Error); 10] {
            [$(($status, &*$name)),+]
        }
    };
}

sentinels! {
    BAD_REQUEST = 400 "400 Bad Request";
    UNAUTHORIZED = 401 "401 Unauthorized";
    FORBIDDEN = 403 "403 Forbidden";
    NOT_FOUND = 404 "404 Not Found";
    NOT_ALLOWED = 405 "405 Method Not Allowed";
    NOT_ACCEPTABLE = 406 "406 Not Acceptable";
    UNPROCESSABLE = 422 "422 Unprocessable Entity";
    INTERNAL = 500 "500 Internal Server Error";
    NOT_IMPLEMENTED = 501 "501 Not Implemented";
    UNAVAILABLE = 503 "503 Service Unavailable";
}

/// The sentinel for an HTTP status code, if there is one.
pub fn from_status(status: u16) -> Option<&'static Error> {
    all()
        .into_iter()
        .find_map(|(code, err)| (code == status).then_some(err))
}

/// Status code of the first sentinel `err` matches.
pub fn status(err: &Error) -> Option<u16> {
    all()
        .into_iter()
        .find_map(|(code, sentinel)| err.is(sentinel).then_some(code))
}
