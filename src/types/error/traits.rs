use super::Error;
use crate::types::Verbosity;
use core::fmt;
use std::borrow::Cow;

/// `{}` prints the bare text, `{:#}` the verbose chain and `{:+#}` the
/// verbose chain with stacks.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f.pad(self.text());
        }
        let verbosity = if f.sign_plus() { Verbosity::Extended } else { Verbosity::Verbose };
        fmt::Display::fmt(&self.render(verbosity), f)
    }
}

/// `{:?}` prints the verbose chain and `{:#?}` adds the stacks.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verbosity = if f.alternate() { Verbosity::Extended } else { Verbosity::Verbose };
        fmt::Display::fmt(&self.render(verbosity), f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.reason().map(|reason| reason.as_error() as &(dyn std::error::Error + 'static))
    }
}

impl From<&'static str> for Error {
    #[inline]
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Error {
    #[inline]
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Cow<'static, str>> for Error {
    #[inline]
    fn from(text: Cow<'static, str>) -> Self {
        Self::new(text)
    }
}
