//! Pretty-printing capability for debug values.
//!
//! [`Error::attach_debug`](crate::Error::attach_debug) stores every value as a
//! string produced by a [`Pretty`] implementation. The exact text is not part
//! of any contract; swap the printer with
//! [`Error::attach_debug_with`](crate::Error::attach_debug_with).

use core::fmt;

/// Turns an arbitrary value into a deterministic display string.
pub trait Pretty {
    fn pretty(&self, value: &dyn fmt::Debug) -> String;
}

/// Single-line `{:?}` rendering. The default printer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compact;

impl Pretty for Compact {
    fn pretty(&self, value: &dyn fmt::Debug) -> String {
        format!("{value:?}")
    }
}

/// Multi-line `{:#?}` rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expanded;

impl Pretty for Expanded {
    fn pretty(&self, value: &dyn fmt::Debug) -> String {
        format!("{value:#?}")
    }
}

impl<P: Pretty + ?Sized> Pretty for &P {
    fn pretty(&self, value: &dyn fmt::Debug) -> String {
        (**self).pretty(value)
    }
}
