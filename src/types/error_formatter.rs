//! Leveled rendering of error chains.
//!
//! Output layout, one node per `|-` segment:
//!
//! ```text
//! > error 3 (some 42 msg)
//! |   err1: Custom { kind: UnexpectedEof, error: "EOF" }
//! |       handler.rs:42 -> handler::load_user()
//! |       main.rs:7 -> app::main()
//! |-> error 2
//! |   list: ["some", "test"]
//! |-> EOF
//! ```
//!
//! The first line is all a [`Verbosity::Plain`] render prints. Debug entries
//! and reasons need [`Verbosity::Verbose`]; stack frames need
//! [`Verbosity::Extended`]. Log consumers parse these prefixes, so they are
//! fixed.

use core::fmt::{self, Display};

use crate::macros::log_event;
use crate::types::{Error, Reason, MAX_DEPTH};

const DEBUG_PREFIX: &str = "\n|   ";
const FRAME_PREFIX: &str = "\n|       ";
const REASON_PREFIX: &str = "\n|-";

/// How much of a node and its chain to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verbosity {
    /// Text and detail of the node itself.
    #[default]
    Plain,
    /// Adds debug entries and the reason chain.
    Verbose,
    /// Adds the captured stack of every node in the chain.
    Extended,
}

impl Verbosity {
    #[inline]
    fn shows_chain(self) -> bool {
        self != Self::Plain
    }

    #[inline]
    fn shows_stack(self) -> bool {
        self == Self::Extended
    }
}

/// Displayable rendering of an [`Error`] at a fixed [`Verbosity`].
#[derive(Clone, Copy)]
#[must_use]
pub struct Render<'a> {
    error: &'a Error,
    verbosity: Verbosity,
}

impl<'a> Render<'a> {
    pub fn new(error: &'a Error, verbosity: Verbosity) -> Self {
        Self { error, verbosity }
    }

    /// Switches the verbosity.
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

impl Display for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self.error, self.verbosity, 0)
    }
}

impl fmt::Debug for Render<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Render")
            .field("text", &self.error.text())
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &Error, verbosity: Verbosity, depth: usize) -> fmt::Result {
    write!(f, "> {}", node.text())?;

    if !node.detail().is_empty() {
        write!(f, " ({})", node.detail())?;
    }

    if !verbosity.shows_chain() {
        return Ok(());
    }

    for (key, value) in node.debug() {
        write!(f, "{DEBUG_PREFIX}{key}: {value}")?;
    }

    if verbosity.shows_stack() {
        for frame in node.stack() {
            write!(f, "{FRAME_PREFIX}{frame}")?;
        }
    }

    let Some(reason) = node.reason() else {
        return Ok(());
    };

    if depth >= MAX_DEPTH {
        log_event!(trace, depth, "reason chain truncated while rendering");
        return Ok(());
    }

    f.write_str(REASON_PREFIX)?;
    match reason {
        Reason::Node(next) => write_node(f, next, verbosity, depth + 1),
        Reason::Foreign(err) => write!(f, "> {err}"),
    }
}

impl Error {
    /// Renders the error at the given verbosity.
    ///
    /// # Examples
    ///
    /// ```
    /// use errx::{Error, Verbosity};
    ///
    /// let err = Error::new("error 2")
    ///     .attach_debug([("list", &vec!["some", "test"] as &dyn std::fmt::Debug)])
    ///     .attach_reason(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "EOF"));
    ///
    /// assert_eq!(err.render(Verbosity::Plain).to_string(), "> error 2");
    /// assert_eq!(
    ///     err.render(Verbosity::Verbose).to_string(),
    ///     "> error 2\n|   list: [\"some\", \"test\"]\n|-> EOF"
    /// );
    /// ```
    pub fn render(&self, verbosity: Verbosity) -> Render<'_> {
        Render::new(self, verbosity)
    }
}
