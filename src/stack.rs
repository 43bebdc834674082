//! Call-stack capture for decorated errors.
//!
//! Every decoration records where it happened. The capturer walks the active
//! thread's stack through [`std::backtrace::Backtrace`], drops the frames that
//! belong to the capture machinery and to the decoration methods themselves,
//! and keeps the rest as [`Frame`] values, innermost first.
//!
//! How much work is done is governed by the process-wide [`StackPolicy`],
//! read once from the `ERRX_STACK` environment variable (`full`, `caller` or
//! `off`) and adjustable at runtime with [`set_policy`].
//!
//! # Examples
//!
//! ```
//! use errx::stack::{self, StackPolicy};
//! use std::panic::Location;
//!
//! let frames = stack::capture_with(StackPolicy::Caller, Location::caller());
//! assert_eq!(frames.len(), 1);
//! assert!(frames[0].to_string().contains(" -> "));
//! ```
use core::fmt;
use core::str::FromStr;
use std::backtrace::Backtrace;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::macros::log_event;
use crate::types::Stack;

/// Environment variable consulted for the initial [`StackPolicy`].
pub const POLICY_ENV: &str = "ERRX_STACK";

/// Function-name prefixes of frames that never belong in a captured stack.
const SKIPPED_PREFIXES: &[&str] = &[
    "std::backtrace",
    "std::backtrace_rs",
    "backtrace::",
    "errx::stack::",
    "errx::types::error::Error",
    "errx::traits::result_ext::",
];

/// Single resolved stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    file: String,
    line: u32,
    function: String,
}

impl Frame {
    /// Creates a frame, reducing `file` and `function` to their base names.
    pub fn new(file: &str, line: u32, function: &str) -> Self {
        Self { file: file_base_name(file).to_owned(), line, function: function_base_name(function) }
    }

    /// Frame for a `#[track_caller]` location. The enclosing function is not
    /// known at this level, so it is reported as `?`.
    pub fn from_location(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line(), "?")
    }

    /// Base name of the source file.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Function name reduced to its last two path segments.
    pub fn function(&self) -> &str {
        &self.function
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} -> {}()", self.file, self.line, self.function)
    }
}

/// How much of the call stack a decoration records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StackPolicy {
    /// Walk and resolve the whole stack.
    #[default]
    Full,
    /// Record only the decorating call site.
    Caller,
    /// Record nothing. Decorated nodes still keep their prototype.
    Off,
}

impl StackPolicy {
    const fn to_raw(self) -> u8 {
        match self {
            Self::Full => 1,
            Self::Caller => 2,
            Self::Off => 3,
        }
    }

    const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Full),
            2 => Some(Self::Caller),
            3 => Some(Self::Off),
            _ => None,
        }
    }
}

/// Error returned when parsing an unknown [`StackPolicy`] name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stack policy `{0}` (expected `full`, `caller` or `off`)")]
pub struct ParsePolicyError(String);

impl FromStr for StackPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "1" | "on" => Ok(Self::Full),
            "caller" => Ok(Self::Caller),
            "off" | "0" | "none" => Ok(Self::Off),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

const UNSET: u8 = 0;

static POLICY: AtomicU8 = AtomicU8::new(UNSET);

/// Returns the process-wide capture policy, reading [`POLICY_ENV`] on first use.
pub fn policy() -> StackPolicy {
    if let Some(policy) = StackPolicy::from_raw(POLICY.load(Ordering::Relaxed)) {
        return policy;
    }

    let policy = match std::env::var(POLICY_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|_err: ParsePolicyError| {
            log_event!(warn, env = POLICY_ENV, value = %value, "invalid stack policy, using `full`");
            StackPolicy::Full
        }),
        Err(_) => StackPolicy::Full,
    };

    // A concurrent `set_policy` wins over the environment default.
    match POLICY.compare_exchange(UNSET, policy.to_raw(), Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => policy,
        Err(raw) => StackPolicy::from_raw(raw).unwrap_or(policy),
    }
}

/// Overrides the process-wide capture policy.
pub fn set_policy(policy: StackPolicy) {
    POLICY.store(policy.to_raw(), Ordering::Relaxed);
}

/// Captures the stack according to the process-wide [`policy`].
pub fn capture(caller: &'static Location<'static>) -> Stack {
    capture_with(policy(), caller)
}

/// Captures the stack with an explicit policy.
///
/// `caller` is the decorating call site; it is used directly by
/// [`StackPolicy::Caller`] and as a fallback when the platform backtrace has
/// no resolvable frames.
pub fn capture_with(policy: StackPolicy, caller: &'static Location<'static>) -> Stack {
    match policy {
        StackPolicy::Off => Stack::new(),
        StackPolicy::Caller => Stack::from_iter([Frame::from_location(caller)]),
        StackPolicy::Full => {
            let rendered = Backtrace::force_capture().to_string();
            let frames = parse_frames(&rendered);
            if frames.is_empty() {
                Stack::from_iter([Frame::from_location(caller)])
            } else {
                frames
            }
        }
    }
}

/// Parses the rendered form of a [`Backtrace`]:
///
/// ```text
///    3: my_crate::handler::load
///              at ./src/handler.rs:42:17
/// ```
///
/// Leading machinery frames are dropped; symbols without a source location
/// are kept with an unknown file.
fn parse_frames(rendered: &str) -> Stack {
    let mut frames = Stack::new();
    let mut pending: Option<&str> = None;
    let mut skipping = true;

    for line in rendered.lines() {
        let trimmed = line.trim_start();

        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(function) = pending.take() {
                push_frame(&mut frames, function, parse_location(location));
            }
            continue;
        }

        let Some(function) = parse_symbol(trimmed) else {
            continue;
        };

        if let Some(previous) = pending.take() {
            push_frame(&mut frames, previous, None);
        }

        if skipping && is_machinery(function) {
            continue;
        }
        skipping = false;
        pending = Some(function);
    }

    if let Some(function) = pending {
        push_frame(&mut frames, function, None);
    }

    frames
}

fn push_frame(frames: &mut Stack, function: &str, location: Option<(&str, u32)>) {
    let (file, line) = location.unwrap_or(("?", 0));
    frames.push(Frame::new(file, line, function));
}

/// Extracts the symbol from a `"  N: symbol"` line.
fn parse_symbol(line: &str) -> Option<&str> {
    let (index, symbol) = line.split_once(": ")?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(symbol.trim())
}

/// Splits `path:line[:column]` from the right so drive letters survive.
fn parse_location(location: &str) -> Option<(&str, u32)> {
    let (rest, last) = location.trim().rsplit_once(':')?;
    let last: u32 = last.parse().ok()?;
    match rest.rsplit_once(':') {
        Some((file, line)) => match line.parse() {
            Ok(line) => Some((file, line)),
            Err(_) => Some((rest, last)),
        },
        None => Some((rest, last)),
    }
}

fn is_machinery(function: &str) -> bool {
    let function = function.trim_start_matches('<');
    SKIPPED_PREFIXES.iter().any(|prefix| function.starts_with(prefix))
        || function.contains(" as errx::traits::result_ext::")
}

fn file_base_name(file: &str) -> &str {
    Path::new(file).file_name().and_then(|name| name.to_str()).unwrap_or(file)
}

/// Keeps the last two `::` segments outside of generic brackets and drops a
/// trailing symbol hash (`::h0123456789abcdef`).
fn function_base_name(function: &str) -> String {
    let function = strip_hash(function);

    let mut depth = 0usize;
    let mut separators = Vec::new();
    let bytes = function.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                separators.push(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    match separators.len() {
        0 | 1 => function.to_owned(),
        n => function[separators[n - 2] + 2..].to_owned(),
    }
}

fn strip_hash(function: &str) -> &str {
    match function.rsplit_once("::h") {
        Some((head, hash)) if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) => {
            head
        }
        _ => function,
    }
}
