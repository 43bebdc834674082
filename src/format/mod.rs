//! Text formatting helpers shared by the decoration API.
//!
//! Compile-time checked detail messages go through [`core::fmt::Arguments`];
//! templates that only exist at runtime (loaded from configuration, passed
//! through an RPC boundary) go through [`format_template`], which never fails.

pub mod template;

pub use template::{format_template, Arg};
