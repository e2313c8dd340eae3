//! ERB re-indentation.
//!
//! This module contains the core indentation logic organized into submodules:
//! - [`indenter`]: Tracks block depth, region markers and look-ahead over logical lines
//! - [`sink`]: Renders `(depth, text)` pairs as indented text
//!
//! Only leading whitespace is ever rewritten; line content is emitted unchanged.

pub mod indenter;
pub mod sink;

pub use indenter::{ErbIndenter, DEFAULT_EMPTY_SELECT_DEDENT};
pub use sink::{IndentUnit, LineSink, TextSink};
