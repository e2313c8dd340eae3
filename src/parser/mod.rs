//! ERB source reading and line classification.
//!
//! This module provides the infrastructure for turning raw ERB text into logical lines:
//! - [`Cursor`]: Forward-only character scanner over one line
//! - [`keywords`]: Static keyword tables (statements, built-in functions and variables)
//! - [`LineClassifier`]: Pseudo-lexer assigning a [`LineKind`](crate::scope::LineKind) to each line
//! - [`ErbStream`]: Merges explicit concatenation blocks (`{` ... `}`) into logical lines
//!
//! ERB is line oriented: every physical line is one statement, and only its first
//! token decides how it affects indentation.

pub mod classifier;
pub mod cursor;
pub mod keywords;
pub mod stream;

pub use classifier::LineClassifier;
pub use cursor::Cursor;
pub use stream::{ErbStream, LogicalLine};
