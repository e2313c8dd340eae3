//! Structural line categories and their effect on nesting depth.
//!
//! ERB has no nested statements inside a line; block structure comes only from
//! keyword lines. This module names those structural roles:
//! - [`LineKind`]: the closed set of categories the classifier assigns to a line
//! - [`ScopeEffect`]: what a kind does to the indentation depth (open, close, ...)

pub mod types;

pub use types::{LineKind, ScopeEffect};
