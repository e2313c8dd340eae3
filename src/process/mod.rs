//! File processing pipeline.
//!
//! Every file is handled in one forward pass:
//! - Decode UTF-8, remember a leading BOM, pick the output line terminator
//! - Apply an in-file `; erbfmt:` directive, if any
//! - Read logical lines ([`ErbStream`](crate::parser::ErbStream)), classifying each one
//! - Re-indent them ([`ErbIndenter`](crate::format::ErbIndenter)) into an in-memory buffer
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes re-indented output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{format_file, format_string};
