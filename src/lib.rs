//! erbfmt - Re-indenter for ERB scripts
//!
//! Reads ERB source line by line, classifies every logical line and rewrites
//! its leading whitespace from the block structure alone. Everything after the
//! indentation is left as written.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod directive;
pub mod error;
pub mod format;
pub mod parser;
pub mod process;
pub mod scope;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::{Config, Newline};
pub use directive::{find_directive, parse_directive, DirectiveOverrides};
pub use error::{FormatError, FormatResult, Result};
pub use process::{format_file, format_string};
pub use scope::LineKind;
