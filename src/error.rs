//! Error types and result aliases for erbfmt.
//!
//! This module defines the error handling infrastructure:
//! - [`FormatError`]: every way re-indenting a single file can fail
//! - [`FormatResult<T>`]: result alias used by the core (classifier, assembler, engine)
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the application layer
//!
//! Every core error is fatal for the file being processed. Line numbers are 1-based;
//! for an explicit concatenation block the line number of the opening `{` is reported.

use anyhow::Result as AnyhowResult;
use thiserror::Error;

pub type Result<T> = AnyhowResult<T>;

pub type FormatResult<T> = std::result::Result<T, FormatError>;

#[derive(Debug, Error)]
pub enum FormatError {
    // Classification errors
    #[error("line {line}: unknown identifier ({text})")]
    UnknownIdentifier { line: usize, text: String },
    #[error("line {line}: unknown attribute #{name}")]
    UnknownAttribute { line: usize, name: String },
    #[error("line {line}: unknown special block [{name}]")]
    UnknownSpecialBlock { line: usize, name: String },
    #[error("line {line}: malformed special block ({text})")]
    MalformedSpecialBlock { line: usize, text: String },
    #[error("line {line}: increment applied to a non-variable ({text})")]
    IncrementOnNonVariable { line: usize, text: String },
    #[error("line {line}: decrement applied to a non-variable ({text})")]
    DecrementOnNonVariable { line: usize, text: String },
    #[error("line {line}: {name} is already declared in this function")]
    DuplicateDeclaration { line: usize, name: String },
    #[error("line {line}: declaration without a variable name ({text})")]
    MissingDeclarationName { line: usize, text: String },
    #[error("line {line}: cannot parse ({text})")]
    Unparsable { line: usize, text: String },

    // Structural errors
    #[error("line {line}: function definition must not be indented")]
    IndentedFunction { line: usize },
    #[error("line {line}: declaration must not be indented ({text})")]
    IndentedDeclaration { line: usize, text: String },
    #[error("line {line}: declaration must appear at the start of the function ({text})")]
    MisplacedDeclaration { line: usize, text: String },
    #[error("line {line}: concatenation block ({{ ... }}) is never closed")]
    UnterminatedConcat { line: usize },
    #[error("line {line}: region/endregion stack mismatch")]
    RegionUnderflow { line: usize },
    #[error("line {line}: region is never closed ({open} open at end of input)")]
    UnclosedRegion { line: usize, open: usize },
    #[error("line {line}: block closed more often than opened ({text})")]
    UnbalancedBlock { line: usize, text: String },

    // Classifier exhaustion
    #[error("line {line}: unknown line type ({text})")]
    UnknownLine { line: usize, text: String },

    #[error("input is not valid UTF-8 (byte offset {offset})")]
    InvalidEncoding { offset: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Source line the error points at, if it is tied to one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::UnknownIdentifier { line, .. }
            | Self::UnknownAttribute { line, .. }
            | Self::UnknownSpecialBlock { line, .. }
            | Self::MalformedSpecialBlock { line, .. }
            | Self::IncrementOnNonVariable { line, .. }
            | Self::DecrementOnNonVariable { line, .. }
            | Self::DuplicateDeclaration { line, .. }
            | Self::MissingDeclarationName { line, .. }
            | Self::Unparsable { line, .. }
            | Self::IndentedFunction { line }
            | Self::IndentedDeclaration { line, .. }
            | Self::MisplacedDeclaration { line, .. }
            | Self::UnterminatedConcat { line }
            | Self::RegionUnderflow { line }
            | Self::UnclosedRegion { line, .. }
            | Self::UnbalancedBlock { line, .. }
            | Self::UnknownLine { line, .. } => Some(*line),
            Self::InvalidEncoding { .. } | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_line_and_text() {
        let err = FormatError::UnknownIdentifier {
            line: 12,
            text: "FOO BAR".to_string(),
        };
        assert_eq!(err.to_string(), "line 12: unknown identifier (FOO BAR)");
        assert_eq!(err.line(), Some(12));
    }

    #[test]
    fn test_unterminated_concat_message() {
        let err = FormatError::UnterminatedConcat { line: 3 };
        assert_eq!(
            err.to_string(),
            "line 3: concatenation block ({ ... }) is never closed"
        );
    }

    #[test]
    fn test_io_error_has_no_line() {
        let err = FormatError::from(std::io::Error::other("boom"));
        assert!(err.line().is_none());
    }
}
