/// `ErbStream` - Converts physical lines to logical ERB lines
///
/// This module handles:
/// - Stripping line terminators (`\n`, `\r\n`) and leading whitespace
/// - Classifying every line through the [`LineClassifier`]
/// - Merging explicit concatenation blocks (`{` ... `}`) into one logical line
use std::io::{BufRead, BufReader};

use super::classifier::LineClassifier;
use crate::error::{FormatError, FormatResult};
use crate::scope::LineKind;

/// Closing delimiter of an explicit concatenation block
const CONCAT_CLOSE: char = '}';

/// A logical ERB line with associated metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Structural kind; for a concatenation block, the kind of its first content line
    pub kind: LineKind,
    /// The physical lines, left-trimmed, without terminators
    pub lines: Vec<String>,
    /// 1-based line number of the first physical line
    pub line_number: usize,
}

impl LogicalLine {
    #[must_use]
    pub fn single(kind: LineKind, line: String, line_number: usize) -> Self {
        Self {
            kind,
            lines: vec![line],
            line_number,
        }
    }

    /// Whether this logical line came from a `{` ... `}` block
    #[must_use]
    pub fn is_concat(&self) -> bool {
        self.lines.len() > 1
    }

    /// First physical line, used in diagnostics
    #[must_use]
    pub fn text(&self) -> &str {
        self.lines.first().map_or("", String::as_str)
    }
}

/// `ErbStream` reads logical ERB lines from a reader
///
/// The stream owns the classifier, so symbol sets learned while reading one
/// file never leak into another.
pub struct ErbStream<R: BufRead> {
    reader: R,
    classifier: LineClassifier,
    line_number: usize,
}

impl<R: BufRead> ErbStream<R> {
    /// Create a new `ErbStream`
    ///
    /// # Arguments
    /// * `reader` - The underlying reader
    /// * `classifier` - Classifier for this file (fresh or seeded with globals)
    pub fn new(reader: R, classifier: LineClassifier) -> Self {
        Self {
            reader,
            classifier,
            line_number: 0,
        }
    }

    /// Number of physical lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Read the next logical ERB line
    ///
    /// Returns None at EOF
    pub fn next_logical_line(&mut self) -> FormatResult<Option<LogicalLine>> {
        let Some(line) = self.read_physical_line()? else {
            return Ok(None);
        };
        let start = self.line_number;
        let kind = self.classifier.classify(&line, start)?;
        if kind != LineKind::ConcatStart {
            return Ok(Some(LogicalLine::single(kind, line, start)));
        }

        let mut lines = vec![line];

        // Blank lines may precede the first content line; `}` right away is an empty block
        let kind = loop {
            let Some(line) = self.read_physical_line()? else {
                return Err(FormatError::UnterminatedConcat { line: start });
            };
            let line_kind = self.classifier.classify(&line, self.line_number)?;
            lines.push(line);
            match line_kind {
                LineKind::ConcatEnd => {
                    return Ok(Some(LogicalLine {
                        kind: LineKind::Blank,
                        lines,
                        line_number: start,
                    }));
                }
                LineKind::Blank => {}
                content => break content,
            }
        };

        // Remaining content is not independently meaningful; copy it verbatim
        loop {
            let Some(line) = self.read_physical_line()? else {
                return Err(FormatError::UnterminatedConcat { line: start });
            };
            let closes = line.starts_with(CONCAT_CLOSE);
            lines.push(line);
            if closes {
                return Ok(Some(LogicalLine {
                    kind,
                    lines,
                    line_number: start,
                }));
            }
        }
    }

    fn read_physical_line(&mut self) -> FormatResult<Option<String>> {
        let mut raw_line = String::new();
        if self.reader.read_line(&mut raw_line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if raw_line.ends_with('\n') {
            raw_line.pop();
        }
        while raw_line.ends_with('\r') {
            raw_line.pop();
        }
        Ok(Some(raw_line.trim_start().to_string()))
    }
}

impl<R: BufRead> Iterator for ErbStream<R> {
    type Item = FormatResult<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_logical_line().transpose()
    }
}

/// Helper to create `ErbStream` from a string (for testing)
impl<'a> ErbStream<BufReader<&'a [u8]>> {
    #[must_use]
    pub fn from_string(s: &'a str) -> Self {
        let reader = BufReader::new(s.as_bytes());
        Self::new(reader, LineClassifier::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(input: &str) -> Vec<LogicalLine> {
        ErbStream::from_string(input)
            .collect::<FormatResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_single_lines() {
        let lines = collect("IF A == 1\n\tPRINTL x\nENDIF\n");
        let kinds: Vec<_> = lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![LineKind::If, LineKind::BuiltinFunction, LineKind::EndIf]
        );
        assert_eq!(lines[1].lines, vec!["PRINTL x".to_string()]);
        assert_eq!(lines[2].line_number, 3);
        assert!(!lines[0].is_concat());
    }

    #[test]
    fn test_missing_final_newline() {
        let lines = collect("PRINTL a\nPRINTL b");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text(), "PRINTL b");
    }

    #[test]
    fn test_crlf_is_stripped() {
        let lines = collect("  PRINTL a\r\n\r\n");
        assert_eq!(lines[0].text(), "PRINTL a");
        assert_eq!(lines[1].kind, LineKind::Blank);
        assert_eq!(lines[1].text(), "");
    }

    #[test]
    fn test_trailing_spaces_are_kept() {
        let lines = collect("PRINTL a  \n");
        assert_eq!(lines[0].text(), "PRINTL a  ");
    }

    #[test]
    fn test_concat_block() {
        let input = "{\n    PRINTFORML %NAME%\n        、%CALLNAME%\n  }\nPRINTL done\n";
        let lines = collect(input);
        assert_eq!(lines.len(), 2);

        let block = &lines[0];
        assert!(block.is_concat());
        assert_eq!(block.kind, LineKind::BuiltinFunction);
        assert_eq!(block.line_number, 1);
        assert_eq!(
            block.lines,
            vec!["{", "PRINTFORML %NAME%", "、%CALLNAME%", "}"]
        );
        assert_eq!(lines[1].line_number, 5);
    }

    #[test]
    fn test_concat_kind_comes_from_first_content_line() {
        let lines = collect("{\n\n#DIMS CONST NAMES = \n\"a\", \"b\"\n}\n");
        assert_eq!(lines[0].kind, LineKind::VariableDefinition);
        assert_eq!(lines[0].lines.len(), 5);
    }

    #[test]
    fn test_concat_continuation_lines_are_not_classified() {
        // MYSTERY alone would be an unknown identifier
        let lines = collect("{\nPRINTL a\nMYSTERY\n}\n");
        assert_eq!(lines[0].kind, LineKind::BuiltinFunction);
    }

    #[test]
    fn test_empty_concat_block_is_blank() {
        let lines = collect("{\n\n}\nPRINTL a\n");
        assert_eq!(lines[0].kind, LineKind::Blank);
        assert_eq!(lines[0].lines, vec!["{", "", "}"]);
        assert_eq!(lines[1].line_number, 4);
    }

    #[test]
    fn test_unterminated_concat_names_opening_line() {
        let mut stream = ErbStream::from_string("PRINTL a\n{\nPRINTL b\nc\n");
        stream.next_logical_line().unwrap();
        let err = stream.next_logical_line().unwrap_err();
        assert!(matches!(err, FormatError::UnterminatedConcat { line: 2 }));
    }

    #[test]
    fn test_unterminated_empty_concat() {
        let err = ErbStream::from_string("{\n\n")
            .next_logical_line()
            .unwrap_err();
        assert!(matches!(err, FormatError::UnterminatedConcat { line: 1 }));
    }

    #[test]
    fn test_classification_error_carries_line_number() {
        let mut stream = ErbStream::from_string("PRINTL a\n\nWHATEVER 3\n");
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_end_of_input() {
        let mut stream = ErbStream::from_string("");
        assert!(stream.next_logical_line().unwrap().is_none());
        assert!(stream.next().is_none());
        assert_eq!(stream.line_number(), 0);
    }
}
