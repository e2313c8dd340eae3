/// `LineClassifier` - Pseudo-lexer assigning a structural kind to one ERB line
///
/// Only the start of a line is inspected: its first significant character, or
/// its leading identifier. Bare identifiers that are not keywords are resolved
/// against two symbol sets owned by the classifier:
/// - function-local names declared with `#DIM`/`#DIMS` (cleared at every `@` line)
/// - global names inferred from assignment-like uses (kept for the whole file)
use std::collections::HashSet;

use tracing::trace;

use super::cursor::Cursor;
use super::keywords;
use crate::error::{FormatError, FormatResult};
use crate::scope::LineKind;

const COMMENT_START: char = ';';
const FUNCTION_START: char = '@';
const ATTRIBUTE_START: char = '#';
const LABEL_START: char = '$';
const SPECIAL_BLOCK_START: char = '[';
const SPECIAL_BLOCK_END: char = ']';
const CONCAT_START: char = '{';
const CONCAT_END: char = '}';
const VARIABLE_SEPARATOR: char = ':';

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Classifies lines of one file, one line at a time
#[derive(Debug, Default)]
pub struct LineClassifier {
    /// Names declared in the current function (uppercased)
    function_locals: HashSet<String>,
    /// Global names inferred so far in this file (uppercased)
    inferred_globals: HashSet<String>,
    /// Globals known up front (from configuration)
    seeded_globals: HashSet<String>,
}

impl LineClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier that already knows some global variable names
    #[must_use]
    pub fn with_globals<I, S>(globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seeded_globals: HashSet<String> = globals
            .into_iter()
            .map(|name| name.as_ref().trim().to_uppercase())
            .filter(|name| !name.is_empty())
            .collect();
        Self {
            function_locals: HashSet::new(),
            inferred_globals: seeded_globals.clone(),
            seeded_globals,
        }
    }

    /// Forget everything learned from previous input (seeded globals stay known)
    pub fn reset(&mut self) {
        self.function_locals.clear();
        self.inferred_globals.clone_from(&self.seeded_globals);
    }

    #[must_use]
    pub fn function_locals(&self) -> &HashSet<String> {
        &self.function_locals
    }

    #[must_use]
    pub fn inferred_globals(&self) -> &HashSet<String> {
        &self.inferred_globals
    }

    /// Classify one physical line.
    ///
    /// # Arguments
    /// * `line` - The line text, line terminator already removed
    /// * `line_number` - 1-based position of the line, used in errors
    pub fn classify(&mut self, line: &str, line_number: usize) -> FormatResult<LineKind> {
        let mut cursor = Cursor::new(line);
        self.classify_at(&mut cursor, line_number)
    }

    fn classify_at(&mut self, cursor: &mut Cursor<'_>, line: usize) -> FormatResult<LineKind> {
        cursor.skip_whitespace();

        let Some(first) = cursor.current() else {
            return Ok(LineKind::Blank);
        };

        match first {
            COMMENT_START => Ok(Self::classify_comment(cursor)),
            FUNCTION_START => {
                self.function_locals.clear();
                Ok(LineKind::FunctionDefinition)
            }
            ATTRIBUTE_START => self.classify_attribute(cursor, line),
            LABEL_START => Ok(LineKind::Label),
            SPECIAL_BLOCK_START => Self::classify_special_block(cursor, line),
            CONCAT_START => Ok(LineKind::ConcatStart),
            CONCAT_END => Ok(LineKind::ConcatEnd),
            '+' | '-' => self.classify_prefix_operator(cursor, first, line),
            _ => self.classify_identifier(cursor, line),
        }
    }

    /// `;` comment, or `;#region` / `;#endregion` marker
    fn classify_comment(cursor: &mut Cursor<'_>) -> LineKind {
        cursor.eat(COMMENT_START);
        cursor.skip_whitespace();
        if cursor.eat('#') {
            cursor.skip_whitespace();
        }
        match read_ident(cursor).to_lowercase().as_str() {
            "region" => LineKind::RegionStart,
            "endregion" => LineKind::RegionEnd,
            _ => LineKind::Comment,
        }
    }

    fn classify_attribute(&mut self, cursor: &mut Cursor<'_>, line: usize) -> FormatResult<LineKind> {
        cursor.eat(ATTRIBUTE_START);
        let ident = read_ident(cursor);
        let upper = ident.to_uppercase();

        if keywords::is_attribute(&upper) {
            return Ok(LineKind::Attribute);
        }
        if !keywords::is_declaration(&upper) {
            return Err(FormatError::UnknownAttribute { line, name: ident });
        }

        cursor.skip_whitespace();
        let mut name = read_ident(cursor).to_uppercase();
        if keywords::is_declaration_qualifier(&name) {
            cursor.skip_whitespace();
            name = read_ident(cursor).to_uppercase();
        }
        if name.is_empty() {
            return Err(FormatError::MissingDeclarationName {
                line,
                text: cursor.source().to_string(),
            });
        }
        if self.function_locals.contains(&name) {
            return Err(FormatError::DuplicateDeclaration { line, name });
        }
        self.function_locals.insert(name);
        Ok(LineKind::VariableDefinition)
    }

    fn classify_special_block(cursor: &mut Cursor<'_>, line: usize) -> FormatResult<LineKind> {
        cursor.eat(SPECIAL_BLOCK_START);
        cursor.skip_whitespace();
        let ident = read_ident(cursor);
        cursor.skip_whitespace();

        let upper = ident.to_uppercase();
        if keywords::SPECIAL_BLOCKS_WITH_ARG.contains(&upper.as_str()) {
            if read_ident(cursor).is_empty() {
                return Err(FormatError::MalformedSpecialBlock {
                    line,
                    text: cursor.source().to_string(),
                });
            }
            cursor.skip_whitespace();
        } else if !keywords::SPECIAL_BLOCKS.contains(&upper.as_str()) {
            return Err(FormatError::UnknownSpecialBlock { line, name: ident });
        }

        if cursor.current() == Some(SPECIAL_BLOCK_END) {
            Ok(LineKind::SpecialBlock)
        } else {
            Err(FormatError::MalformedSpecialBlock {
                line,
                text: cursor.source().to_string(),
            })
        }
    }

    /// `++VAR` / `--VAR`
    ///
    /// Stacked operators (`++ --VAR`) are stripped in a loop; the innermost one
    /// decides which error is reported.
    fn classify_prefix_operator(
        &mut self,
        cursor: &mut Cursor<'_>,
        first: char,
        line: usize,
    ) -> FormatResult<LineKind> {
        let mut op = first;
        loop {
            if cursor.peek(1) != Some(op) {
                return Err(FormatError::Unparsable {
                    line,
                    text: cursor.source().to_string(),
                });
            }
            cursor.advance();
            cursor.advance();
            cursor.skip_whitespace();
            match cursor.current() {
                Some(next @ ('+' | '-')) => op = next,
                _ => break,
            }
        }

        let kind = self.classify_at(cursor, line)?;
        if kind.is_variable() {
            return Ok(kind);
        }
        let text = cursor.source().to_string();
        Err(if op == '+' {
            FormatError::IncrementOnNonVariable { line, text }
        } else {
            FormatError::DecrementOnNonVariable { line, text }
        })
    }

    fn classify_identifier(&mut self, cursor: &mut Cursor<'_>, line: usize) -> FormatResult<LineKind> {
        let ident = read_ident(cursor);
        if ident.is_empty() {
            return Err(FormatError::UnknownIdentifier {
                line,
                text: cursor.source().to_string(),
            });
        }

        let upper = ident.to_uppercase();
        if let Some(kind) = keywords::lookup(&upper) {
            return Ok(kind);
        }
        if self.function_locals.contains(&upper) {
            return Ok(LineKind::Variable);
        }
        if self.inferred_globals.contains(&upper) {
            return Ok(LineKind::InferredGlobal);
        }

        cursor.skip_whitespace();
        if looks_like_assignment(cursor) {
            trace!(line, name = %upper, "inferred global variable");
            self.inferred_globals.insert(upper);
            return Ok(LineKind::InferredGlobal);
        }

        Err(FormatError::UnknownIdentifier { line, text: ident })
    }
}

/// Read an identifier; empty if the cursor is not at one
fn read_ident(cursor: &mut Cursor<'_>) -> String {
    match cursor.current() {
        Some(c) if is_ident_start(c) && c != VARIABLE_SEPARATOR => {
            cursor.take_while(|c| is_ident_char(c) && c != VARIABLE_SEPARATOR)
        }
        _ => String::new(),
    }
}

/// `VAR:X ...`, `VAR = ...`, `VAR += ...` (`-=`, `*=`, `/=`, `'=`), `VAR++`, `VAR--`
fn looks_like_assignment(cursor: &Cursor<'_>) -> bool {
    let (Some(c), next) = (cursor.current(), cursor.peek(1)) else {
        return false;
    };
    match c {
        VARIABLE_SEPARATOR | '=' => true,
        '+' | '-' => next == Some('=') || next == Some(c),
        '*' | '/' | '\'' => next == Some('='),
        _ => false,
    }
}
