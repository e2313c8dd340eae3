/// `LineSink` - Destination for re-indented lines
///
/// The indenter decides a depth for every physical line; a sink decides how a
/// depth is rendered. [`TextSink`] writes indent units and line terminators to
/// any `Write`, and `Vec<(usize, String)>` records raw pairs for tests.
use std::io::Write;

use crate::error::FormatResult;

/// Receives `(depth, text)` pairs in output order
pub trait LineSink {
    /// Emit one line at `depth`. Empty text is a blank line.
    fn emit(&mut self, depth: usize, text: &str) -> FormatResult<()>;

    /// Emit a bare line terminator
    fn emit_blank(&mut self) -> FormatResult<()>;
}

/// What one level of depth renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentUnit {
    #[default]
    Tab,
    Spaces(usize),
}

impl IndentUnit {
    #[must_use]
    pub fn new(use_tabs: bool, width: usize) -> Self {
        if use_tabs {
            IndentUnit::Tab
        } else {
            IndentUnit::Spaces(width)
        }
    }

    #[must_use]
    pub fn render(self, depth: usize) -> String {
        match self {
            IndentUnit::Tab => "\t".repeat(depth),
            IndentUnit::Spaces(width) => " ".repeat(width * depth),
        }
    }
}

/// Renders lines as text into a writer
pub struct TextSink<W: Write> {
    writer: W,
    unit: IndentUnit,
    newline: &'static str,
    lines_written: usize,
}

impl<W: Write> TextSink<W> {
    /// Create a new `TextSink`
    ///
    /// # Arguments
    /// * `writer` - Output destination
    /// * `unit` - Indent unit for one level of depth
    /// * `newline` - Line terminator written after every line
    pub fn new(writer: W, unit: IndentUnit, newline: &'static str) -> Self {
        Self {
            writer,
            unit,
            newline,
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for TextSink<W> {
    fn emit(&mut self, depth: usize, text: &str) -> FormatResult<()> {
        if text.trim().is_empty() {
            return self.emit_blank();
        }
        let indent = self.unit.render(depth);
        write!(self.writer, "{indent}{text}{}", self.newline)?;
        self.lines_written += 1;
        Ok(())
    }

    fn emit_blank(&mut self) -> FormatResult<()> {
        self.writer.write_all(self.newline.as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }
}

/// Records `(depth, text)`; blank lines are `(0, "")`
impl LineSink for Vec<(usize, String)> {
    fn emit(&mut self, depth: usize, text: &str) -> FormatResult<()> {
        if text.trim().is_empty() {
            return self.emit_blank();
        }
        self.push((depth, text.to_string()));
        Ok(())
    }

    fn emit_blank(&mut self) -> FormatResult<()> {
        self.push((0, String::new()));
        Ok(())
    }
}
