/// `ErbIndenter` - Depth-tracking indentation engine
///
/// Consumes logical lines in order and decides the depth of every physical
/// line. Look-ahead (comment runs, `SIF` bodies) reads from the line source and
/// hands the line that ended it back through a one-line pushback slot, so the
/// whole run stays a single forward pass.
use tracing::{trace, warn};

use crate::error::{FormatError, FormatResult};
use crate::format::sink::LineSink;
use crate::parser::LogicalLine;
use crate::scope::{LineKind, ScopeEffect};

/// Levels `ENDSELECT` closes when no arm was opened
pub const DEFAULT_EMPTY_SELECT_DEDENT: usize = 1;

/// Logical line source with room for one pushed-back line
struct Replay<I> {
    inner: I,
    pending: Option<LogicalLine>,
    /// Lines taken from `inner`, replays excluded
    pulled: usize,
}

impl<I> Replay<I>
where
    I: Iterator<Item = FormatResult<LogicalLine>>,
{
    fn pull(&mut self) -> FormatResult<Option<LogicalLine>> {
        if let Some(line) = self.pending.take() {
            return Ok(Some(line));
        }
        let line = self.inner.next().transpose()?;
        if line.is_some() {
            self.pulled += 1;
        }
        Ok(line)
    }

    fn push_back(&mut self, line: LogicalLine) {
        debug_assert!(self.pending.is_none());
        self.pending = Some(line);
    }
}

/// Open region marker: the level it was emitted at, and where it was
#[derive(Debug, Clone, Copy)]
struct OpenRegion {
    level: usize,
    line: usize,
}

/// `ErbIndenter` tracks block nesting and emits re-indented lines
#[derive(Debug)]
pub struct ErbIndenter {
    depth: usize,
    max_depth: usize,
    regions: Vec<OpenRegion>,
    /// Last kind that was not blank, comment or region marker
    prev_kind: Option<LineKind>,
    empty_select_dedent: usize,
}

impl Default for ErbIndenter {
    fn default() -> Self {
        Self::new(DEFAULT_EMPTY_SELECT_DEDENT)
    }
}

impl ErbIndenter {
    /// Create a new `ErbIndenter`
    ///
    /// # Arguments
    /// * `empty_select_dedent` - Levels `ENDSELECT` closes directly after `SELECTCASE`
    #[must_use]
    pub fn new(empty_select_dedent: usize) -> Self {
        Self {
            depth: 0,
            max_depth: 0,
            regions: Vec::new(),
            prev_kind: None,
            empty_select_dedent,
        }
    }

    /// Current nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Deepest nesting reached so far
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Re-indent every logical line from `lines` into `sink`.
    ///
    /// Returns the number of logical lines processed. Fails on the first
    /// structural error, or if a region is still open at the end.
    pub fn run<I, S>(&mut self, lines: I, sink: &mut S) -> FormatResult<usize>
    where
        I: IntoIterator<Item = FormatResult<LogicalLine>>,
        S: LineSink + ?Sized,
    {
        let mut source = Replay {
            inner: lines.into_iter(),
            pending: None,
            pulled: 0,
        };

        while let Some(line) = source.pull()? {
            self.dispatch(line, &mut source, sink)?;
        }

        self.finish()?;
        Ok(source.pulled)
    }

    fn finish(&self) -> FormatResult<()> {
        if let Some(region) = self.regions.last() {
            return Err(FormatError::UnclosedRegion {
                line: region.line,
                open: self.regions.len(),
            });
        }
        if self.depth != 0 {
            warn!(depth = self.depth, "input ends inside an open block");
        }
        Ok(())
    }

    fn dispatch<I, S>(
        &mut self,
        line: LogicalLine,
        source: &mut Replay<I>,
        sink: &mut S,
    ) -> FormatResult<()>
    where
        I: Iterator<Item = FormatResult<LogicalLine>>,
        S: LineSink + ?Sized,
    {
        match line.kind.scope_effect() {
            ScopeEffect::Blank | ScopeEffect::Neutral => emit(sink, &line, self.depth)?,
            ScopeEffect::Function => {
                if self.depth != 0 {
                    return Err(FormatError::IndentedFunction {
                        line: line.line_number,
                    });
                }
                emit(sink, &line, 0)?;
            }
            ScopeEffect::Declaration => {
                self.check_declaration(&line)?;
                emit(sink, &line, 0)?;
            }
            ScopeEffect::Open => {
                emit(sink, &line, self.depth)?;
                self.open();
            }
            ScopeEffect::Middle => {
                let level = self.outer_level(&line)?;
                emit(sink, &line, level)?;
            }
            ScopeEffect::Close => {
                self.depth = self.outer_level(&line)?;
                emit(sink, &line, self.depth)?;
            }
            ScopeEffect::Arm => {
                if self.prev_kind == Some(LineKind::SelectCase) {
                    emit(sink, &line, self.depth)?;
                    self.open();
                } else {
                    let level = self.outer_level(&line)?;
                    emit(sink, &line, level)?;
                }
            }
            ScopeEffect::EndSelect => {
                let levels = if self.prev_kind == Some(LineKind::SelectCase) {
                    self.empty_select_dedent
                } else {
                    2
                };
                self.depth = self.depth.checked_sub(levels).ok_or_else(|| unbalanced(&line))?;
                emit(sink, &line, self.depth)?;
            }
            ScopeEffect::SingleLineIf => {
                emit(sink, &line, self.depth)?;
                return self.single_line_if(source, sink);
            }
            ScopeEffect::Commentary => return self.comment_run(line, source, sink),
            ScopeEffect::RegionEnd => {
                let level = self.pop_region(&line)?;
                emit(sink, &line, level)?;
            }
            ScopeEffect::Invalid => return Err(unknown_line(&line)),
        }

        if !line.kind.is_trivia() {
            self.prev_kind = Some(line.kind);
        }
        Ok(())
    }

    fn open(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    /// Depth - 1, or an error when nothing is open
    fn outer_level(&self, line: &LogicalLine) -> FormatResult<usize> {
        self.depth.checked_sub(1).ok_or_else(|| unbalanced(line))
    }

    /// `#DIM` and attributes: top level, directly after `@NAME` or another declaration
    fn check_declaration(&self, line: &LogicalLine) -> FormatResult<()> {
        if self.depth != 0 {
            return Err(FormatError::IndentedDeclaration {
                line: line.line_number,
                text: line.text().to_string(),
            });
        }
        if !self.prev_kind.is_some_and(LineKind::is_preamble) {
            return Err(FormatError::MisplacedDeclaration {
                line: line.line_number,
                text: line.text().to_string(),
            });
        }
        Ok(())
    }

    fn push_region(&mut self, level: usize, line: &LogicalLine) {
        trace!(line = line.line_number, level, "region opened");
        self.regions.push(OpenRegion {
            level,
            line: line.line_number,
        });
    }

    fn pop_region(&mut self, line: &LogicalLine) -> FormatResult<usize> {
        let region = self.regions.pop().ok_or(FormatError::RegionUnderflow {
            line: line.line_number,
        })?;
        trace!(
            line = line.line_number,
            level = region.level,
            opened_at = region.line,
            "region closed"
        );
        Ok(region.level)
    }

    /// Comments attach to the statement after them: buffer the run, then pick its level
    fn comment_run<I, S>(
        &mut self,
        first: LogicalLine,
        source: &mut Replay<I>,
        sink: &mut S,
    ) -> FormatResult<()>
    where
        I: Iterator<Item = FormatResult<LogicalLine>>,
        S: LineSink + ?Sized,
    {
        let mut run = vec![first];
        let next = loop {
            match source.pull()? {
                Some(line) if line.kind.is_trivia() => run.push(line),
                other => break other,
            }
        };

        let level = match next.as_ref().map(|line| line.kind) {
            Some(kind @ (LineKind::Case | LineKind::CaseElse))
                if self.prev_kind == Some(LineKind::SelectCase) =>
            {
                trace!(%kind, "comment run belongs to the first arm");
                self.depth
            }
            Some(kind) if kind.dedents_leading_comments() => self.depth.saturating_sub(1),
            _ => self.depth,
        };

        for line in &run {
            match line.kind {
                LineKind::RegionStart => {
                    self.push_region(level, line);
                    emit(sink, line, level)?;
                }
                LineKind::RegionEnd => {
                    let popped = self.pop_region(line)?;
                    emit(sink, line, popped)?;
                }
                _ => emit(sink, line, level)?,
            }
        }

        if let Some(line) = next {
            source.push_back(line);
        }
        Ok(())
    }

    /// `SIF`: trivia and the controlled statement go one level deeper
    fn single_line_if<I, S>(&mut self, source: &mut Replay<I>, sink: &mut S) -> FormatResult<()>
    where
        I: Iterator<Item = FormatResult<LogicalLine>>,
        S: LineSink + ?Sized,
    {
        let body = self.depth + 1;
        self.prev_kind = Some(LineKind::Sif);

        while let Some(line) = source.pull()? {
            match line.kind {
                LineKind::Blank | LineKind::Comment => emit(sink, &line, body)?,
                LineKind::RegionStart => {
                    self.push_region(body, &line);
                    emit(sink, &line, body)?;
                }
                LineKind::RegionEnd => {
                    let popped = self.pop_region(&line)?;
                    emit(sink, &line, popped)?;
                }
                kind => {
                    if let Some(err) = nested_statement_error(&line) {
                        return Err(err);
                    }
                    emit(sink, &line, body)?;
                    self.prev_kind = Some(kind);
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}

fn unknown_line(line: &LogicalLine) -> FormatError {
    FormatError::UnknownLine {
        line: line.line_number,
        text: line.text().to_string(),
    }
}

/// Lines that can never sit one level deep, e.g. as a `SIF` statement
fn nested_statement_error(line: &LogicalLine) -> Option<FormatError> {
    match line.kind.scope_effect() {
        ScopeEffect::Function => Some(FormatError::IndentedFunction {
            line: line.line_number,
        }),
        ScopeEffect::Declaration => Some(FormatError::IndentedDeclaration {
            line: line.line_number,
            text: line.text().to_string(),
        }),
        ScopeEffect::Invalid => Some(unknown_line(line)),
        _ => None,
    }
}

fn unbalanced(line: &LogicalLine) -> FormatError {
    FormatError::UnbalancedBlock {
        line: line.line_number,
        text: line.text().to_string(),
    }
}

/// Emit every physical line of `line`; concatenation block content goes one level deeper
fn emit<S: LineSink + ?Sized>(sink: &mut S, line: &LogicalLine, depth: usize) -> FormatResult<()> {
    let last = line.lines.len().saturating_sub(1);
    for (i, text) in line.lines.iter().enumerate() {
        if text.trim().is_empty() {
            sink.emit_blank()?;
            continue;
        }
        let level = if line.is_concat() && i != 0 && i != last {
            depth + 1
        } else {
            depth
        };
        sink.emit(level, text)?;
    }
    Ok(())
}
