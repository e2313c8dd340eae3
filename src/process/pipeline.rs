//! Single-pass re-indentation pipeline
//!
//! Decodes the input, honours an in-file directive, then streams logical lines
//! through the classifier and the indenter into an in-memory sink. Output is only
//! written once the whole file succeeded.

use std::io::{BufRead, Write};

use anyhow::bail;
use tracing::debug;

use crate::config::Config;
use crate::directive::find_directive;
use crate::error::FormatError;
use crate::format::{ErbIndenter, TextSink};
use crate::parser::{ErbStream, LineClassifier};
use crate::Result;

/// UTF-8 byte order mark, which the game engine expects on UTF-8 scripts
const BOM: &str = "\u{feff}";

/// Re-indent an ERB file
///
/// # Arguments
/// * `input` - Raw file contents
/// * `output` - Destination; untouched if formatting fails
/// * `config` - Settings for this file (an in-file directive may override them)
/// * `filename` - Name used in diagnostics
pub fn format_file<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
    filename: &str,
) -> Result<()> {
    let mut input_buffer = Vec::new();
    let mut reader = input;
    reader.read_to_end(&mut input_buffer)?;

    let text = std::str::from_utf8(&input_buffer).map_err(|e| FormatError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    let (bom, text) = match text.strip_prefix(BOM) {
        Some(rest) => (BOM, rest),
        None => ("", text),
    };

    let mut config = config.clone();
    if let Some(overrides) = find_directive(text) {
        debug!(file = filename, ?overrides, "in-file directive");
        if overrides.off {
            output.write_all(&input_buffer)?;
            return Ok(());
        }
        overrides.apply_to(&mut config);
        if let Some(msg) = config.validate() {
            bail!("invalid erbfmt directive: {msg}");
        }
    }

    let newline = config.newline.resolve(text);
    let mut stream = ErbStream::new(text.as_bytes(), LineClassifier::with_globals(&config.globals));
    let mut sink = TextSink::new(Vec::with_capacity(input_buffer.len()), config.indent_unit(), newline);
    let mut indenter = ErbIndenter::new(config.empty_select_dedent);

    let logical_lines = indenter.run(&mut stream, &mut sink)?;

    debug!(
        file = filename,
        logical_lines,
        physical_lines = sink.lines_written(),
        max_depth = indenter.max_depth(),
        inferred_globals = stream.classifier().inferred_globals().len(),
        "formatted"
    );

    output.write_all(bom.as_bytes())?;
    output.write_all(&sink.into_inner())?;
    Ok(())
}

/// Re-indent ERB source held in memory
pub fn format_string(text: &str, config: &Config) -> Result<String> {
    let mut output = Vec::new();
    format_file(text.as_bytes(), &mut output, config, "<string>")?;
    Ok(String::from_utf8(output)?)
}
