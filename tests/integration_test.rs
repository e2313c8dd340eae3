//! Integration tests for erbfmt
//!
//! These tests drive whole scripts through the public API and check the
//! structural properties every re-indented file must have.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{BufReader, Cursor};

use erbfmt::format::{ErbIndenter, LineSink};
use erbfmt::parser::{ErbStream, LineClassifier};
use erbfmt::process::format_file;
use erbfmt::{format_string, Config, FormatError};

fn format(input: &str) -> String {
    format_string(input, &Config::default()).unwrap()
}

fn format_err(input: &str) -> FormatError {
    let err = format_string(input, &Config::default()).unwrap_err();
    match err.downcast::<FormatError>() {
        Ok(e) => e,
        Err(other) => panic!("expected a FormatError, got {other}"),
    }
}

/// Indent depth of every output line (tabs only)
fn depths(output: &str) -> Vec<usize> {
    output
        .lines()
        .map(|line| line.chars().take_while(|&c| c == '\t').count())
        .collect()
}

/// Records the depth the engine asks for, ignoring the rendering
#[derive(Default)]
struct DepthRecorder {
    depths: Vec<Option<usize>>,
}

impl LineSink for DepthRecorder {
    fn emit(&mut self, depth: usize, _text: &str) -> erbfmt::FormatResult<()> {
        self.depths.push(Some(depth));
        Ok(())
    }

    fn emit_blank(&mut self) -> erbfmt::FormatResult<()> {
        self.depths.push(None);
        Ok(())
    }
}

#[test]
fn test_minimal_if() {
    let input = "IF A == 1\nPRINTL \"x\"\nENDIF\n";
    assert_eq!(format(input), "IF A == 1\n\tPRINTL \"x\"\nENDIF\n");
}

#[test]
fn test_format_file_through_reader() {
    let input = "@SHOP\n    IF MONEY > 100\n  PRINTL rich\n        ENDIF\n";
    let reader = BufReader::new(Cursor::new(input.as_bytes()));
    let mut output = Vec::new();

    format_file(reader, &mut output, &Config::default(), "SHOP.ERB").unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "@SHOP\nIF MONEY > 100\n\tPRINTL rich\nENDIF\n"
    );
}

#[test]
fn test_blank_only_input() {
    for count in [1, 2, 7] {
        let input = " \t\n".repeat(count);
        let output = format(&input);
        assert_eq!(output, "\n".repeat(count));
    }
}

#[test]
fn test_select_returns_to_outer_depth() {
    for arms in 0..4 {
        let mut input = String::from("IF A\nSELECTCASE X\n");
        for i in 0..arms {
            input.push_str(&format!("CASE {i}\nPRINTL {i}\n"));
        }
        input.push_str("ENDSELECT\nPRINTL after\nENDIF\n");

        let output = format(&input);
        let lines: Vec<&str> = output.lines().collect();
        let after = lines.iter().position(|l| l.ends_with("PRINTL after")).unwrap();
        assert_eq!(depths(&output)[after], 1, "{arms} arms:\n{output}");
        assert_eq!(lines[after - 1], "\tENDSELECT");
    }
}

#[test]
fn test_select_with_caseelse() {
    let input = "SELECTCASE X\nCASE 1\nPRINTL one\nCASEELSE\nPRINTL other\nENDSELECT\nPRINTL done\n";
    assert_eq!(depths(&format(input)), vec![0, 1, 2, 1, 2, 0, 0]);
}

#[test]
fn test_select_with_only_caseelse() {
    let input = "SELECTCASE X\nCASEELSE\nPRINTL other\nENDSELECT\n";
    assert_eq!(depths(&format(input)), vec![0, 1, 2, 0]);
}

#[test]
fn test_region_pair_shares_depth() {
    let input = "\
@MAIN
;#region setup
IF A
PRINTL a
ENDIF
;#endregion
IF B
; region nested
REPEAT 3
PRINTL b
REND
; endregion
ENDIF
";
    let output = format(input);
    let lines: Vec<&str> = output.lines().collect();
    let d = depths(&output);
    assert_eq!(d[1], d[5]);
    assert_eq!(lines[7], "\t; region nested");
    assert_eq!(d[7], d[11]);
}

#[test]
fn test_unmatched_region_markers_fail() {
    assert!(matches!(
        format_err(";#region\nPRINTL a\n"),
        FormatError::UnclosedRegion { line: 1, .. }
    ));
    assert!(matches!(
        format_err("PRINTL a\n;#endregion\n"),
        FormatError::RegionUnderflow { line: 2 }
    ));
}

#[test]
fn test_sif_with_trivia() {
    let input = "IF A\nSIF B\n\n; why\n;#region\nPRINTL b\n;#endregion\nPRINTL c\nENDIF\n";
    let output = format(input);
    assert_eq!(
        output,
        "IF A\n\tSIF B\n\n\t\t; why\n\t\t;#region\n\t\tPRINTL b\n\t\t;#endregion\n\tPRINTL c\nENDIF\n"
    );
}

#[test]
fn test_concat_inside_if() {
    let input = "IF A\n{\nA + B\n}\nPRINTL c\nENDIF\n";
    assert_eq!(format(input), "IF A\n\t{\n\t\tA + B\n\t}\n\tPRINTL c\nENDIF\n");
}

#[test]
fn test_concat_openers_do_not_leak() {
    let input = "IF A\n{\nPRINTFORML %A%\nIF B\nREPEAT 2\n}\nPRINTL c\nENDIF\n";
    let output = format(input);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[5], "\t}");
    assert_eq!(lines[6], "\tPRINTL c");
    assert_eq!(lines[7], "ENDIF");
}

#[test]
fn test_function_definition_depth() {
    assert!(format_string("@FUNC\nPRINTL a\n", &Config::default()).is_ok());
    for opener in ["IF A", "REPEAT 3", "WHILE A", "SELECTCASE A\nCASE 1"] {
        let input = format!("{opener}\n@FUNC\n");
        assert!(
            matches!(format_err(&input), FormatError::IndentedFunction { .. }),
            "{opener}"
        );
    }
}

#[test]
fn test_idempotence() {
    let input = "\
@EVENTTRAIN
#DIM CNT
; count things
CNT = 0
  FOR LOCAL, 0, 10
SIF LOCAL == 5
    CONTINUE
        CNT ++
      NEXT
SELECTCASE CNT
    ; first arm
CASE 0
PRINTL none
  ; fallback
CASEELSE
{
PRINTFORML
%CNT%
}
ENDSELECT
";
    let once = format(input);
    let twice = format(&once);
    assert_eq!(once, twice);
}

#[test]
fn test_engine_reports_blank_lines_without_depth() {
    let mut stream = ErbStream::new("IF A\n\nPRINTL a\nENDIF\n".as_bytes(), LineClassifier::new());
    let mut recorder = DepthRecorder::default();
    let logical = ErbIndenter::default().run(&mut stream, &mut recorder).unwrap();

    assert_eq!(logical, 4);
    assert_eq!(recorder.depths, vec![Some(0), None, Some(1), Some(0)]);
}

#[test]
fn test_errors_carry_line_numbers() {
    let err = format_err("@A\nPRINTL a\nWHATEVER\n");
    assert_eq!(err.line(), Some(3));
    assert!(err.to_string().contains("WHATEVER"));

    let err = format_err("@A\n{\nPRINTL a\n");
    assert!(matches!(err, FormatError::UnterminatedConcat { line: 2 }));
}

#[test]
fn test_inferred_globals_are_file_wide() {
    let input = "@A\nSCORE = 1\n@B\nSCORE += 2\nSCORE\n";
    assert_eq!(format(input), input);
}

#[test]
fn test_locals_are_function_scoped() {
    let input = "@A\n#DIM TMP\nTMP\n@B\nTMP\n";
    assert!(matches!(
        format_err(input),
        FormatError::UnknownIdentifier { line: 5, .. }
    ));
}

#[test]
fn test_long_increment_run_is_handled() {
    let input = "++".repeat(100_000) + "X\n";
    assert_eq!(format(&input), input);

    let input = format!("@A\n{}PRINTL\n", "++".repeat(100_000));
    assert!(matches!(
        format_err(&input),
        FormatError::IncrementOnNonVariable { line: 2, .. }
    ));
}

#[test]
fn test_special_if_needs_argument() {
    assert!(matches!(
        format_err("[IF]\n"),
        FormatError::MalformedSpecialBlock { line: 1, .. }
    ));
    assert_eq!(format("[IF DEBUG_MODE]\nPRINTL a\n[ENDIF]\n"), "[IF DEBUG_MODE]\nPRINTL a\n[ENDIF]\n");
}
