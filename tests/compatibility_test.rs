//! Compatibility tests against expected output
//!
//! Every script under `tests/fixtures/in` is re-indented and compared with its
//! counterpart under `tests/fixtures/out`. The expected files must also be
//! fixed points of the formatter.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use erbfmt::process::format_file;
use erbfmt::Config;

/// Run erbfmt on `input` and return the output as text
fn run_format(input: &str, config: &Config, name: &str) -> String {
    let reader = BufReader::new(Cursor::new(input.as_bytes()));
    let mut output = Vec::new();
    format_file(reader, &mut output, config, name)
        .unwrap_or_else(|e| panic!("erbfmt failed on {name}: {e:#}"));
    String::from_utf8(output).unwrap_or_else(|e| panic!("Invalid UTF-8 in output for {name}: {e}"))
}

/// Compare line by line, reporting the first difference
fn assert_same_lines(result: &str, expected: &str, name: &str) {
    let result_lines: Vec<&str> = result.lines().collect();
    let expected_lines: Vec<&str> = expected.lines().collect();

    let first_difference = result_lines
        .iter()
        .zip(expected_lines.iter())
        .position(|(r, e)| r != e);

    if let Some(i) = first_difference {
        eprintln!("\n=== First difference in {name} ===");
        eprintln!("Line {}: expected: {:?}", i + 1, expected_lines[i]);
        eprintln!("Line {}: got:      {:?}", i + 1, result_lines[i]);
        panic!("{name}: output differs at line {}", i + 1);
    }

    if result_lines.len() != expected_lines.len() {
        eprintln!("=== Line count mismatch for {name} ===");
        eprintln!(
            "Expected {} lines, got {} lines",
            expected_lines.len(),
            result_lines.len()
        );
        panic!("Line count mismatch");
    }

    assert_eq!(result, expected, "{name}: line terminators differ");
}

fn fixture_dir(kind: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(kind)
}

/// All fixture names, sorted
fn fixture_names() -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(fixture_dir("in"))
        .expect("fixture directory is missing")
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| Path::new(name).extension().is_some_and(|ext| ext.eq_ignore_ascii_case("erb")))
        .collect();
    names.sort();
    names
}

fn read_fixture(kind: &str, name: &str) -> String {
    let path = fixture_dir(kind).join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

#[test]
fn test_fixtures_match_expected_output() {
    let names = fixture_names();
    assert!(!names.is_empty(), "no fixtures found");

    for name in &names {
        let input = read_fixture("in", name);
        let expected = read_fixture("out", name);
        let result = run_format(&input, &Config::default(), name);
        assert_same_lines(&result, &expected, name);
    }
}

#[test]
fn test_expected_output_is_fixed_point() {
    for name in &fixture_names() {
        let expected = read_fixture("out", name);
        let result = run_format(&expected, &Config::default(), name);
        assert_same_lines(&result, &expected, name);
    }
}

#[test]
fn test_fixtures_with_spaces() {
    let config = Config {
        use_tabs: false,
        indent: 2,
        ..Default::default()
    };

    for name in &fixture_names() {
        let input = read_fixture("in", name);
        let expected: String = read_fixture("out", name)
            .lines()
            .map(|line| {
                let tabs = line.chars().take_while(|&c| c == '\t').count();
                format!("{}{}\n", "  ".repeat(tabs), &line[tabs..])
            })
            .collect();
        let result = run_format(&input, &config, name);
        assert_same_lines(&result, &expected, name);
    }
}

#[test]
fn test_fixtures_with_crlf() {
    for name in &fixture_names() {
        let input = read_fixture("in", name).replace('\n', "\r\n");
        let expected = read_fixture("out", name).replace('\n', "\r\n");
        let result = run_format(&input, &Config::default(), name);
        assert_same_lines(&result, &expected, name);
    }
}

#[test]
fn test_directive_overrides_fixture_config() {
    let input = format!("; erbfmt: --spaces 3\n{}", read_fixture("in", "SHOP.ERB"));
    let result = run_format(&input, &Config::default(), "SHOP.ERB");
    assert!(result.contains("\n   IF MONEY >= ITEMPRICE:ITEM_ID\n"));
    assert!(result.contains("\n      PRINTFORMC %LABEL%\n"));
}

#[test]
fn test_empty_select_dedent_two() {
    // A corpus where an empty SELECTCASE is closed as if it had an arm
    let input = "IF A\nIF B\nSELECTCASE X\nENDSELECT\nENDIF\n";
    let config = Config {
        empty_select_dedent: 2,
        ..Default::default()
    };
    let result = run_format(input, &config, "legacy.erb");
    assert_same_lines(
        &result,
        "IF A\n\tIF B\n\t\tSELECTCASE X\n\tENDSELECT\nENDIF\n",
        "legacy.erb",
    );
}
