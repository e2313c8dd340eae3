//! Inline directive parsing for `; erbfmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `; erbfmt: --spaces 2 --empty-select-dedent 2`
//!
//! To the classifier a directive is an ordinary comment line.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;

/// Pattern to match erbfmt directives
static ERBFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*;\s*erbfmt:\s*(.*?)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub use_tabs: Option<bool>,
    pub indent: Option<usize>,
    pub empty_select_dedent: Option<usize>,
    /// Leave the file untouched
    pub off: bool,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.use_tabs.is_none()
            && self.indent.is_none()
            && self.empty_select_dedent.is_none()
            && !self.off
    }

    /// Apply the overrides on top of `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(v) = self.use_tabs {
            config.use_tabs = v;
        }
        if let Some(v) = self.indent {
            config.indent = v;
        }
        if let Some(v) = self.empty_select_dedent {
            config.empty_select_dedent = v;
        }
    }
}

/// Check if a line contains an erbfmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    ERBFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an erbfmt directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one known option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = ERBFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();
    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let mut tokens = args_str.split_whitespace();

    while let Some(token) = tokens.next() {
        match token {
            "--tabs" => overrides.use_tabs = Some(true),
            "-i" | "--spaces" | "--indent" => {
                if let Some(width) = tokens.next().and_then(|t| t.parse().ok()) {
                    overrides.use_tabs = Some(false);
                    overrides.indent = Some(width);
                }
            }
            "--empty-select-dedent" => {
                overrides.empty_select_dedent = tokens.next().and_then(|t| t.parse().ok());
            }
            "--off" => overrides.off = true,
            _ => {
                // Unknown option, skip
            }
        }
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan text for erbfmt directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
#[must_use]
pub fn find_directive(text: &str) -> Option<DirectiveOverrides> {
    text.lines()
        .find(|line| is_directive_line(line))
        .and_then(parse_directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("; erbfmt: --tabs"));
        assert!(is_directive_line("\t;erbfmt: --off"));
        assert!(is_directive_line("; ERBFMT: --spaces 2"));
        assert!(!is_directive_line("; this is a regular comment"));
        assert!(!is_directive_line("PRINTL erbfmt: --off"));
    }

    #[test]
    fn test_parse_directive_spaces() {
        let overrides = parse_directive("; erbfmt: --spaces 2").unwrap();
        assert_eq!(overrides.use_tabs, Some(false));
        assert_eq!(overrides.indent, Some(2));
    }

    #[test]
    fn test_parse_directive_multiple() {
        let overrides = parse_directive("; erbfmt: --tabs --empty-select-dedent 2").unwrap();
        assert_eq!(overrides.use_tabs, Some(true));
        assert_eq!(overrides.empty_select_dedent, Some(2));
        assert!(!overrides.off);
    }

    #[test]
    fn test_parse_directive_off() {
        let overrides = parse_directive(";erbfmt: --off").unwrap();
        assert!(overrides.off);
    }

    #[test]
    fn test_parse_invalid_directive() {
        assert!(parse_directive("; erbfmt:").is_none());
        assert!(parse_directive("; erbfmt: --spaces many").is_none());
    }

    #[test]
    fn test_apply_to_config() {
        let mut config = Config::default();
        parse_directive("; erbfmt: --spaces 3 --empty-select-dedent 2")
            .unwrap()
            .apply_to(&mut config);
        assert!(!config.use_tabs);
        assert_eq!(config.indent, 3);
        assert_eq!(config.empty_select_dedent, 2);
    }

    #[test]
    fn test_find_first_directive() {
        let text = "@FOO\n; erbfmt: --spaces 2\n; erbfmt: --off\nPRINTL a\n";
        let overrides = find_directive(text).unwrap();
        assert_eq!(overrides.indent, Some(2));
        assert!(!overrides.off);
    }

    #[test]
    fn test_find_directive_none() {
        assert!(find_directive("@FOO\nPRINTL a\n").is_none());
    }
}
