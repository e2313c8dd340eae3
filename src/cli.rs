//! Command-line interface for erbfmt.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::{Config, Newline};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to format
    pub inputs: Vec<PathBuf>,

    /// Indent with tabs (overrides a config file that selects spaces)
    pub tabs: bool,

    /// Indent with this many spaces per level
    pub indent: Option<usize>,

    /// Levels `ENDSELECT` closes directly after `SELECTCASE`
    pub empty_select_dedent: Option<usize>,

    /// Output line terminator
    pub newline: Option<Newline>,

    /// Extra known global variables
    pub globals: Vec<String>,

    /// Output to stdout instead of in-place
    pub stdout: bool,

    /// Report files that would change, without writing
    pub check: bool,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Silent mode (no output)
    pub silent: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom ERB file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Exclude files with more than this many lines
    pub exclude_max_lines: Option<usize>,

    /// Enable debug output
    pub debug: bool,
}

impl CliArgs {
    /// Override `config` with the settings given on the command line
    pub fn apply_to(&self, config: &mut Config) {
        if self.tabs {
            config.use_tabs = true;
        }
        if let Some(indent) = self.indent {
            config.use_tabs = false;
            config.indent = indent;
        }
        if let Some(levels) = self.empty_select_dedent {
            config.empty_select_dedent = levels;
        }
        if let Some(newline) = self.newline {
            config.newline = newline;
        }
        for name in &self.globals {
            if !config.globals.contains(name) {
                config.globals.push(name.clone());
            }
        }
    }
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("erbfmt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Re-indenter for ERB scripts")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to format ('-' for stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("tabs")
                .long("tabs")
                .help("Indent with one tab per level [default]")
                .action(ArgAction::SetTrue)
                .conflicts_with("indent"),
        )
        .arg(
            Arg::new("indent")
                .short('i')
                .long("indent")
                .help("Indent with NUM spaces per level instead of tabs")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("empty-select-dedent")
                .long("empty-select-dedent")
                .help("Levels ENDSELECT closes when it directly follows SELECTCASE (1 or 2) [default: 1]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("newline")
                .long("newline")
                .help("Output line terminator: auto, lf or crlf [default: auto]")
                .value_name("STYLE")
                .value_parser(clap::value_parser!(Newline)),
        )
        .arg(
            Arg::new("global")
                .short('g')
                .long("global")
                .help("Known global variable used without assignment (can be repeated)")
                .value_name("NAME")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .help("Output to stdout instead of modifying files in-place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Only report files whose indentation would change; exit non-zero if any")
                .action(ArgAction::SetTrue)
                .conflicts_with("stdout"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively format directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("ext")
                .short('x')
                .long("ext")
                .help("Additional ERB file extension (can be repeated, e.g., -x erh)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-max-lines")
                .short('m')
                .long("exclude-max-lines")
                .help("Exclude files with more than this many lines")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (config resolution, per-file summary)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no output, for editor integration)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let strings = |id: &str| -> Vec<String> {
        matches
            .get_many::<String>(id)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default()
    };

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        tabs: matches.get_flag("tabs"),
        indent: matches.get_one::<usize>("indent").copied(),
        empty_select_dedent: matches.get_one::<usize>("empty-select-dedent").copied(),
        newline: matches.get_one::<Newline>("newline").copied(),
        globals: strings("global"),
        stdout: matches.get_flag("stdout"),
        check: matches.get_flag("check"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: strings("exclude"),
        extensions: strings("ext"),
        exclude_max_lines: matches.get_one::<usize>("exclude-max-lines").copied(),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
        jobs: matches.get_one::<usize>("jobs").copied(),
    }
}
