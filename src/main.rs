//! erbfmt - Re-indenter for ERB scripts

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use erbfmt::process::format_file;
use erbfmt::{parse_args, CliArgs, Config, Result};
use glob::Pattern;
use rayon::prelude::*;
use tracing::{debug, warn, Level};
use walkdir::WalkDir;

/// ERB file extensions to process
const ERB_EXTENSIONS: &[&str] = &["erb", "ERB"];

/// Default maximum file size in bytes (100 MB)
/// Files larger than this are skipped to prevent memory exhaustion
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// What happened to a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Changed,
    Skipped,
}

fn main() -> Result<ExitCode> {
    let args = parse_args();
    init_tracing(&args);

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    // If no inputs and running interactively, print usage; otherwise read from stdin
    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    }

    if use_stdin {
        // Use current directory for config discovery
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = match &args.config {
        Some(_) => Some(build_config(&args, None)?),
        None => None,
    };

    if let Some(jobs) = args.jobs.filter(|&jobs| jobs > 0) {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
        {
            warn!("failed to configure thread pool: {e}");
        }
    }

    let files = collect_files(&args);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No ERB files found to format.");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let run = |path: &PathBuf| -> Result<(PathBuf, Outcome)> {
        let outcome = match &base_config {
            Some(config) => process_single_file(path, config, &args),
            None => build_config(&args, Some(path.as_path()))
                .and_then(|config| process_single_file(path, &config, &args)),
        };
        outcome
            .with_context(|| path.display().to_string())
            .map(|outcome| (path.clone(), outcome))
    };

    // Stop at the first failing file
    let outcomes: Vec<(PathBuf, Outcome)> = if args.stdout || args.jobs == Some(1) {
        files.iter().map(run).collect::<Result<_>>()?
    } else {
        files.par_iter().map(run).collect::<Result<_>>()?
    };

    Ok(report(&outcomes, &args))
}

/// Install the stderr subscriber; `--debug` enables debug events
fn init_tracing(args: &CliArgs) {
    let level = if args.debug {
        Level::DEBUG
    } else if args.silent {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .init();
}

/// Print the run summary and pick the exit status
fn report(outcomes: &[(PathBuf, Outcome)], args: &CliArgs) -> ExitCode {
    let changed: Vec<&PathBuf> = outcomes
        .iter()
        .filter(|(_, outcome)| *outcome == Outcome::Changed)
        .map(|(path, _)| path)
        .collect();
    let skipped = outcomes
        .iter()
        .filter(|(_, outcome)| *outcome == Outcome::Skipped)
        .count();

    if args.check {
        for path in &changed {
            println!("{}", path.display());
        }
        if !args.silent {
            eprintln!(
                "{} of {} files would be re-indented.",
                changed.len(),
                outcomes.len() - skipped
            );
        }
        return if changed.is_empty() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    if !args.silent && !args.stdout {
        eprintln!(
            "Formatted {} files ({} changed, {} skipped).",
            outcomes.len() - skipped,
            changed.len(),
            skipped
        );
    }
    ExitCode::SUCCESS
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        Config::from_discovered_files(&start)
    };

    args.apply_to(&mut config);
    debug!(?config, "resolved configuration");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring exclude pattern '{p}': {e}");
                None
            }
        })
        .collect();

    let custom_extensions = &args.extensions;
    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // WalkDir reports symlink loops as errors, which are skipped
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_erb_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else if let Ok(entries) = std::fs::read_dir(input) {
                for entry in entries.filter_map(std::result::Result::ok) {
                    let path = entry.path();
                    if path.is_file()
                        && is_erb_file(&path, custom_extensions)
                        && !is_excluded(&path, &exclude_patterns)
                    {
                        files.push(path);
                    }
                }
            }
        } else {
            warn!("no such file or directory: {}", input.display());
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

/// Count the number of lines in a byte buffer
#[allow(clippy::naive_bytecount)]
fn count_lines(contents: &[u8]) -> usize {
    let newlines = contents.iter().filter(|&&b| b == b'\n').count();
    if contents.is_empty() {
        0
    } else if contents.last() == Some(&b'\n') {
        newlines
    } else {
        newlines + 1
    }
}

/// Check if a file has an ERB extension (defaults plus `-x` additions)
fn is_erb_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ERB_EXTENSIONS.contains(&ext)
                || custom_extensions
                    .iter()
                    .any(|custom| ext == custom.strip_prefix('.').unwrap_or(custom))
        })
}

/// Process a single file
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<Outcome> {
    // Check file size BEFORE reading
    let file_size = std::fs::metadata(path)?.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(Outcome::Skipped);
    }

    let mut file_contents = Vec::new();
    File::open(path)?.read_to_end(&mut file_contents)?;

    if let Some(max_lines) = args.exclude_max_lines {
        let line_count = count_lines(&file_contents);
        if line_count > max_lines {
            if !args.silent {
                eprintln!(
                    "Skipping {} ({} lines exceeds limit of {})",
                    path.display(),
                    line_count,
                    max_lines
                );
            }
            return Ok(Outcome::Skipped);
        }
    }

    let name = path.to_string_lossy();
    let reader = BufReader::new(Cursor::new(&file_contents));
    let mut output = Vec::new();
    format_file(reader, &mut output, config, &name)?;

    let outcome = if output == file_contents {
        Outcome::Unchanged
    } else {
        Outcome::Changed
    };

    if args.stdout {
        io::stdout().lock().write_all(&output)?;
    } else if !args.check && outcome == Outcome::Changed {
        std::fs::write(path, &output)?;
    }

    Ok(outcome)
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<ExitCode> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let reader = BufReader::new(Cursor::new(&stdin_contents));
    let mut output = Vec::new();
    format_file(reader, &mut output, config, "stdin").context("stdin")?;

    if args.check {
        return Ok(if output == stdin_contents {
            ExitCode::SUCCESS
        } else {
            println!("stdin");
            ExitCode::FAILURE
        });
    }

    io::stdout().write_all(&output)?;
    Ok(ExitCode::SUCCESS)
}

fn print_usage() {
    println!(
        "erbfmt v{} - re-indenter for ERB scripts",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  erbfmt [OPTIONS] <FILE>...");
    println!("  erbfmt [OPTIONS] -r <DIRECTORY>");
    println!("  erbfmt [OPTIONS] -              # Read from stdin");
    println!("  cat FILE.ERB | erbfmt           # Pipe input");
    println!();
    println!("Examples:");
    println!("  erbfmt SHOP.ERB                 # Re-indent a single file in-place");
    println!("  erbfmt -r ERB/                  # Recursively re-indent a directory");
    println!("  erbfmt --check -r ERB/          # List files that would change");
    println!("  erbfmt -i 2 --stdout SHOP.ERB   # Two-space indent, print to stdout");
    println!("  erbfmt -g DAYS -r ERB/          # DAYS is a global declared in a header");
    println!();
    println!("Options:");
    println!("  --tabs                          Indent with tabs [default]");
    println!("  -i, --indent <NUM>              Indent with NUM spaces per level");
    println!("  --empty-select-dedent <NUM>     Levels ENDSELECT closes right after SELECTCASE [default: 1]");
    println!("  --newline <STYLE>               auto, lf or crlf [default: auto]");
    println!("  -g, --global <NAME>             Known global variable (repeatable)");
    println!("  -r, --recursive                 Process directories recursively");
    println!("  -e, --exclude <PATTERN>         Exclude files/dirs matching pattern (repeatable)");
    println!("  -x, --ext <EXT>                 Additional ERB extension (repeatable)");
    println!("  -m, --exclude-max-lines <NUM>   Skip files with more than NUM lines");
    println!("  -s, --stdout                    Output to stdout");
    println!("  --check                         Report files that would change, write nothing");
    println!("  -c, --config <FILE>             Config file path (overrides auto-discovery)");
    println!("  -j, --jobs <NUM>                Parallel jobs (0=auto, 1=sequential)");
    println!("  -D, --debug                     Enable debug output");
    println!("  -S, --silent                    Silent mode");
    println!("  -h, --help                      Print help");
    println!();
    println!("In-file directive:");
    println!("  ; erbfmt: --spaces 2            Override settings for one file (--off skips it)");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for erbfmt.toml in parent directories");
    println!("  starting from the file being formatted up to the root directory.");
    println!("  Also checks erbfmt.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
