//! Configuration management for erbfmt.
//!
//! This module provides the [`Config`] struct which controls re-indentation.
//! Configuration can be loaded from:
//! - TOML files (`erbfmt.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`; erbfmt: --spaces 2`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being formatted up to the filesystem root, plus the user's home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::IndentUnit;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["erbfmt.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

// Serde default functions
fn default_indent() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_empty_select_dedent() -> usize {
    1
}

/// Output line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    /// Reuse the first terminator found in the input (LF if there is none)
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl Newline {
    /// Resolve to a concrete terminator for `input`
    #[must_use]
    pub fn resolve(self, input: &str) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::Crlf => "\r\n",
            Newline::Auto => match input.find('\n') {
                Some(pos) if input[..pos].ends_with('\r') => "\r\n",
                _ => "\n",
            },
        }
    }
}

impl std::str::FromStr for Newline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Newline::Auto),
            "lf" | "unix" => Ok(Newline::Lf),
            "crlf" | "windows" => Ok(Newline::Crlf),
            other => Err(format!("unknown newline style '{other}' (expected auto, lf or crlf)")),
        }
    }
}

/// Main configuration struct for erbfmt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Indent with one tab per level (default: true)
    #[serde(default = "default_true")]
    pub use_tabs: bool,

    /// Spaces per indent level when `use_tabs` is false (default: 4)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Levels `ENDSELECT` closes when it directly follows `SELECTCASE` (1 or 2, default: 1)
    #[serde(default = "default_empty_select_dedent")]
    pub empty_select_dedent: usize,

    /// Output line terminator (default: auto)
    #[serde(default)]
    pub newline: Newline,

    /// Global variables known without an assignment-like use (e.g. declared in `.ERH` headers)
    #[serde(default)]
    pub globals: Vec<String>,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    pub use_tabs: Option<bool>,
    pub indent: Option<usize>,
    pub empty_select_dedent: Option<usize>,
    pub newline: Option<Newline>,
    #[serde(default)]
    pub globals: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            use_tabs: true,
            indent: 4,
            empty_select_dedent: 1,
            newline: Newline::Auto,
            globals: Vec::new(),
        }
    }
}

impl Config {
    /// Maximum reasonable indent size
    const MAX_INDENT: usize = 16;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.indent == 0 {
            return Some("indent must be at least 1".to_string());
        }
        if self.indent > Self::MAX_INDENT {
            return Some(format!(
                "indent {} exceeds maximum of {}",
                self.indent,
                Self::MAX_INDENT
            ));
        }
        if !matches!(self.empty_select_dedent, 1 | 2) {
            return Some(format!(
                "empty_select_dedent must be 1 or 2, got {}",
                self.empty_select_dedent
            ));
        }
        if let Some(bad) = self.globals.iter().find(|g| g.trim().is_empty()) {
            return Some(format!("globals contains an empty name ({bad:?})"));
        }
        None
    }

    /// Indent unit this configuration renders with
    #[must_use]
    pub fn indent_unit(&self) -> IndentUnit {
        IndentUnit::new(self.use_tabs, self.indent)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.use_tabs {
            self.use_tabs = v;
        }
        if let Some(v) = partial.indent {
            self.indent = v;
        }
        if let Some(v) = partial.empty_select_dedent {
            self.empty_select_dedent = v;
        }
        if let Some(v) = partial.newline {
            self.newline = v;
        }
        // Globals accumulate across files
        for name in &partial.globals {
            if !self.globals.contains(name) {
                self.globals.push(name.clone());
            }
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so the closest file wins
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let config_files = Self::discover_config_files(start_path);
        let mut config = Self::default();

        for path in &config_files {
            debug!(path = %path.display(), "loading config file");
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
