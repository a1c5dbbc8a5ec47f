//! `.susarc` configuration file parser.
//!
//! The rc file is a list of `key = value` settings:
//!
//! | Key | Value | Effect |
//! |-----|-------|--------|
//! | `max_steps` | integer, `0` = unlimited | statement budget per run |
//! | `max_depth` (or `max_call_depth`) | integer ≥ 1 | combined nesting limit for blocks and `FUNC` calls |
//! | `format` | `text` \| `json` | how the binary reports a run |
//! | `color` | `auto` \| `always` \| `never` | colouring of error messages |
//! | `detect` | bool | print the backend recommendation first |
//!
//! Lines starting with `#` or `;` are comments.  Bad lines are reported and
//! skipped; the rest of the file still applies.

use std::path::Path;

use thiserror::Error;

use crate::script::Limits;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// How the binary reports the outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Output lines on stdout, the error on stderr.
    #[default]
    Text,
    /// The whole result as one JSON object on stdout.
    Json,
}

/// When error messages are coloured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Only when stderr is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

/// Parsed settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub limits: Limits,
    pub format: OutputFormat,
    pub color: ColorMode,
    pub detect: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an rc string.
    ///
    /// Returns the config and a list of any problems found; settings on the
    /// offending lines keep their previous values.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = Config::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Err(message) = config.apply(line) {
                errors.push(ConfigError { line: i + 1, message });
            }
        }

        (config, errors)
    }

    /// Read and parse an rc file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    /// Apply one `key = value` line.
    fn apply(&mut self, line: &str) -> Result<(), String> {
        let Some((key, value)) = line.split_once('=') else {
            return Err(format!("expected `key = value`, got {line:?}"));
        };
        let value = unquote(value.trim());

        match key.trim() {
            "max_steps" => {
                let n = parse_int(value)?;
                self.limits.max_steps = (n > 0).then_some(n);
            }
            key @ ("max_depth" | "max_call_depth") => {
                let n = parse_int(value)?;
                if n == 0 {
                    return Err(format!("{key} must be at least 1"));
                }
                self.limits.max_depth =
                    usize::try_from(n).map_err(|_| format!("{key} too large: {n}"))?;
            }
            "format" => {
                self.format = match value.to_ascii_lowercase().as_str() {
                    "text" => OutputFormat::Text,
                    "json" => OutputFormat::Json,
                    _ => return Err(format!("unknown format: {value}")),
                };
            }
            "color" | "colour" => {
                self.color = match value.to_ascii_lowercase().as_str() {
                    "auto" => ColorMode::Auto,
                    "always" => ColorMode::Always,
                    "never" => ColorMode::Never,
                    _ => return Err(format!("unknown color mode: {value}")),
                };
            }
            "detect" => self.detect = parse_bool(value)?,
            other => return Err(format!("unknown setting: {other}")),
        }
        Ok(())
    }
}

// ── Value parsers ─────────────────────────────────────────────────────────────

/// Strip one pair of matching double quotes.
fn unquote(s: &str) -> &str {
    s.strip_prefix('"').and_then(|r| r.strip_suffix('"')).unwrap_or(s)
}

fn parse_int(s: &str) -> Result<u64, String> {
    s.parse().map_err(|_| format!("not a non-negative integer: {s:?}"))
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "on" | "yes" | "true" => Ok(true),
        "0" | "off" | "no" | "false" => Ok(false),
        _ => Err(format!("not a boolean: {s:?}")),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
