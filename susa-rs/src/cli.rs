//! Command-line argument parsing.
//!
//! Usage:
//!   susa [-f[<rc>]] [-jd] [-s <n>] [-e <code>]
//!   susa [-f[<rc>]] [-jd] [-s <n>] [<file> | -]

use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable naming an rc file to use instead of the search.
pub const CONFIG_ENV: &str = "SUSA_CONFIG";

/// Usage lines printed after an argument error.
pub const USAGE: &str = "Usage: susa [-f[<rc>]] [-jd] [-s <n>] [-e <code>]\n       \
                         susa [-f[<rc>]] [-jd] [-s <n>] [<file> | -]";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Which rc file to load.
    pub config: ConfigFile,
    /// Print the result as JSON (`-j`).
    pub json: bool,
    /// Print the backend recommendation before running (`-d`).
    pub detect: bool,
    /// Step budget override (`-s <n>`, `0` = unlimited).
    pub max_steps: Option<u64>,
    /// Where the script comes from.
    pub source: ScriptSource,
}

/// How to choose the rc file.
#[derive(Debug, Default)]
pub enum ConfigFile {
    /// `$SUSA_CONFIG`, then `./.susarc`, then the user config dir (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip the rc file.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

/// Where the script text comes from.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ScriptSource {
    /// No positional argument, or `-`.
    #[default]
    Stdin,
    /// A script path.
    File(PathBuf),
    /// `-e <code>`.
    Inline(String),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(raw.get(1..).unwrap_or_default())
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'j' => args.json = true,
                'd' => args.detect = true,

                // -f<file>; a bare -f skips the rc file and leaves the next
                // argument alone.
                'f' => {
                    args.config = if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        ConfigFile::Explicit(PathBuf::from(file))
                    } else {
                        ConfigFile::Skip
                    };
                }

                // -s<n> or -s <n>
                's' => {
                    let value = take_value(&chars, &mut j, argv, &mut i)
                        .ok_or("-s requires a step count")?;
                    let n: u64 = value
                        .parse()
                        .map_err(|_| format!("invalid step count: {value}"))?;
                    args.max_steps = Some(n);
                }

                // -e<code> or -e <code>
                'e' => {
                    let code = take_value(&chars, &mut j, argv, &mut i)
                        .ok_or("-e requires a code argument")?;
                    args.source = ScriptSource::Inline(code);
                }

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    let inline = matches!(args.source, ScriptSource::Inline(_));
    match (positional.len(), inline) {
        (0, _) => {}
        (_, true) => return Err("-e cannot be combined with a script file".to_owned()),
        (1, false) => {
            let path = positional.remove(0);
            if path != "-" {
                args.source = ScriptSource::File(PathBuf::from(path));
            }
        }
        (n, false) => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

/// The value of a flag: the rest of the current cluster, or the next
/// argument.
fn take_value(chars: &[char], j: &mut usize, argv: &[String], i: &mut usize) -> Option<String> {
    if *j + 1 < chars.len() {
        let s: String = chars[*j + 1..].iter().collect();
        *j = chars.len();
        Some(s)
    } else if *i + 1 < argv.len() {
        *i += 1;
        Some(argv[*i].clone())
    } else {
        None
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// The rc file inside the platform config directory, e.g.
/// `~/.config/susa/susarc` on Linux.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "susa").map(|dirs| dirs.config_dir().join("susarc"))
}

/// Search for the rc file in the standard locations.
/// Returns the first path that exists, or `None`.
///
/// `$SUSA_CONFIG` wins outright when set, even if the file is missing.
pub fn find_user_config() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    std::iter::once(PathBuf::from("./.susarc"))
        .chain(user_config_path())
        .find(|p| p.exists())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
