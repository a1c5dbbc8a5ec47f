use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use crossterm::style::Stylize;
use tracing::debug;

use susa::cli::{self, ConfigFile, ScriptSource};
use susa::config::{ColorMode, Config, OutputFormat};
use susa::{recommended_interpreter, ExecutionResult, Interpreter};

fn main() -> ExitCode {
    susa::init_tracing();

    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("susa: {e}");
            eprintln!("{}", cli::USAGE);
            return ExitCode::FAILURE;
        }
    };

    // ── Load rc file ──────────────────────────────────────────────────────────
    let rc = match &args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    let mut config = rc.as_deref().map(load_config).unwrap_or_default();

    // ── Command-line overrides ────────────────────────────────────────────────
    if args.json {
        config.format = OutputFormat::Json;
    }
    if args.detect {
        config.detect = true;
    }
    if let Some(n) = args.max_steps {
        config.limits.max_steps = (n > 0).then_some(n);
    }

    let src = match read_source(&args.source) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("susa: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Run ───────────────────────────────────────────────────────────────────
    if config.detect {
        let rec = recommended_interpreter(&src);
        match config.format {
            OutputFormat::Text => eprintln!("susa: backend: {} ({})", rec.interpreter, rec.reason),
            OutputFormat::Json => match serde_json::to_string(&rec) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("susa: {e}"),
            },
        }
    }

    let result = Interpreter::with_limits(config.limits).execute(&src);
    debug!(success = result.success, "run complete");

    match config.format {
        OutputFormat::Text => report_text(&result, use_color(config.color)),
        OutputFormat::Json => match serde_json::to_string(&result) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("susa: {e}");
                return ExitCode::FAILURE;
            }
        },
    }

    if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Load an rc file, reporting problems as warnings.
fn load_config(path: &Path) -> Config {
    match Config::load_file(path) {
        Ok((config, errors)) => {
            for e in errors {
                eprintln!("susa: warning: {}: {e}", path.display());
            }
            config
        }
        Err(e) => {
            eprintln!("susa: warning: {}: {e}", path.display());
            Config::default()
        }
    }
}

fn read_source(source: &ScriptSource) -> io::Result<String> {
    match source {
        ScriptSource::Inline(code) => Ok(code.clone()),
        ScriptSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display()))),
        ScriptSource::Stdin => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s)?;
            Ok(s)
        }
    }
}

fn use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal(),
    }
}

fn report_text(result: &ExecutionResult, color: bool) {
    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if let Some(err) = &result.error {
        if color {
            eprintln!("{}", err.as_str().red());
        } else {
            eprintln!("{err}");
        }
    }
}
