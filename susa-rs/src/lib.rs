//! SUSA: a line-oriented toy scripting language.
//!
//! The crate has two independent parts:
//!
//! - [`script`]: the line interpreter, driven by [`execute`] or an owned
//!   [`Interpreter`].
//! - [`features`]: a pure feature detector that recommends which backend
//!   should run a script.
//!
//! The `susa` binary wraps both behind a small command line ([`cli`]) and an
//! optional rc file ([`config`]).

pub mod cli;
pub mod config;
pub mod features;
pub mod script;

use std::sync::Once;

pub use features::{
    detect_features, recommended_interpreter, should_use_python_interpreter, Backend,
    FeatureFlags, Recommendation,
};
pub use script::{execute, ExecutionResult, Interpreter, Limits, RuntimeError, Value};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once.  Enable with `RUST_LOG=susa=debug`, or
/// `RUST_LOG=susa=trace` to see every dispatched line.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
