//! Runtime errors raised while executing a SUSA script.

use thiserror::Error;

/// An error that aborts script execution.
///
/// Arithmetic on non-numeric text is not an error; it quietly produces
/// `NaN` or `Infinity`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A call to a name that is neither a built-in nor a `FUNC` definition.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Nested blocks and user-function calls went deeper than the
    /// configured limit.
    #[error("Maximum call stack size exceeded")]
    DepthExceeded,

    /// The run dispatched more statements than the configured budget.
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(u64),
}
