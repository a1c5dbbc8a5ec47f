//! SUSA line interpreter.
//!
//! SUSA is a line-oriented toy language.  Scripts are run directly from
//! their source lines, with no separate parse step, and support:
//!
//! - `let` bindings and bare `name = expr` assignment
//! - `PRINT expr` and the `PRINT(...)` built-in
//! - `IF cond:` … `ELSE:` blocks delimited by `START:` / `END:`
//! - counted `LOOP i = a FOR n TIMES:` and `FOR x IN list:` iteration
//! - `FUNC name(params):` definitions whose calls roll back every variable
//!   change, leaving only the `RETURN` value visible to the caller
//!
//! # Quick start
//!
//! ```rust
//! use susa::script::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! let result = interp.execute("let x = 6\nPRINT x * 7");
//! assert!(result.success);
//! assert_eq!(result.output, "42");
//! ```

pub mod builtins;
pub mod error;
pub mod expr;
pub mod interp;
mod stack;
pub mod stmt;
pub mod value;

// Re-exports for convenience.
pub use error::RuntimeError;
pub use expr::EvalContext;
pub use interp::{ExecutionResult, FunctionDef, Interpreter, Limits, DEFAULT_OUTPUT};
pub use value::Value;

/// Run `src` on a fresh interpreter with default limits.
pub fn execute(src: &str) -> ExecutionResult {
    Interpreter::new().execute(src)
}
