//! Built-in SUSA functions.
//!
//! Built-ins are seeded into the function table at the start of every run
//! and always take precedence over a `FUNC` of the same name.

use super::value::Value;

/// A built-in function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `PRINT(value)`: append the first argument to the output buffer.
    Print,
}

/// Every built-in, in seeding order.
pub const BUILTINS: &[Builtin] = &[Builtin::Print];

impl Builtin {
    /// Resolve a function name to a built-in.
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTINS.iter().copied().find(|b| b.name() == name)
    }

    /// Name as written in scripts.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Print => "PRINT",
        }
    }

    /// Declared parameter names.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            Builtin::Print => &["value"],
        }
    }

    /// Run the built-in.  Output-producing built-ins append to `output`.
    pub fn call(self, args: &[Value], output: &mut Vec<String>) -> Value {
        match self {
            Builtin::Print => {
                // Extra arguments are ignored; a missing or nullish one prints
                // as an empty line.
                let line = match args.first() {
                    Some(v) if !v.is_nullish() => v.to_string(),
                    _ => String::new(),
                };
                output.push(line);
                Value::Null
            }
        }
    }
}

/// Dispatch a built-in function call.
///
/// Returns `None` if `name` is not a built-in (the caller should then try
/// user-defined functions).
pub fn call_builtin(name: &str, args: &[Value], output: &mut Vec<String>) -> Option<Value> {
    Builtin::lookup(name).map(|b| b.call(args, output))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(Builtin::lookup("PRINT"), Some(Builtin::Print));
        assert_eq!(Builtin::lookup("print"), None);
        assert_eq!(Builtin::Print.params(), &["value"]);
    }

    #[test]
    fn print_first_argument_only() {
        let mut out = Vec::new();
        let ret = call_builtin("PRINT", &[Value::Number(1.0), Value::from("ignored")], &mut out);
        assert_eq!(ret, Some(Value::Null));
        assert_eq!(out, vec!["1"]);
    }

    #[test]
    fn print_nullish_or_missing_is_empty() {
        let mut out = Vec::new();
        call_builtin("PRINT", &[], &mut out);
        call_builtin("PRINT", &[Value::Null], &mut out);
        call_builtin("PRINT", &[Value::Undefined], &mut out);
        assert_eq!(out, vec!["", "", ""]);
    }

    #[test]
    fn print_falsy_values_are_kept() {
        let mut out = Vec::new();
        call_builtin("PRINT", &[Value::Number(0.0)], &mut out);
        call_builtin("PRINT", &[Value::Bool(false)], &mut out);
        assert_eq!(out, vec!["0", "false"]);
    }

    #[test]
    fn not_a_builtin() {
        let mut out = Vec::new();
        assert_eq!(call_builtin("add", &[], &mut out), None);
        assert!(out.is_empty());
    }
}
