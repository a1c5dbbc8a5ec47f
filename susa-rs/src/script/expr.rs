//! SUSA expression and condition evaluation.
//!
//! SUSA expressions are not tokenised.  An expression is matched against an
//! ordered list of recognisers ([`MATCHERS`]); the first one that accepts the
//! text decides how it is evaluated, and operands are evaluated recursively
//! by splitting on the operator's spaced spelling (`" + "`, `" - "`, …).
//!
//! The order is part of the language:
//!
//! | # | Form | Result |
//! |---|------|--------|
//! | 1 | `"text"` / `'text'` | string, quotes stripped, no escapes |
//! | 2 | `12`, `3.5` | number |
//! | 3 | `true`, `false`, `null` | boolean / null |
//! | 4 | `[a, b]` | array, naive comma split |
//! | 5 | `name` | variable, or the name itself when unset |
//! | 6 | `a + b` | **string concatenation**, even for numbers |
//! | 7 | `a - b`, `a * b`, `a / b` | numeric, reduced left to right |
//! | 8 | `f(a, b)` | function call |
//! | 9 | anything else | the text itself |
//!
//! Because concatenation is recognised before calls, `f(1 + 2)` splits on
//! `" + "` instead of calling `f`.

use std::sync::LazyLock;

use regex::Regex;

use super::error::RuntimeError;
use super::value::{trim, Value};

// ── EvalContext ───────────────────────────────────────────────────────────────

/// Dependency-injection interface used by the evaluator.
///
/// The [`Interpreter`](super::interp::Interpreter) implements this trait to
/// give expressions access to the variable table and the function table.
pub trait EvalContext {
    /// Look up a variable.
    fn get_var(&self, name: &str) -> Option<&Value>;

    /// Invoke a built-in or user-defined function.
    fn call_fn(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

// ── Recognisers ───────────────────────────────────────────────────────────────

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[0-9]+(\.[0-9]+)?$"));
static IDENT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z0-9_]+$"));
static CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([A-Za-z0-9_]+)\s*\(([^)]*)\)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid expression pattern {pattern:?}: {e}"))
}

/// Separator of a concatenation.
const CONCAT: &str = " + ";

/// A numeric operator recognised by splitting on its spaced spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// The separator the operands are split on.
    pub fn token(self) -> &'static str {
        match self {
            ArithOp::Sub => " - ",
            ArithOp::Mul => " * ",
            ArithOp::Div => " / ",
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
            ArithOp::Div => a / b,
        }
    }
}

/// How an expression will be evaluated, as decided by the first matching
/// recogniser.
#[derive(Debug, Clone, PartialEq)]
pub enum Form<'a> {
    Literal(Value),
    /// Text between the brackets of an array literal.
    Array(&'a str),
    Ident(&'a str),
    /// Operands joined with `" + "`.
    Concat,
    Arith(ArithOp),
    Call { name: &'a str, args: &'a str },
    Opaque,
}

/// A recogniser: `Some` if it accepts the expression.
pub type Matcher = for<'a> fn(&'a str) -> Option<Form<'a>>;

/// Recognisers in priority order.  The first `Some` wins.
pub const MATCHERS: &[Matcher] = &[
    match_quoted,
    match_number,
    match_keyword,
    match_array,
    match_ident,
    match_concat,
    match_sub,
    match_mul,
    match_div,
    match_call,
];

fn match_quoted(e: &str) -> Option<Form<'_>> {
    ['"', '\''].into_iter().find_map(|q| {
        let inner = e.strip_prefix(q)?.strip_suffix(q)?;
        (!inner.contains(q)).then(|| Form::Literal(Value::Str(inner.to_owned())))
    })
}

fn match_number(e: &str) -> Option<Form<'_>> {
    if !NUMBER_RE.is_match(e) {
        return None;
    }
    e.parse().ok().map(|n| Form::Literal(Value::Number(n)))
}

fn match_keyword(e: &str) -> Option<Form<'_>> {
    match e {
        "true" => Some(Form::Literal(Value::Bool(true))),
        "false" => Some(Form::Literal(Value::Bool(false))),
        "null" => Some(Form::Literal(Value::Null)),
        _ => None,
    }
}

fn match_array(e: &str) -> Option<Form<'_>> {
    e.strip_prefix('[')?.strip_suffix(']').map(Form::Array)
}

fn match_ident(e: &str) -> Option<Form<'_>> {
    IDENT_RE.is_match(e).then_some(Form::Ident(e))
}

fn match_concat(e: &str) -> Option<Form<'_>> {
    e.contains(CONCAT).then_some(Form::Concat)
}

fn match_arith(e: &str, op: ArithOp) -> Option<Form<'_>> {
    e.contains(op.token()).then_some(Form::Arith(op))
}

fn match_sub(e: &str) -> Option<Form<'_>> {
    match_arith(e, ArithOp::Sub)
}

fn match_mul(e: &str) -> Option<Form<'_>> {
    match_arith(e, ArithOp::Mul)
}

fn match_div(e: &str) -> Option<Form<'_>> {
    match_arith(e, ArithOp::Div)
}

fn match_call(e: &str) -> Option<Form<'_>> {
    let caps = CALL_RE.captures(e)?;
    let name = caps.get(1)?.as_str();
    let args = caps.get(2).map_or("", |m| m.as_str());
    Some(Form::Call { name, args })
}

/// Classify a trimmed expression.
pub fn classify(expr: &str) -> Form<'_> {
    MATCHERS.iter().find_map(|m| m(expr)).unwrap_or(Form::Opaque)
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// Evaluate an expression string.  Surrounding whitespace, byte-order mark
/// included, is ignored.
pub fn eval_str(src: &str, ctx: &mut dyn EvalContext) -> Result<Value, RuntimeError> {
    let expr = trim(src);
    match classify(expr) {
        Form::Literal(v) => Ok(v),
        Form::Array(inner) => inner
            .split(',')
            .map(|item| eval_str(item, ctx))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::from),
        Form::Ident(name) => Ok(match ctx.get_var(name) {
            Some(v) if !v.is_nullish() => v.clone(),
            _ => Value::Str(name.to_owned()),
        }),
        Form::Concat => {
            let mut joined = String::new();
            for part in expr.split(CONCAT) {
                joined.push_str(&eval_str(part, ctx)?.join_fragment());
            }
            Ok(Value::Str(joined))
        }
        Form::Arith(op) => {
            let parts = expr
                .split(op.token())
                .map(|part| eval_str(part, ctx))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(reduce(op, &parts))
        }
        Form::Call { name, args } => {
            let args = if args.is_empty() {
                Vec::new()
            } else {
                args.split(',')
                    .map(|arg| eval_str(arg, ctx))
                    .collect::<Result<Vec<_>, _>>()?
            };
            ctx.call_fn(name, args)
        }
        Form::Opaque => Ok(Value::Str(expr.to_owned())),
    }
}

fn reduce(op: ArithOp, parts: &[Value]) -> Value {
    let mut nums = parts.iter().map(Value::as_number);
    let first = nums.next().unwrap_or(f64::NAN);
    Value::Number(nums.fold(first, |acc, n| op.apply(acc, n)))
}

// ── Conditions ────────────────────────────────────────────────────────────────

/// A comparison operator in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Ge,
    Le,
    Gt,
    Lt,
    Eq,
}

/// Comparison operators in the order they are looked for.  `>=` and `<=`
/// come before `>` and `<`.
pub const CONDITION_OPS: &[(&str, CmpOp)] = &[
    (" >= ", CmpOp::Ge),
    (" <= ", CmpOp::Le),
    (" > ", CmpOp::Gt),
    (" < ", CmpOp::Lt),
    (" == ", CmpOp::Eq),
];

impl CmpOp {
    fn holds(self, left: &Value, right: &Value) -> bool {
        let (a, b) = (left.as_number(), right.as_number());
        match self {
            CmpOp::Ge => a >= b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Lt => a < b,
            CmpOp::Eq => left.loose_eq(right),
        }
    }
}

/// Evaluate an `IF` condition.
///
/// The condition is split on the first operator from [`CONDITION_OPS`] it
/// contains and only the first two pieces are compared.  Without an
/// operator the expression's truthiness decides.
pub fn eval_condition(cond: &str, ctx: &mut dyn EvalContext) -> Result<bool, RuntimeError> {
    for &(token, op) in CONDITION_OPS {
        if !cond.contains(token) {
            continue;
        }
        let mut parts = cond.split(token);
        let left = eval_str(parts.next().unwrap_or(""), ctx)?;
        let right = eval_str(parts.next().unwrap_or(""), ctx)?;
        return Ok(op.holds(&left, &right));
    }
    Ok(eval_str(cond, ctx)?.as_bool())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
