//! Runtime value type for the SUSA scripting language.
//!
//! SUSA is dynamically typed.  Values are coerced freely between strings,
//! numbers and booleans with JavaScript's loose conversion rules: `String(v)`
//! for display, `Number(v)` for arithmetic, truthiness for conditions and
//! `==` for equality.

use std::fmt;
use std::rc::Rc;

/// A SUSA runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// A parameter that was not supplied by the caller.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    /// Shared by reference: copying a binding aliases the same array.
    Array(Rc<Vec<Value>>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Str(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(&item.join_fragment())?;
                }
                Ok(())
            }
        }
    }
}

impl Value {
    /// `true` for `null` and `undefined`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Coerce to boolean: `undefined`, `null`, `false`, `0`, `NaN` and `""`
    /// are falsy.  Arrays are always truthy.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) => true,
        }
    }

    /// Numeric cast.  Unparseable text yields `NaN` rather than an error.
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::Str(s) => parse_numeric(s),
            Value::Array(_) => parse_numeric(&self.to_string()),
        }
    }

    /// Text this value contributes to a `+` concatenation.  Same as the
    /// display form except that `null` and `undefined` contribute nothing.
    pub fn join_fragment(&self) -> String {
        if self.is_nullish() {
            String::new()
        } else {
            self.to_string()
        }
    }

    /// Loose (`==`) equality.  Two arrays are equal only when they are the
    /// same array.
    pub fn loose_eq(&self, rhs: &Value) -> bool {
        match (self, rhs) {
            (Value::Undefined | Value::Null, other) | (other, Value::Undefined | Value::Null) => {
                other.is_nullish()
            }
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Number(n), Value::Str(_)) | (Value::Str(_), Value::Number(n)) => {
                let other = if matches!(self, Value::Number(_)) { rhs } else { self };
                *n == other.as_number()
            }
            (Value::Bool(b), other) | (other, Value::Bool(b)) => {
                Value::Number(f64::from(u8::from(*b))).loose_eq(other)
            }
            (Value::Array(_), prim) | (prim, Value::Array(_)) => {
                let arr = if matches!(self, Value::Array(_)) { self } else { rhs };
                Value::Str(arr.to_string()).loose_eq(prim)
            }
        }
    }
}

/// Render a number the way the output panel expects: integral values have no
/// fractional part, non-finite values use their long names.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_owned()
    } else if n == 0.0 {
        // Covers -0 as well.
        "0".to_owned()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Exponent form, with an explicit sign on positive exponents.
        let s = format!("{n:e}");
        match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        }
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

/// Strip leading and trailing whitespace.  A byte-order mark counts as
/// whitespace.
pub fn trim(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Parse text as a number.  Surrounding whitespace is ignored, empty text is
/// zero, and anything that is not a complete numeric literal is `NaN`.
fn parse_numeric(s: &str) -> f64 {
    let t = trim(s);
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    let radix = match t.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&t[2..], radix).map_or(f64::NAN, |n| n as f64);
    }
    // Rust's float parser also accepts "inf" and "nan"; reject anything that
    // is not made of digits, signs, dots and exponents.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
