//! Feature detection and backend recommendation.
//!
//! Scans raw SUSA source for constructs the line interpreter does not
//! understand (interpolated strings, typed declarations, embedded-language
//! blocks) and recommends which backend should run the script.  The result
//! is advisory only; [`crate::script::Interpreter`] never consults it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// Word boundaries and case folding are ASCII-only so that a non-ASCII
// letter never joins or alters a keyword.
static INTERPOLATION_RE: LazyLock<Regex> = LazyLock::new(|| compile(r#"rt["']"#));
static TYPE_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?-u:\b)(int|string|bool|float|double|char)\s+[A-Za-z0-9_]+\s*=")
});
static USE_PYTHON_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i-u:USE)\s+(?i-u:PYTHON):"));
static USE_C_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i-u:USE)\s+(?i-u:C):"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid feature pattern {pattern:?}: {e}"))
}

// ── FeatureFlags ──────────────────────────────────────────────────────────────

/// Which advanced constructs appear anywhere in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// `rt"…"` or `rt'…'`.
    pub has_string_interpolation: bool,
    /// `int x = …` and friends.
    pub has_type_declarations: bool,
    /// A `USE PYTHON:` block (any case).
    pub has_use_python: bool,
    /// A `USE C:` block (any case).
    pub has_use_c: bool,
    /// Set whenever any of the flags above is.
    pub has_advanced_features: bool,
}

/// Classify `code`.  Checks run over the whole text, not line by line.
pub fn detect_features(code: &str) -> FeatureFlags {
    let has_string_interpolation = INTERPOLATION_RE.is_match(code);
    let has_type_declarations = TYPE_DECL_RE.is_match(code);
    let has_use_python = USE_PYTHON_RE.is_match(code);
    let has_use_c = USE_C_RE.is_match(code);
    FeatureFlags {
        has_string_interpolation,
        has_type_declarations,
        has_use_python,
        has_use_c,
        has_advanced_features: has_string_interpolation
            || has_type_declarations
            || has_use_python
            || has_use_c,
    }
}

/// `true` if `code` needs the full interpreter.
pub fn should_use_python_interpreter(code: &str) -> bool {
    detect_features(code).has_advanced_features
}

// ── Recommendation ────────────────────────────────────────────────────────────

/// A runtime that can execute SUSA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Full interpreter with every language feature.
    Python,
    /// Lightweight fast path for simple scripts.
    Cpp,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Python => "python",
            Backend::Cpp => "cpp",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The backend suggested for a script, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub interpreter: Backend,
    pub reason: &'static str,
    pub features: FeatureFlags,
}

pub const ADVANCED_REASON: &str = "Code uses advanced features";
pub const SIMPLE_REASON: &str = "Simple code, using C++ for performance";

/// Recommend a backend for `code`.  Empty or malformed input gets the
/// default fast-path recommendation.
pub fn recommended_interpreter(code: &str) -> Recommendation {
    let features = detect_features(code);
    let (interpreter, reason) = if features.has_advanced_features {
        (Backend::Python, ADVANCED_REASON)
    } else {
        (Backend::Cpp, SIMPLE_REASON)
    };
    Recommendation { interpreter, reason, features }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
