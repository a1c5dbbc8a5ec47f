//! SUSA line classification and block scanning.
//!
//! A SUSA script is a flat list of lines.  There is no AST: each line is
//! classified on its own when the interpreter reaches it, and multi-line
//! constructs (`FUNC`, `IF`/`ELSE`, `LOOP`, `FOR`) pull their bodies out of
//! the following lines with [`scan_block`].  Bodies are kept as raw lines and
//! only classified when they are executed.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::value::trim;

/// Block opener.
pub const START: &str = "START:";
/// Block closer.
pub const END: &str = "END:";
/// Separates the IF body from the ELSE body.
pub const ELSE: &str = "ELSE:";

static LET_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"let\s+([A-Za-z0-9_]+)\s*=\s*(.+)"));
static FUNC_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"FUNC\s+([A-Za-z0-9_]+)\s*\(([^)]*)\):"));
static IF_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"IF\s+(.+):"));
static LOOP_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"LOOP\s+([A-Za-z0-9_]+)\s*=\s*([0-9]+)\s+FOR\s+([0-9]+)\s+TIMES:")
});
static FOR_IN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"FOR\s+([A-Za-z0-9_]+)\s+IN\s+([A-Za-z0-9_]+):"));
static ASSIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"([A-Za-z0-9_]+)\s*=\s*(.+)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid statement pattern {pattern:?}: {e}"))
}

/// One classified source line.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt<'a> {
    /// `let name = expr`
    Let { name: &'a str, expr: &'a str },
    /// `PRINT expr`
    Print { expr: &'a str },
    /// `FUNC name(a, b):`, followed by its body block.
    Func { name: &'a str, params: Vec<&'a str> },
    /// `IF cond:`, then a block and an optional `ELSE:` block.
    If { cond: &'a str },
    /// `LOOP var = start FOR count TIMES:`
    Loop { var: &'a str, start: f64, count: f64 },
    /// `FOR var IN list:`
    ForIn { var: &'a str, list: &'a str },
    /// `name = expr` without `let`.
    Assign { name: &'a str, expr: &'a str },
    /// A bare call such as `greet("bob")`, evaluated for its side effects.
    Call { expr: &'a str },
    /// `START:`, `END:` or `ELSE:` reached outside a block scan.
    Marker,
    /// Anything else, including headers whose pattern does not match.
    Nop,
}

impl<'a> Stmt<'a> {
    /// Classify a trimmed line.  Checks run in a fixed order and the first
    /// one that applies wins.
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with("let ") {
            return LET_RE.captures(line).map_or(Stmt::Nop, |c| Stmt::Let {
                name: group(&c, 1),
                expr: group(&c, 2),
            });
        }
        if let Some(expr) = line.strip_prefix("PRINT ") {
            return Stmt::Print { expr: trim(expr) };
        }
        if line.starts_with("FUNC ") {
            return FUNC_RE.captures(line).map_or(Stmt::Nop, |c| Stmt::Func {
                name: group(&c, 1),
                params: group(&c, 2)
                    .split(',')
                    .map(trim)
                    .filter(|p| !p.is_empty())
                    .collect(),
            });
        }
        if line.starts_with("IF ") {
            return IF_RE
                .captures(line)
                .map_or(Stmt::Nop, |c| Stmt::If { cond: group(&c, 1) });
        }
        if line.starts_with("FOR ") || line.starts_with("LOOP ") {
            return classify_loop(line);
        }
        if line.contains('=') {
            return ASSIGN_RE.captures(line).map_or(Stmt::Nop, |c| Stmt::Assign {
                name: group(&c, 1),
                expr: group(&c, 2),
            });
        }
        if line.contains('(') && line.contains(')') {
            return Stmt::Call { expr: line };
        }
        if matches!(line, START | END | ELSE) {
            return Stmt::Marker;
        }
        Stmt::Nop
    }
}

fn classify_loop(line: &str) -> Stmt<'_> {
    if let Some(c) = LOOP_RE.captures(line) {
        // The pattern only admits digit runs, which always parse as f64.
        let start = group(&c, 2).parse().unwrap_or(0.0);
        let count = group(&c, 3).parse().unwrap_or(0.0);
        return Stmt::Loop { var: group(&c, 1), start, count };
    }
    if let Some(c) = FOR_IN_RE.captures(line) {
        return Stmt::ForIn { var: group(&c, 1), list: group(&c, 2) };
    }
    Stmt::Nop
}

fn group<'a>(caps: &regex::Captures<'a>, i: usize) -> &'a str {
    caps.get(i).map_or("", |m| m.as_str())
}

// ── Source preprocessing ──────────────────────────────────────────────────────

/// Split source into trimmed lines, dropping blank lines and `#` comments.
/// A byte-order mark counts as whitespace.
///
/// Line numbers in error messages index into this filtered list, not into
/// the raw source text.
pub fn preprocess(src: &str) -> Vec<String> {
    src.split('\n')
        .map(trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

// ── Block scanning ────────────────────────────────────────────────────────────

/// A `START:`/`END:` delimited body within a line list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Indices of the lines strictly inside the outermost `START:`/`END:`
    /// pair.  Nested markers stay in range as ordinary lines.
    pub body: Range<usize>,
    /// Index of the closing `END:`, or the list length if the block never
    /// closes.
    pub end: usize,
}

impl Block {
    /// Index of the first line after the block.
    pub fn next(&self) -> usize {
        self.end + 1
    }

    /// The body lines out of the list this block was scanned from.
    pub fn lines<'a>(&self, lines: &'a [String]) -> &'a [String] {
        &lines[self.body.clone()]
    }
}

/// Scan forward from `from` for a `START:` … `END:` block.
///
/// Lines seen before the first `START:` are skipped, stray `END:` lines
/// included.  Depth rises on every `START:` and falls on every `END:`; the
/// block closes when depth returns to zero.
pub fn scan_block(lines: &[String], from: usize) -> Block {
    let mut depth = 0usize;
    let mut first = None;

    for (i, line) in lines.iter().enumerate().skip(from) {
        match (line.as_str(), first) {
            (START, _) => {
                first.get_or_insert(i + 1);
                depth += 1;
            }
            (END, Some(first)) => {
                depth -= 1;
                if depth == 0 {
                    return Block { body: first..i, end: i };
                }
            }
            _ => {}
        }
    }

    let first = first.unwrap_or(lines.len());
    Block { body: first..lines.len(), end: lines.len() }
}

/// The bodies of an `IF` header at `header` and its optional `ELSE` branch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IfBlocks {
    pub then_block: Block,
    pub else_block: Option<Block>,
}

impl IfBlocks {
    /// Index of the first line after the whole construct.
    pub fn next(&self) -> usize {
        self.else_block.as_ref().unwrap_or(&self.then_block).next()
    }
}

/// Scan the `IF` body after `header`, then peek at the line right after its
/// `END:`; if it starts with `ELSE:`, scan the else body too.
pub fn scan_if(lines: &[String], header: usize) -> IfBlocks {
    let then_block = scan_block(lines, header + 1);
    let else_block = lines
        .get(then_block.next())
        .filter(|l| l.starts_with(ELSE))
        .map(|_| scan_block(lines, then_block.next()));
    IfBlocks { then_block, else_block }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
