//! SUSA script interpreter.
//!
//! The [`Interpreter`] owns the variable table, the function table and the
//! output buffer for one run.  It walks the preprocessed line list with a
//! cursor; each line is classified by [`Stmt::classify`] and its handler
//! returns the index of the next line to run, so block constructs skip over
//! the lines they consumed.
//!
//! Every call to [`Interpreter::execute`] starts from empty tables.  Nothing
//! carries over between runs except the built-in seed.

use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use super::{
    builtins::{call_builtin, BUILTINS},
    error::RuntimeError,
    expr::{eval_condition, eval_str, EvalContext},
    stack::ensure_sufficient_stack,
    stmt::{preprocess, scan_block, scan_if, Stmt},
    value::Value,
};

/// Output reported when a successful run printed nothing.
pub const DEFAULT_OUTPUT: &str = "Code executed successfully!";

/// Prefix of a function-body line that ends the call.
const RETURN_PREFIX: &str = "RETURN ";

// ── ExecutionResult ───────────────────────────────────────────────────────────

/// Outcome of one [`Interpreter::execute`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Output lines joined with `\n`.
    pub output: String,
    /// `Line <n>: <message>` for the first failing top-level line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecutionResult {
    fn success(lines: &[String]) -> Self {
        let mut output = lines.join("\n");
        if output.is_empty() {
            output = DEFAULT_OUTPUT.to_owned();
        }
        ExecutionResult { success: true, output, error: None }
    }

    fn failure(lines: &[String], error: String) -> Self {
        ExecutionResult { success: false, output: lines.join("\n"), error: Some(error) }
    }
}

// ── Limits ────────────────────────────────────────────────────────────────────

/// Guards against scripts that never finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of statements dispatched per run (`None` = unlimited).
    pub max_steps: Option<u64>,
    /// Maximum nesting of block bodies and user-function calls combined.
    pub max_depth: usize,
}

impl Limits {
    pub const DEFAULT_DEPTH: usize = 10_000;
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_steps: None, max_depth: Self::DEFAULT_DEPTH }
    }
}

// ── Function table ────────────────────────────────────────────────────────────

/// An entry in the function table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    /// Raw body lines, classified only when the function runs.
    pub body: Vec<String>,
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// The SUSA line interpreter.
#[derive(Debug, Default)]
pub struct Interpreter {
    vars: HashMap<String, Value>,
    functions: HashMap<String, Rc<FunctionDef>>,
    output: Vec<String>,
    limits: Limits,
    steps: u64,
    depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// An interpreter that enforces `limits` on every run.
    pub fn with_limits(limits: Limits) -> Self {
        Interpreter { limits, ..Self::default() }
    }

    /// Output lines produced by the last run.
    pub fn output_lines(&self) -> &[String] {
        &self.output
    }

    /// A variable as it stood at the end of the last run.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// A function-table entry from the last run, built-ins included.
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name).map(Rc::as_ref)
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Run a script from scratch.
    ///
    /// Stops at the first error.  Output produced before the failing line is
    /// still returned.  The line number in the error counts only non-blank,
    /// non-comment lines.
    pub fn execute(&mut self, src: &str) -> ExecutionResult {
        let span = debug_span!("execute", bytes = src.len());
        let _enter = span.enter();

        self.reset();
        let lines = preprocess(src);
        let mut i = 0;
        while i < lines.len() {
            match self.exec_line(&lines, i) {
                Ok(next) => i = next,
                Err(e) => {
                    debug!(line = i + 1, error = %e, "execution failed");
                    return ExecutionResult::failure(&self.output, format!("Line {}: {e}", i + 1));
                }
            }
        }
        debug!(lines = lines.len(), output = self.output.len(), steps = self.steps, "execution finished");
        ExecutionResult::success(&self.output)
    }

    fn reset(&mut self) {
        self.vars.clear();
        self.functions.clear();
        for builtin in BUILTINS {
            let def = FunctionDef {
                name: builtin.name().to_owned(),
                params: builtin.params().iter().map(|p| (*p).to_owned()).collect(),
                body: Vec::new(),
            };
            self.functions.insert(def.name.clone(), Rc::new(def));
        }
        self.output.clear();
        self.steps = 0;
        self.depth = 0;
    }

    /// Count one dispatched statement against the step budget.
    fn tick(&mut self) -> Result<(), RuntimeError> {
        self.steps += 1;
        match self.limits.max_steps {
            Some(max) if self.steps > max => Err(RuntimeError::StepLimitExceeded(max)),
            _ => Ok(()),
        }
    }

    /// Execute `lines[i]` and return the index of the next line to run.
    fn exec_line(&mut self, lines: &[String], i: usize) -> Result<usize, RuntimeError> {
        self.tick()?;
        let line = lines[i].as_str();
        trace!(index = i, line, "dispatch");

        match Stmt::classify(line) {
            Stmt::Let { name, expr } | Stmt::Assign { name, expr } => {
                let value = eval_str(expr, self)?;
                self.vars.insert(name.to_owned(), value);
            }

            Stmt::Print { expr } => {
                let value = eval_str(expr, self)?;
                self.output.push(value.to_string());
            }

            Stmt::Func { name, params } => {
                let block = scan_block(lines, i + 1);
                debug!(function = name, params = params.len(), lines = block.body.len(), "define");
                let def = FunctionDef {
                    name: name.to_owned(),
                    params: params.into_iter().map(str::to_owned).collect(),
                    body: block.lines(lines).to_vec(),
                };
                self.functions.insert(def.name.clone(), Rc::new(def));
                return Ok(block.next());
            }

            Stmt::If { cond } => {
                let taken = eval_condition(cond, self)?;
                let blocks = scan_if(lines, i);
                let chosen = if taken { Some(&blocks.then_block) } else { blocks.else_block.as_ref() };
                if let Some(block) = chosen {
                    self.run_lines(block.lines(lines))?;
                }
                return Ok(blocks.next());
            }

            Stmt::Loop { var, start, count } => {
                let block = scan_block(lines, i + 1);
                if block.body.is_empty() {
                    // Nothing to run; only the final binding is observable.
                    if count >= 1.0 {
                        self.vars.insert(var.to_owned(), Value::Number(start + count - 1.0));
                    }
                    return Ok(block.next());
                }
                let mut n = start;
                while n < start + count {
                    self.vars.insert(var.to_owned(), Value::Number(n));
                    self.run_lines(block.lines(lines))?;
                    n += 1.0;
                }
                return Ok(block.next());
            }

            Stmt::ForIn { var, list } => {
                let block = scan_block(lines, i + 1);
                // A non-array source skips the loop without an error.
                if let Some(Value::Array(items)) = self.vars.get(list).cloned() {
                    for item in items.iter() {
                        self.vars.insert(var.to_owned(), item.clone());
                        self.run_lines(block.lines(lines))?;
                    }
                }
                return Ok(block.next());
            }

            Stmt::Call { expr } => {
                eval_str(expr, self)?;
            }

            Stmt::Marker | Stmt::Nop => {}
        }
        Ok(i + 1)
    }

    /// Execute a block body as a nested line list.
    fn run_lines(&mut self, lines: &[String]) -> Result<(), RuntimeError> {
        self.nested(|this| {
            let mut i = 0;
            while i < lines.len() {
                i = this.exec_line(lines, i)?;
            }
            Ok(())
        })
    }

    /// Run `f` one level deeper.  Block bodies and user calls share this
    /// guard, and the native stack is grown as needed.
    fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, RuntimeError>,
    ) -> Result<R, RuntimeError> {
        if self.depth >= self.limits.max_depth {
            return Err(RuntimeError::DepthExceeded);
        }
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Execute a function body.  A top-level `RETURN expr` line ends the
    /// call with that value; falling off the end returns `null`.
    fn run_body(&mut self, body: &[String]) -> Result<Value, RuntimeError> {
        let mut i = 0;
        while i < body.len() {
            if let Some(expr) = body[i].strip_prefix(RETURN_PREFIX) {
                self.tick()?;
                return eval_str(expr, self);
            }
            i = self.exec_line(body, i)?;
        }
        Ok(Value::Null)
    }

    /// Call a user-defined function with full rollback: the variable table
    /// is restored to its pre-call state afterwards, so only the return
    /// value escapes.
    fn call_user(&mut self, func: &FunctionDef, args: Vec<Value>) -> Result<Value, RuntimeError> {
        debug!(function = %func.name, args = args.len(), depth = self.depth, "call");

        let saved = self.vars.clone();
        let mut args = args.into_iter();
        for param in &func.params {
            self.vars.insert(param.clone(), args.next().unwrap_or(Value::Undefined));
        }

        let result = self.nested(|this| this.run_body(&func.body));
        self.vars = saved;
        result
    }
}

// ── EvalContext impl ──────────────────────────────────────────────────────────

impl EvalContext for Interpreter {
    fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    fn call_fn(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        if let Some(ret) = call_builtin(name, &args, &mut self.output) {
            return Ok(ret);
        }
        let func = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownFunction(name.to_owned()))?;
        self.call_user(&func, args)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
