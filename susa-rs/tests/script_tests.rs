/// Behavioural tests for the SUSA interpreter and feature detector, driven
/// through the public library API only.
///
/// Each script is a multi-line string; results are compared as whole
/// `ExecutionResult`s so a failure shows output and error side by side.
use pretty_assertions::assert_eq;

use susa::script::{Limits, DEFAULT_OUTPUT};
use susa::{
    detect_features, execute, recommended_interpreter, Backend, ExecutionResult, FeatureFlags,
    Interpreter, Value,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ok(output: &str) -> ExecutionResult {
    ExecutionResult { success: true, output: output.to_owned(), error: None }
}

fn failed(output: &str, error: &str) -> ExecutionResult {
    ExecutionResult { success: false, output: output.to_owned(), error: Some(error.to_owned()) }
}

// ── Output and default message ────────────────────────────────────────────────

#[test]
fn silent_script_reports_default_message() {
    assert_eq!(execute("let x = 5\nlet y = x - 1\n# nothing printed"), ok(DEFAULT_OUTPUT));
    assert_eq!(execute(""), ok(DEFAULT_OUTPUT));
    assert_eq!(execute("\n\n   \n# only comments\n"), ok(DEFAULT_OUTPUT));
}

#[test]
fn empty_prints_report_default_message() {
    assert_eq!(execute("PRINT \"\""), ok(DEFAULT_OUTPUT));
    assert_eq!(execute("PRINT()"), ok(DEFAULT_OUTPUT));
    assert_eq!(execute("PRINT(null)"), ok(DEFAULT_OUTPUT));
    assert_eq!(execute("PRINT \"\"\nPRINT \"\""), ok("\n"));
}

#[test]
fn leading_byte_order_mark_is_ignored() {
    assert_eq!(execute("\u{feff}PRINT 1"), ok("1"));
    assert_eq!(execute("\u{feff}# comment\nPRINT \u{feff}2"), ok("2"));
}

#[test]
fn let_then_print() {
    assert_eq!(execute("let x = 5\nPRINT x"), ok("5"));
}

#[test]
fn string_concatenation() {
    assert_eq!(execute(r#"PRINT "a" + "b""#), ok("ab"));
}

#[test]
fn plus_concatenates_numbers() {
    assert_eq!(execute("PRINT 2 + 3"), ok("23"));
}

#[test]
fn minus_subtracts() {
    assert_eq!(execute("PRINT 6 - 2"), ok("4"));
}

#[test]
fn multiply_and_divide() {
    let src = "PRINT 6 * 7\nPRINT 7 / 2\nPRINT 1 / 0\nPRINT \"a\" * 2";
    assert_eq!(execute(src), ok("42\n3.5\nInfinity\nNaN"));
}

#[test]
fn unset_identifier_prints_its_own_name() {
    assert_eq!(execute("PRINT nobody"), ok("nobody"));
}

#[test]
fn comments_and_indentation() {
    let src = "  # header\n\n    let greeting = \"hello\"\n\tPRINT greeting   \n";
    assert_eq!(execute(src), ok("hello"));
}

// ── Functions ─────────────────────────────────────────────────────────────────

#[test]
fn function_return_concatenates() {
    let src = "\
FUNC add(a, b):
START:
RETURN a + b
END:
PRINT add(2, 3)";
    assert_eq!(execute(src), ok("23"));
}

#[test]
fn function_subtract() {
    let src = "\
FUNC sub(a, b):
START:
RETURN a - b
END:
let r = sub(10, 4)
PRINT r";
    assert_eq!(execute(src), ok("6"));
}

#[test]
fn unknown_function_fails_with_line_number() {
    assert_eq!(
        execute("PRINT \"start\"\nlet a = 1\nundefinedFn()"),
        failed("start", "Line 3: Unknown function: undefinedFn")
    );
}

#[test]
fn error_line_ignores_blank_and_comment_lines() {
    let src = "# comment\n\nPRINT 1\n\n# another\nundefinedFn()";
    assert_eq!(execute(src), failed("1", "Line 2: Unknown function: undefinedFn"));
}

#[test]
fn failure_before_output_has_empty_output() {
    assert_eq!(execute("oops()"), failed("", "Line 1: Unknown function: oops"));
}

#[test]
fn parameter_mutation_does_not_leak() {
    let src = "\
let x = 1
FUNC bump(x):
START:
x = x - 100
RETURN x
END:
PRINT bump(5)
PRINT x";
    assert_eq!(execute(src), ok("-95\n1"));
}

#[test]
fn body_assignments_are_rolled_back() {
    let src = "\
let count = 3
FUNC reset():
START:
count = 0
let scratch = 1
END:
reset()
PRINT count
PRINT scratch";
    assert_eq!(execute(src), ok("3\nscratch"));
}

#[test]
fn function_prints_survive_rollback() {
    let src = "\
FUNC hello(name):
START:
PRINT \"hello \" + name
END:
hello(\"ada\")
hello(\"bob\")";
    assert_eq!(execute(src), ok("hello ada\nhello bob"));
}

#[test]
fn runaway_recursion_is_an_error() {
    let src = "\
FUNC forever(n):
START:
forever(n)
END:
forever(1)";
    let result = Interpreter::with_limits(Limits { max_steps: None, max_depth: 16 }).execute(src);
    assert_eq!(result, failed("", "Line 5: Maximum call stack size exceeded"));
}

#[test]
fn deep_recursion_fails_under_default_limits() {
    let src = "\
FUNC f(n):
START:
let m = n - 1
f(m)
END:
f(100000)";
    assert_eq!(execute(src), failed("", "Line 6: Maximum call stack size exceeded"));
}

fn nested_ifs(levels: usize) -> String {
    let mut src = "IF 1 > 0:\nSTART:\n".repeat(levels);
    src.push_str("PRINT \"deep\"\n");
    src.push_str(&"END:\n".repeat(levels));
    src
}

#[test]
fn thousand_nested_ifs_run_under_default_limits() {
    assert_eq!(execute(&nested_ifs(1000)), ok("deep"));
}

#[test]
fn nesting_past_the_depth_limit_is_an_error() {
    let result = Interpreter::with_limits(Limits { max_steps: None, max_depth: 64 })
        .execute(&nested_ifs(65));
    assert_eq!(result, failed("", "Line 1: Maximum call stack size exceeded"));
}

// ── Control flow ──────────────────────────────────────────────────────────────

#[test]
fn counted_loop() {
    let src = "\
LOOP i = 0 FOR 3 TIMES:
START:
PRINT i
END:";
    assert_eq!(execute(src), ok("0\n1\n2"));
}

#[test]
fn counted_loop_with_offset_start() {
    let src = "\
LOOP n = 5 FOR 2 TIMES:
START:
PRINT \"n=\" + n
END:
PRINT n";
    assert_eq!(execute(src), ok("n=5\nn=6\n6"));
}

#[test]
fn for_in_iterates_array() {
    let src = "\
let fruits = [\"apple\", \"pear\"]
FOR f IN fruits:
START:
PRINT f
END:";
    assert_eq!(execute(src), ok("apple\npear"));
}

#[test]
fn for_in_non_array_skips_block() {
    let src = "\
let n = 5
FOR x IN n:
START:
PRINT x
END:
PRINT \"done\"";
    assert_eq!(execute(src), ok("done"));
}

#[test]
fn if_else_selects_one_branch() {
    let src = "\
let score = 40
IF score >= 50:
START:
PRINT \"pass\"
END:
ELSE:
START:
PRINT \"fail\"
END:
PRINT \"end\"";
    assert_eq!(execute(src), ok("fail\nend"));
}

#[test]
fn if_equality_is_loose() {
    let src = "\
let s = \"5\"
IF s == 5:
START:
PRINT \"equal\"
END:";
    assert_eq!(execute(src), ok("equal"));
}

#[test]
fn distinct_arrays_are_not_equal() {
    let src = "\
let a = [1]
let b = [1]
let c = a
IF a == b:
START:
PRINT \"eq\"
END:
ELSE:
START:
PRINT \"ne\"
END:
IF a == c:
START:
PRINT \"same\"
END:";
    assert_eq!(execute(src), ok("ne\nsame"));
}

#[test]
fn bare_condition_uses_truthiness() {
    let src = "\
let empty = \"\"
IF empty:
START:
PRINT \"unreachable\"
END:
ELSE:
START:
PRINT \"falsy\"
END:";
    assert_eq!(execute(src), ok("falsy"));
}

#[test]
fn nested_blocks() {
    let src = "\
FUNC classify(n):
START:
IF n > 1:
START:
RETURN \"many\"
END:
RETURN \"few\"
END:
LOOP k = 1 FOR 2 TIMES:
START:
PRINT classify(k)
END:";
    // RETURN inside the IF body is not a top-level body line.
    assert_eq!(execute(src), ok("few\nfew"));
}

// ── Isolation ─────────────────────────────────────────────────────────────────

#[test]
fn repeated_runs_are_identical() {
    let src = "\
let total = 0
LOOP i = 1 FOR 3 TIMES:
START:
total = total - i
END:
PRINT total
missing()";
    let mut interp = Interpreter::new();
    let first = interp.execute(src);
    let second = interp.execute(src);
    assert_eq!(first, second);
    assert_eq!(first, failed("-6", "Line 7: Unknown function: missing"));
}

#[test]
fn state_does_not_carry_between_runs() {
    let mut interp = Interpreter::new();
    interp.execute("let kept = 1\nFUNC f():\nSTART:\nRETURN 1\nEND:");
    assert_eq!(interp.variable("kept"), Some(&Value::Number(1.0)));

    let result = interp.execute("PRINT kept\nf()");
    assert_eq!(result, failed("kept", "Line 2: Unknown function: f"));
    assert!(interp.function("PRINT").is_some());
}

#[test]
fn step_limit_stops_infinite_work() {
    let src = "\
LOOP i = 0 FOR 1000000 TIMES:
START:
let x = i
END:";
    let result = Interpreter::with_limits(Limits { max_steps: Some(100), ..Limits::default() })
        .execute(src);
    assert_eq!(result, failed("", "Line 1: Step limit of 100 exceeded"));
}

// ── Feature detector ──────────────────────────────────────────────────────────

#[test]
fn typed_declaration_sets_only_its_flag() {
    assert_eq!(
        detect_features("int x = 5"),
        FeatureFlags {
            has_type_declarations: true,
            has_advanced_features: true,
            ..FeatureFlags::default()
        }
    );
}

#[test]
fn simple_code_recommends_cpp() {
    let rec = recommended_interpreter("let x = 5");
    assert_eq!(rec.interpreter, Backend::Cpp);
    assert_eq!(rec.reason, "Simple code, using C++ for performance");
    assert_eq!(rec.features, FeatureFlags::default());
}

#[test]
fn advanced_code_recommends_python() {
    let rec = recommended_interpreter("PRINT rt\"hi {name}\"");
    assert_eq!(rec.interpreter, Backend::Python);
    assert_eq!(rec.reason, "Code uses advanced features");
    assert!(rec.features.has_string_interpolation);
}

#[test]
fn detector_does_not_affect_execution() {
    // The typed declaration falls through to plain assignment of `x`.
    let src = "int x = 5\nPRINT x";
    assert!(detect_features(src).has_advanced_features);
    assert_eq!(execute(src), ok("5"));
}
