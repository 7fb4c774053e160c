use std::{collections::HashMap, fs};

use bloq::{
    console::BufferConsole,
    interpreter::{
        parser::group::TokenGroup,
        runner::GroupResults,
        value::ValueType,
    },
    parse, run_source,
};
use walkdir::WalkDir;

fn run_script(src: &str) -> (GroupResults, String) {
    let mut console = BufferConsole::new();
    let results = run_source(src, &HashMap::new(), &mut console);
    (results, console.contents().to_string())
}

fn assert_variable(src: &str, name: &str, expected: &str) {
    let (results, console) = run_script(src);
    let value = results.variables
                       .get(name)
                       .unwrap_or_else(|| panic!("variable '{name}' not bound by:\n{src}\nconsole: {console}"));
    assert_eq!(value.to_text(), expected, "script:\n{src}");
}

fn assert_unbound(src: &str, name: &str) {
    let (results, _) = run_script(src);
    assert!(!results.variables.contains_key(name),
            "variable '{name}' should not be bound by:\n{src}");
}

fn assert_printed(src: &str, expected: &str) {
    let (_, console) = run_script(src);
    assert_eq!(console, expected, "script:\n{src}");
}

#[test]
fn demo_scripts_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "bq"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let (results, console) = run_script(&source);
        assert!(!results.variables.is_empty() || !console.is_empty(),
                "demo {path:?} produced nothing");
        assert!(!console.contains("Error on line"),
                "demo {path:?} reported a runtime error:\n{console}");
    }

    assert!(count > 0, "No demo scripts found in demos/");
}

#[test]
fn assignment_and_basic_arithmetic() {
    assert_variable("x = 1 + 2", "x", "3");
    assert_variable("x = 7 * 9", "x", "63");
    assert_variable("x = 8 - 5", "x", "3");
    assert_variable("x = 10 / 2", "x", "5");
    assert_variable("x = 10 % 3", "x", "1");
    assert_variable("x = 10 mod 3", "x", "1");
}

#[test]
fn operator_precedence() {
    assert_variable("x = 2 + 3 * 4", "x", "14");
    assert_variable("x = (2 + 3) * 4", "x", "20");
    assert_variable("x = 2 + 3 * 4 ^ 2", "x", "50");
    assert_variable("x = 10 - 4 - 3", "x", "3");
    assert_variable("x = 2 * 3 + 4 * 5", "x", "26");
}

#[test]
fn unary_minus_is_distinguished_from_subtraction() {
    assert_variable("x = -3 + 5", "x", "2");
    assert_variable("x = 3 - 5", "x", "-2");
    assert_variable("x = 3 - -5", "x", "8");
    assert_variable("x = 3 + -5", "x", "-2");
    assert_variable("x = -(2 + 3)", "x", "-5");
    assert_variable("x = 2 ^ -2", "x", "0.25");
}

#[test]
fn division_rounds_to_the_documented_context() {
    assert_variable("x = 1 / 3", "x", "0.33333333333333");
    assert_variable("x = 2 / 3", "x", "0.66666666666667");
    assert_variable("x = 1 / 8", "x", "0.125");
}

#[test]
fn division_by_zero_yields_the_false_sentinel() {
    // An unrepresentable quotient signals failure with `false`, not with
    // an error; this compatibility behavior is part of the contract.
    assert_variable("x = 1 / 0", "x", "false");

    let (results, _) = run_script("x = 1 / 0");
    assert_eq!(results.variables["x"], ValueType::Boolean(false));
}

#[test]
fn comparisons_and_boolean_logic() {
    assert_variable("x = 2 < 3", "x", "true");
    assert_variable("x = 3 <= 3", "x", "true");
    assert_variable("x = 2 > 3", "x", "false");
    assert_variable("x = 3 >= 4", "x", "false");
    assert_variable("x = 2 == 2", "x", "true");
    assert_variable("x = 2 != 2", "x", "false");
    assert_variable("x = true && false", "x", "false");
    assert_variable("x = true || false", "x", "true");
    assert_variable("x = 1 < 2 && 3 < 4", "x", "true");
    assert_variable("x = 1 < 2 || 5 < 3", "x", "true");
}

#[test]
fn booleans_participate_in_arithmetic() {
    assert_variable("x = true + true", "x", "2");
    assert_variable("x = true * 5", "x", "5");
}

#[test]
fn builtin_functions() {
    assert_variable("x = 5!", "x", "120");
    assert_variable("x = 3! + 2", "x", "8");
    assert_variable("x = √16", "x", "4");
    assert_variable("x = sqrt 16", "x", "4");
    assert_variable("x = 2 ** 10", "x", "1024");
    assert_variable("x = sin 0", "x", "0");
    assert_variable("x = cos 0", "x", "1");
    assert_variable("x = sin(π / 2)", "x", "1");
    assert_variable("x = ln 1", "x", "0");
    assert_variable("x = lg 100", "x", "2");
    assert_variable("x = int 2.7", "x", "2");
    assert_variable("x = int (0 - 2.3)", "x", "-3");
    assert_variable("x = abs -5", "x", "5");
    assert_variable("x = abs 5", "x", "5");
}

#[test]
fn non_integer_power_uses_the_significant_digit_context() {
    assert_variable("x = 2 ** 0.5", "x", "1.4142135623731");
}

#[test]
fn rand_yields_a_decimal_in_unit_range() {
    let (results, _) = run_script("x = rand");
    let value = results.variables["x"].to_f64();
    assert!((0.0..1.0).contains(&value), "rand produced {value}");

    // Zero-argument operators also compose with ordinary arithmetic.
    let (results, _) = run_script("x = rand * 10 + 1");
    let value = results.variables["x"].to_f64();
    assert!((1.0..11.0).contains(&value), "rand expression produced {value}");
}

#[test]
fn string_literals_and_concatenation() {
    assert_variable("s = \"ab\" + \"cd\"", "s", "abcd");
    assert_variable("s = \"v=\" + 5", "s", "v=5");
    assert_variable("s = 1 + 2 + \"!\"", "s", "3!");
    assert_variable("x = \"ab\" == \"ab\"", "x", "true");
    assert_variable("x = \"ab\" == \"cd\"", "x", "false");
    assert_variable("x = \"ab\" != \"cd\"", "x", "true");
}

#[test]
fn decimal_rendering_strips_trailing_zeros() {
    assert_variable("x = 1.2300", "x", "1.23");
    assert_variable("x = 0.5 + 0.5", "x", "1");
    assert_variable("x = 100", "x", "100");
}

#[test]
fn comments_and_end_of_program_marker() {
    assert_variable("x = 1 // trailing comment", "x", "1");
    assert_variable("// full line comment\nx = 2", "x", "2");
    assert_variable("x = 1\nP.S. everything after this is prose\nx = 2", "x", "1");
    assert_unbound("x = 1\nP.S.\ny = 2", "y");
}

#[test]
fn formulas_continue_after_a_trailing_binary_operator() {
    assert_variable("x = 1 +\n2", "x", "3");
    assert_variable("x = 1 + 2 *\n3 -\n1", "x", "6");
}

#[test]
fn conditionals_choose_exactly_one_branch() {
    assert_variable("if (1 < 2) { x = 1 } else { x = 2 }", "x", "1");
    assert_variable("if (1 > 2) { x = 1 } else { x = 2 }", "x", "2");
    assert_variable("if (1 > 2) { x = 1 }\ny = 3", "y", "3");
    assert_unbound("if (1 > 2) { x = 1 }", "x");
}

#[test]
fn conditionals_support_single_statement_branches() {
    assert_variable("if (1 < 2) x = 1 else x = 2", "x", "1");
    assert_variable("if (1 > 2) x = 1 else x = 2", "x", "2");
}

#[test]
fn else_if_chains() {
    let src = "\
v = 2
if (v == 1) { x = 10 } else if (v == 2) { x = 20 } else { x = 30 }";
    assert_variable(src, "x", "20");
}

#[test]
fn a_non_numeric_condition_is_a_silent_no_op() {
    assert_unbound("if (\"abc\") { x = 1 } else { x = 2 }", "x");
}

#[test]
fn for_loops_accumulate() {
    assert_variable("sum = 0\nfor (i from 1 to 5) { sum = sum + i }", "sum", "15");
    assert_variable("sum = 0\nfor (i from 1 to 5 step 2) { sum = sum + i }", "sum", "9");
    assert_variable("last = 0\nfor (i from 5 to 1) { last = i }", "last", "1");
    assert_variable("sum = 0\nfor i from 1 to 3 { sum = sum + i }", "sum", "6");
}

#[test]
fn for_loop_bounds_are_evaluated_once() {
    let src = "\
n = 3
sum = 0
for (i from 1 to n) {
    n = 100
    sum = sum + i
}";
    assert_variable(src, "sum", "6");
}

#[test]
fn while_loops_stop_on_break_keeping_state_at_break() {
    let src = "\
x = 0
while (x < 100) {
    x = x + 1
    if (x == 5) {
        break
    }
}";
    assert_variable(src, "x", "5");
}

#[test]
fn continue_skips_the_rest_of_the_iteration() {
    let src = "\
sum = 0
for (i from 1 to 5) {
    if (i % 2 == 0) {
        continue
    }
    sum = sum + i
}";
    assert_variable(src, "sum", "9");
}

#[test]
fn return_short_circuits_every_enclosing_block() {
    let src = "\
x = 0
for (i from 1 to 10) {
    if (i == 3) {
        return
    }
    x = i
}
y = 1";
    let (results, _) = run_script(src);
    assert!(results.should_return);
    assert_eq!(results.variables["x"].to_text(), "2");
    assert!(!results.variables.contains_key("y"));
}

#[test]
fn return_does_not_evaluate_its_expression() {
    // Control flags take absolute precedence; `return x + 1` neither
    // computes nor prints anything.
    let (results, console) = run_script("x = 1\nreturn print x + 1");
    assert!(results.should_return);
    assert_eq!(console, "");
}

#[test]
fn while_loops_propagate_return() {
    let src = "\
x = 0
while (x < 10) {
    x = x + 1
    if (x == 4) {
        return
    }
}";
    let (results, _) = run_script(src);
    assert!(results.should_return);
    // A returning block yields only what the returning statement itself
    // produced, so the binding seen upstream is the previous iteration's.
    assert_eq!(results.variables["x"].to_text(), "3");
}

#[test]
fn print_and_println_write_in_order() {
    assert_printed("print 1\nprint 2\nprint 3", "123");
    assert_printed("x = 5\nprintln x", "5\n");
    assert_printed("println \"a\"\nprintln \"b\"", "a\nb\n");
    assert_printed("print \"total: \"\nprintln 2 + 3", "total: 5\n");
}

#[test]
fn malformed_input_evaluates_to_undefined_without_panicking() {
    assert_variable("x = 2 +", "x", "undefined");
    assert_variable("x = (2 + 3", "x", "undefined");
    assert_variable("x = 2 + 3)", "x", "undefined");
    assert_variable("x = )", "x", "undefined");
    assert_variable("x = 1 = 2\ny = 3", "y", "3");
}

#[test]
fn a_malformed_line_contributes_no_tokens() {
    assert_unbound("x = 2 $ 3", "x");
    assert_unbound("x = 2abc", "x");
    // The surrounding lines still run.
    assert_variable("x = 2abc\ny = 4", "y", "4");
}

#[test]
fn unknown_variables_report_to_the_console_and_continue() {
    let (results, console) = run_script("y = x\nz = 2");
    assert_eq!(results.variables["y"], ValueType::Undefined);
    assert_eq!(results.variables["z"].to_text(), "2");
    assert!(console.contains("Unknown variable 'x'"), "console: {console}");
    assert!(console.contains("y = x"), "console: {console}");
}

#[test]
fn variables_flow_between_statements_and_scopes() {
    assert_variable("x = 2\ny = x * x", "y", "4");
    assert_variable("x = 1\nif (x == 1) { x = x + 10 }", "x", "11");
    let src = "\
total = 0
for (i from 1 to 3) {
    for (j from 1 to 3) {
        total = total + 1
    }
}";
    assert_variable(src, "total", "9");
}

#[test]
fn initial_bindings_are_visible_to_the_program() {
    let mut params = HashMap::new();
    params.insert("seed".to_string(), ValueType::from(21));

    let mut console = BufferConsole::new();
    let results = run_source("x = seed * 2", &params, &mut console);
    assert_eq!(results.variables["x"].to_text(), "42");
}

#[test]
fn reprinted_formulas_reparse_to_the_same_value() {
    for src in ["x = (2 + 3) * 4 - 1 / 8",
                "x = -3 + 5 * 2 ^ 3",
                "x = 3! + √16",
                "x = \"v=\" + 1 / 4"]
    {
        let (original, _) = run_script(src);

        let TokenGroup::Block(groups) = parse(src) else {
            panic!("parse did not produce a block");
        };
        let Some(TokenGroup::Formula(formula)) = groups.first() else {
            panic!("no formula in: {src}");
        };

        let (reparsed, _) = run_script(&formula.render());
        assert_eq!(original.variables["x"], reparsed.variables["x"],
                   "round-trip changed the value of: {src}");
    }
}

#[test]
fn pi_literal_folds_to_a_decimal() {
    assert_variable("x = π > 3.14 && π < 3.15", "x", "true");
}

#[test]
fn operator_aliases() {
    assert_variable("x = 10 ÷ 4", "x", "2.5");
    assert_variable("x = 9 : 2", "x", "4.5");
    assert_variable("x = 3 × 4", "x", "12");
    assert_variable("x = 3 • 4", "x", "12");
    assert_variable("x = 3 ≤ 3", "x", "true");
    assert_variable("x = 3 ≥ 4", "x", "false");
    assert_variable("x = 3 ≠ 4", "x", "true");
    assert_variable("x = tg 0", "x", "0");
}

#[test]
fn identifiers_may_start_with_keyword_prefixes() {
    assert_variable("forty = 40\ntotal = forty + 2", "total", "42");
    assert_variable("stepper = 3\nstepper = stepper * 2", "stepper", "6");
    assert_variable("iffy = 1\nelsewhere = iffy + 1", "elsewhere", "2");
    assert_variable("tone = 5\nprinter = tone", "printer", "5");
}

#[test]
fn standalone_blocks_share_their_bindings_upward() {
    let src = "\
x = 1
{
    y = x + 1
}
z = y";
    assert_variable(src, "z", "2");
}

#[test]
fn bindings_escape_nested_branch_scopes() {
    let src = "\
x = 1
if (x == 1) {
    y = 2
    if (y == 2) {
        z = x + y
    }
}
check = z";
    assert_variable(src, "check", "3");
}

#[test]
fn print_passes_its_value_through() {
    let (results, console) = run_script("x = print 5");
    assert_eq!(results.variables["x"].to_text(), "5");
    assert_eq!(console, "5");
}

#[test]
fn sleep_returns_its_argument() {
    assert_variable("x = sleep 0", "x", "0");
}

#[test]
fn a_non_numeric_while_condition_stops_silently() {
    let src = "\
x = 1
while (\"text\") {
    x = 2
}
y = 5";
    let (results, _) = run_script(src);
    assert_eq!(results.variables["y"].to_text(), "5");
    assert_eq!(results.variables["x"].to_text(), "1");
}

#[test]
fn deeply_nested_break_only_exits_the_nearest_loop() {
    let src = "\
outer = 0
for (i from 1 to 3) {
    for (j from 1 to 10) {
        if (j == 2) {
            break
        }
    }
    outer = outer + 1
}";
    assert_variable(src, "outer", "3");
}
