use std::collections::HashMap;

use bigdecimal::BigDecimal;
use num_traits::One;

use crate::{
    console::Console,
    error::RuntimeError,
    interpreter::{
        parser::{formula::Formula, group::TokenGroup},
        value::ValueType,
    },
};

/// Result type used throughout formula evaluation.
///
/// Errors of this type never escape the interpreter: [`run_formula`]
/// catches them, reports them through the console sink and substitutes
/// `Undefined`.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The outcome of executing one statement group.
///
/// `variables` holds the bindings the group makes visible to its caller.
/// The three flags propagate control flow upward: `return` unwinds every
/// enclosing block, `break` terminates the nearest loop, `continue` ends
/// the current iteration.
#[derive(Debug, Clone, Default)]
pub struct GroupResults {
    /// Bindings produced by the group, visible to the enclosing scope.
    pub variables:       HashMap<String, ValueType>,
    /// The group raised `return`.
    pub should_return:   bool,
    /// The group raised `break` (or `return`, which implies it).
    pub should_break:    bool,
    /// The group raised `continue` (or anything stronger).
    pub should_continue: bool,
}

impl GroupResults {
    fn empty() -> Self {
        Self::default()
    }

    fn with_variables(variables: HashMap<String, ValueType>) -> Self {
        Self { variables,
               ..Self::default() }
    }
}

/// The outcome of executing a single formula: the optional binding it
/// produces plus the control-flow flags.
#[derive(Debug, Clone)]
pub struct FormulaResults {
    /// The assignment target (if any) and the computed value.
    pub variable:        (Option<String>, ValueType),
    /// The formula is a `return` statement.
    pub should_return:   bool,
    /// The formula is a `break` statement (or stronger).
    pub should_break:    bool,
    /// The formula is a `continue` statement (or stronger).
    pub should_continue: bool,
}

impl FormulaResults {
    fn to_group_results(&self) -> GroupResults {
        let mut variables = HashMap::new();
        if let (Some(name), value) = (&self.variable.0, &self.variable.1) {
            variables.insert(name.clone(), value.clone());
        }

        GroupResults { variables,
                       should_return: self.should_return,
                       should_break: self.should_break,
                       should_continue: self.should_continue }
    }
}

/// Executes one statement group against the given bindings.
///
/// This is the tree-walking core of the interpreter. Each variant follows
/// the language's control-flow contract:
/// - a **formula** evaluates (or short-circuits on its control flags) and
///   binds its result;
/// - a **block** runs its children in order against a private copy of the
///   inherited bindings, accumulating what they produce, and stops on the
///   first child raising a control flag;
/// - a **condition** evaluates its formula and runs exactly one branch; a
///   non-numeric condition result silently skips both;
/// - a **while loop** re-evaluates its condition each iteration and merges
///   body bindings back into the loop scope; `break` stops the loop
///   without propagating further, `return` propagates;
/// - a **for loop** evaluates `start`/`end`/`step` once, infers the
///   direction from the bounds when no step is given, and rebinds the
///   loop variable before every iteration.
///
/// # Parameters
/// - `group`: The statement group to execute.
/// - `params`: Bindings inherited from the enclosing scope.
/// - `console`: Sink for program output and diagnostics.
///
/// # Returns
/// The bindings produced and the control-flow flags raised.
pub fn run_group(group: &TokenGroup,
                 params: &HashMap<String, ValueType>,
                 console: &mut dyn Console)
                 -> GroupResults {
    match group {
        TokenGroup::Empty => GroupResults::empty(),
        TokenGroup::Formula(formula) => run_formula(formula, params, console).to_group_results(),
        TokenGroup::Block(groups) => run_block(groups, params, console),
        TokenGroup::Condition { condition,
                                on_true,
                                on_false, } => {
            let result = run_formula(condition, params, console).variable.1;
            if !result.is_numeric() {
                return GroupResults::empty();
            }

            if result.to_boolean() {
                run_group(on_true, params, console)
            } else {
                run_group(on_false, params, console)
            }
        },
        TokenGroup::WhileLoop { condition, body } => {
            run_while_loop(condition, body, params, console)
        },
        TokenGroup::ForLoop { variable,
                              start,
                              end,
                              step,
                              body, } => {
            run_for_loop(variable, start, end, step.as_ref(), body, params, console)
        },
    }
}

/// Executes a single formula, catching every runtime error at this
/// boundary.
///
/// A formula flagged `return`/`break`/`continue` produces its flag
/// immediately with `Undefined`; the expression is *not* evaluated —
/// control flags take absolute precedence. Otherwise the formula's
/// pre-computed actions run against `params`, and an error is reported to
/// the console (with the formula's source text) before yielding
/// `Undefined` with no control transfer, so execution continues with the
/// surrounding statements.
pub fn run_formula(formula: &Formula,
                   params: &HashMap<String, ValueType>,
                   console: &mut dyn Console)
                   -> FormulaResults {
    if formula.should_return {
        return FormulaResults { variable:        (None, ValueType::Undefined),
                                should_return:   true,
                                should_break:    true,
                                should_continue: true, };
    }
    if formula.should_break {
        return FormulaResults { variable:        (None, ValueType::Undefined),
                                should_return:   false,
                                should_break:    true,
                                should_continue: true, };
    }
    if formula.should_continue {
        return FormulaResults { variable:        (None, ValueType::Undefined),
                                should_return:   false,
                                should_break:    false,
                                should_continue: true, };
    }

    let value = match formula.calculate(params, console) {
        Ok(value) => value,
        Err(error) => {
            console.println(&format!("{error} In formula '{}'.", formula.render()));
            ValueType::Undefined
        },
    };

    FormulaResults { variable:        (formula.variable_name().map(str::to_string), value),
                     should_return:   false,
                     should_break:    false,
                     should_continue: false, }
}

fn run_block(groups: &[TokenGroup],
             params: &HashMap<String, ValueType>,
             console: &mut dyn Console)
             -> GroupResults {
    let mut block_params = params.clone();

    for group in groups {
        let result = run_group(group, &block_params, console);
        for (name, value) in &result.variables {
            block_params.insert(name.clone(), value.clone());
        }

        if result.should_return {
            return GroupResults { variables:       result.variables,
                                  should_return:   true,
                                  should_break:    true,
                                  should_continue: true, };
        }
        if result.should_break {
            return GroupResults { variables:       block_params,
                                  should_return:   false,
                                  should_break:    true,
                                  should_continue: true, };
        }
        if result.should_continue {
            return GroupResults { variables:       block_params,
                                  should_return:   false,
                                  should_break:    false,
                                  should_continue: true, };
        }
    }

    GroupResults::with_variables(block_params)
}

fn run_while_loop(condition: &Formula,
                  body: &TokenGroup,
                  params: &HashMap<String, ValueType>,
                  console: &mut dyn Console)
                  -> GroupResults {
    let mut loop_params = params.clone();

    loop {
        let condition_result = run_formula(condition, &loop_params, console).variable.1;
        if !condition_result.is_numeric() {
            return GroupResults::empty();
        }
        if !condition_result.to_boolean() {
            break;
        }

        let iteration = run_group(body, &loop_params, console);
        for (name, value) in &iteration.variables {
            loop_params.insert(name.clone(), value.clone());
        }

        if iteration.should_return {
            return GroupResults { variables:       loop_params,
                                  should_return:   true,
                                  should_break:    true,
                                  should_continue: false, };
        }
        if iteration.should_break {
            break;
        }
    }

    GroupResults::with_variables(loop_params)
}

#[allow(clippy::too_many_lines)]
fn run_for_loop(variable: &str,
                start: &Formula,
                end: &Formula,
                step: Option<&Formula>,
                body: &TokenGroup,
                params: &HashMap<String, ValueType>,
                console: &mut dyn Console)
                -> GroupResults {
    let mut loop_params = params.clone();

    let start_value = run_formula(start, &loop_params, console).variable.1;
    if !start_value.is_numeric() {
        return GroupResults::empty();
    }
    let end_value = run_formula(end, &loop_params, console).variable.1;
    if !end_value.is_numeric() {
        return GroupResults::empty();
    }

    let start_decimal = start_value.to_decimal();
    let end_decimal = end_value.to_decimal();
    let ascending = end_decimal > start_decimal;

    // The step formula is evaluated once, before iterating.
    let step_decimal = match step {
        Some(formula) => {
            let value = run_formula(formula, &loop_params, console).variable.1;
            if value.is_numeric() {
                value.to_decimal()
            } else {
                BigDecimal::one()
            }
        },
        None if ascending => BigDecimal::one(),
        None => -BigDecimal::one(),
    };

    let mut iteration_value = start_decimal;

    loop {
        let in_range = if ascending {
            iteration_value <= end_decimal
        } else {
            iteration_value >= end_decimal
        };
        if !in_range {
            break;
        }

        loop_params.insert(variable.to_string(), ValueType::Decimal(iteration_value.clone()));

        let iteration = run_group(body, &loop_params, console);
        for (name, value) in &iteration.variables {
            loop_params.insert(name.clone(), value.clone());
        }

        if iteration.should_return {
            return GroupResults { variables:       loop_params,
                                  should_return:   true,
                                  should_break:    true,
                                  should_continue: true, };
        }
        if iteration.should_break {
            break;
        }

        iteration_value = &iteration_value + &step_decimal;
    }

    GroupResults::with_variables(loop_params)
}
