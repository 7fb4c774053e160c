//! # bloq
//!
//! bloq is a small scripting language written in Rust. It parses and
//! evaluates scripts with arbitrary-precision decimal math, variables,
//! conditionals, loops and console output — and it ships a second,
//! independent execution model: a dataflow graph of wired computation
//! blocks with runtime rewiring.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::multiple_crate_versions)]

use std::collections::HashMap;

use tracing::debug;

use crate::{
    console::Console,
    interpreter::{runner::GroupResults, value::ValueType},
};

/// Defines the output sink the interpreter writes to.
///
/// The console is an interface consumed by the runner and implemented by
/// hosts: a terminal, a GUI text view or an in-memory buffer. `print` and
/// `println` builtins and runtime diagnostics all pass through it.
///
/// # Responsibilities
/// - Declares the `Console` trait.
/// - Provides stdout, buffering and discarding implementations.
pub mod console;
/// Provides unified error types for evaluation.
///
/// This module defines the errors that can be raised while a formula is
/// evaluated. They carry source line numbers for diagnostics and are
/// always caught at the formula boundary; no error ever aborts a program.
///
/// # Responsibilities
/// - Defines the `RuntimeError` enum for all evaluation failure modes.
/// - Attaches line numbers and messages for console reporting.
pub mod error;
/// The dataflow graph execution model.
///
/// An alternative way of expressing the same computations: black-box
/// blocks with indexed inputs and outputs, wired by explicit relations
/// and evaluated in dependency order. Condition blocks rewrite the wiring
/// at run time, redirecting the flow through the graph.
///
/// # Responsibilities
/// - Defines the `Block` trait, relations and the group evaluator.
/// - Provides formula-driven, arithmetic and flow-control blocks.
pub mod graph;
/// Orchestrates parsing and execution of script text.
///
/// This module ties together lexing, sorting, grouping, evaluation, value
/// representations and error handling to provide the complete runtime for
/// script execution.
///
/// # Responsibilities
/// - Coordinates the core components: lexer, parser, runner, values.
/// - Provides the entry points for parsing and running programs.
pub mod interpreter;
/// Storage for named script snippets.
///
/// An interface consumed by hosts to save and reload what the user wrote;
/// the interpreter core itself never persists anything.
///
/// # Responsibilities
/// - Declares the `SnippetStore` trait.
/// - Provides a directory-backed implementation for the command line.
pub mod snippets;
/// General utilities for decimal math.
///
/// Reusable numeric helpers shared by the operator table and the dataflow
/// blocks: exact decimal exponentiation, transcendental functions with
/// their re-quantization contract, and the rounding primitives.
///
/// # Responsibilities
/// - Implements pow/trig/log/rounding on arbitrary-precision decimals.
/// - Keeps floating-point noise out of script-visible results.
pub mod util;

pub use crate::interpreter::parser::code::parse;
pub use crate::interpreter::runner::run_group;

/// Parses and runs a script in one call, returning the final variable
/// bindings.
///
/// This is the typical host entry point: parsing fully completes before
/// the first statement executes, and console writes happen in exactly the
/// order the interpreter produces them. Parsing never fails (malformed
/// lines degrade to `Undefined`), and no runtime error escapes this
/// function — the worst outcome is a diagnostic on the console.
///
/// # Parameters
/// - `source`: The script text.
/// - `params`: Initial variable bindings visible to the program.
/// - `console`: Sink receiving program output and diagnostics.
///
/// # Returns
/// The bindings left at the end of the top-level block, plus the control
/// flags (set when the script ends in a top-level `return`).
///
/// # Examples
/// ```
/// use std::collections::HashMap;
///
/// use bloq::{console::BufferConsole, run_source};
///
/// let mut console = BufferConsole::new();
/// let results = run_source("x = 2 + 3 * 4\nprintln x", &HashMap::new(), &mut console);
///
/// assert_eq!(results.variables["x"].to_text(), "14");
/// assert_eq!(console.contents(), "14\n");
/// ```
pub fn run_source(source: &str,
                  params: &HashMap<String, ValueType>,
                  console: &mut dyn Console)
                  -> GroupResults {
    let parse_started = std::time::Instant::now();
    let program = parse(source);
    debug!(elapsed = ?parse_started.elapsed(), "program parsed");

    let run_started = std::time::Instant::now();
    let results = run_group(&program, params, console);
    debug!(elapsed = ?run_started.elapsed(), "program executed");

    results
}
