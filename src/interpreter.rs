/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads raw script text and produces the stream of tokens
/// consumed by the sorter and the grouper: literals, identifiers,
/// operators, brackets, keywords and newlines. It handles comments, the
/// end-of-program marker, and the context-sensitive unary minus. This is
/// the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with line numbers.
/// - Folds `true`/`false`/`π` and string literals into value tokens.
/// - Isolates malformed lines so one bad line never poisons the program.
pub mod lexer;
/// The parser module builds the structured program tree from tokens.
///
/// Parsing happens in three cooperating layers: the shunting-yard sorter
/// reorders each formula into postfix, the formula type pre-resolves the
/// postfix stream into an operator action list, and the grouper carves the
/// token stream into statements, conditionals, loops and nested blocks.
///
/// # Responsibilities
/// - Produces `TokenGroup` trees that never need re-parsing at run time.
/// - Degrades malformed input into `Undefined`-producing formulas instead
///   of failing.
pub mod parser;
/// The runner module executes the structured program tree.
///
/// The runner walks `TokenGroup`s, maintains the variable bindings of each
/// scope, applies the control-flow contract (`return`/`break`/`continue`
/// propagation) and dispatches console side effects. It is the execution
/// engine of the interpreter.
///
/// # Responsibilities
/// - Executes statements in order, copying scope per block.
/// - Catches every runtime error at the formula boundary and reports it to
///   the console sink.
pub mod runner;
/// The token module defines the lexical units and the operator table.
///
/// Every operator is a stateless descriptor carrying its precedence,
/// arity, associativity and a pure calculation function; the sorter, the
/// formula resolver and the runner are all data-driven off this table.
///
/// # Responsibilities
/// - Defines the `Token` enum shared by lexer, parser and runner.
/// - Defines the `Op` descriptor set with the full builtin surface.
pub mod token;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the `ValueType` union used across the interpreter
/// and the dataflow graph evaluator: text, arbitrary-precision decimals,
/// booleans and the `Undefined` sentinel, with the coercions between them.
///
/// # Responsibilities
/// - Defines `ValueType` and its conversion/rendering methods.
/// - Guarantees every operator result stays inside this closed set.
pub mod value;
