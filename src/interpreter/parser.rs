/// The statement grouper.
///
/// Carves the flat token stream into the structured program tree: one
/// `TokenGroup` per statement, with recursive readers for conditionals,
/// loops and braced blocks, and support for formulas continuing across
/// physical lines.
pub mod code;
/// Parsed formulas.
///
/// A `Formula` owns one expression or assignment: its tokens are sorted
/// into postfix and resolved into an operator action list once, at
/// construction, and evaluated as a linear walk afterwards.
pub mod formula;
/// The structured program tree.
///
/// Defines `TokenGroup`, the tagged tree the grouper produces and the
/// runner walks.
pub mod group;
/// The expression sorter.
///
/// The shunting-yard reordering of infix token runs into postfix
/// evaluation order, honoring the operator table's precedence and
/// associativity tiers.
pub mod sorter;
