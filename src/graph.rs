/// Core dataflow entities.
///
/// Defines the `Block` trait, the `Computed` result (outputs or an
/// explicit flow redirect), the indexed `Ports` maps and the
/// `BlockRelation` wires, including the reserved parent boundary index.
pub mod block;
/// Conditions and the condition block.
///
/// The pluggable boolean tests (formula-driven and combinator forms) and
/// the `ConditionBlock` whose compute result redirects graph flow.
pub mod condition;
/// The graph evaluator.
///
/// `GroupBlock` wires child blocks by relations and evaluates them in
/// dependency order, performing live relation surgery when conditions
/// choose a path.
pub mod group;
/// Ready-made blocks.
///
/// Formula-driven blocks, constant sources, fold-style arithmetic blocks,
/// the sequential `LinearBlock` pipeline and the `LoopBlock`/`Iteration`
/// pair.
pub mod library;
