use std::collections::BTreeMap;

use crate::interpreter::value::ValueType;

/// The reserved block index addressing the enclosing group's own boundary:
/// as a producer it stands for the group's inputs, as a consumer for the
/// group's outputs.
pub const PARENT_INDEX: i32 = -1;

/// The indexed value slots flowing into or out of a block.
///
/// Keyed by slot index; ordered so that positional consumers (conditions)
/// see a deterministic input order.
pub type Ports = BTreeMap<i32, ValueType>;

/// The outcome of computing one block.
///
/// Ordinary blocks produce output values. A condition block instead
/// produces a flow decision: the index of the successor the flow should
/// take next, or `None` when no path is chosen. Making the decision part
/// of the return value keeps control-flow redirection an explicit result
/// rather than an out-of-band callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed {
    /// The block's output slots.
    Outputs(Ports),
    /// A condition's verdict: the chosen successor block, if any.
    Redirect(Option<i32>),
}

/// An independent computation unit in a dataflow graph.
///
/// A block owns indexed input and output slots and exposes one compute
/// operation. Blocks are black boxes to the graph evaluator: only the
/// relation list says whose outputs feed whose inputs.
pub trait Block {
    /// Computes the block's outputs from the given inputs.
    fn compute(&mut self, inputs: &Ports) -> Computed;

    /// Marks the last block of a linear pipeline; computation stops after
    /// a final block.
    fn is_final(&self) -> bool {
        false
    }
}

/// A directed wire in a dataflow graph: output slot `from_output` of block
/// `from_block` feeds input slot `to_input` of block `to_block`.
///
/// Either endpoint may be [`PARENT_INDEX`], wiring the group's own
/// boundary. Relations are plain index tuples, not pointers; the group
/// evaluator derives its dependency sets from them and rebuilds those sets
/// whenever the relation list changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRelation {
    /// The producing block.
    pub from_block:  i32,
    /// The consuming block.
    pub to_block:    i32,
    /// Output slot index on the producing block.
    pub from_output: i32,
    /// Input slot index on the consuming block.
    pub to_input:    i32,
}

impl BlockRelation {
    /// Creates a relation wiring `from_block`'s output slot to `to_block`'s
    /// input slot.
    #[must_use]
    pub const fn new(from_block: i32, to_block: i32, from_output: i32, to_input: i32) -> Self {
        Self { from_block,
               to_block,
               from_output,
               to_input }
    }
}
