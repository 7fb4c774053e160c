use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    graph::block::{Block, BlockRelation, Computed, Ports, PARENT_INDEX},
    interpreter::value::ValueType,
};

/// A dataflow graph: child blocks plus the relations wiring their inputs
/// and outputs together.
///
/// The group is itself a [`Block`], so graphs nest. Evaluation runs in two
/// phases bounded by no-progress:
///
/// 1. every block whose only dependency is the group boundary is computed;
/// 2. every block whose full dependency set is already computed is
///    computed, pass after pass, until a pass computes nothing new.
///
/// Condition blocks are special in both phases: computing one yields a
/// flow decision instead of outputs, upon which the group performs live
/// surgery on its relation list — the condition's old incoming and
/// outgoing edges are removed and, when a successor was chosen, the
/// condition's former producers are wired directly to the successor's
/// matching inputs. The dependency sets are fully rebuilt from the mutated
/// relation list before computation continues; a block whose only path was
/// severed is simply never computed and is absent from the result.
pub struct GroupBlock {
    blocks:      Vec<Box<dyn Block>>,
    relations:   Vec<BlockRelation>,
    computed:    HashMap<i32, Ports>,
    parents_of:  HashMap<i32, HashSet<i32>>,
    children_of: HashMap<i32, HashSet<i32>>,
}

impl GroupBlock {
    /// Creates a group over `blocks`, wired by `relations`. Blocks are
    /// addressed by their index in the vector; [`PARENT_INDEX`] addresses
    /// the group boundary.
    #[must_use]
    pub fn new(blocks: Vec<Box<dyn Block>>, relations: Vec<BlockRelation>) -> Self {
        let mut group = Self { blocks,
                               relations,
                               computed: HashMap::new(),
                               parents_of: HashMap::new(),
                               children_of: HashMap::new() };
        group.rebuild_adjacency();
        group
    }

    /// Derives `parents_of`/`children_of` from the relation list.
    ///
    /// Called after construction and after every relation splice; the
    /// adjacency caches are never patched in place.
    fn rebuild_adjacency(&mut self) {
        self.parents_of.clear();
        self.children_of.clear();

        for relation in &self.relations {
            self.parents_of
                .entry(relation.to_block)
                .or_default()
                .insert(relation.from_block);
            self.children_of
                .entry(relation.from_block)
                .or_default()
                .insert(relation.to_block);
        }
    }

    /// A block is independent when it has wires and every producer feeding
    /// it is the group boundary.
    fn is_independent(&self, index: i32) -> bool {
        self.parents_of
            .get(&index)
            .is_some_and(|parents| parents.iter().all(|&p| p == PARENT_INDEX))
    }

    /// A block is computable when every producer feeding it has already
    /// been computed.
    fn is_computable(&self, index: i32) -> bool {
        self.parents_of
            .get(&index)
            .is_none_or(|parents| parents.iter().all(|p| self.computed.contains_key(p)))
    }

    /// Collects the input slots of `index` from the outputs of its already
    /// computed producers. Producers not yet computed contribute nothing;
    /// a wired slot whose producer lacks the output yields `Undefined`.
    fn find_input_values(&self, index: i32) -> Ports {
        let mut inputs = Ports::new();

        for relation in self.relations.iter().filter(|r| r.to_block == index) {
            if let Some(outputs) = self.computed.get(&relation.from_block) {
                let value = outputs.get(&relation.from_output)
                                   .cloned()
                                   .unwrap_or(ValueType::Undefined);
                inputs.insert(relation.to_input, value);
            }
        }

        inputs
    }

    /// Performs the relation surgery a condition's flow decision demands.
    ///
    /// The condition's incoming and outgoing relations are removed. When a
    /// successor was chosen, each (incoming, outgoing) pair that targets
    /// the successor with matching slot indices is fused into a direct
    /// relation from the condition's producer to the successor.
    fn splice_condition(&mut self, index: i32, successor: Option<i32>) {
        let (incoming, keep): (Vec<BlockRelation>, Vec<BlockRelation>) =
            self.relations.drain(..).partition(|r| r.to_block == index);
        let (outgoing, mut relations): (Vec<BlockRelation>, Vec<BlockRelation>) =
            keep.into_iter().partition(|r| r.from_block == index);

        if let Some(successor) = successor {
            for inbound in &incoming {
                for outbound in &outgoing {
                    if outbound.to_block == successor
                       && inbound.to_input == outbound.from_output
                    {
                        relations.push(BlockRelation::new(inbound.from_block,
                                                          outbound.to_block,
                                                          inbound.from_output,
                                                          outbound.to_input));
                    }
                }
            }
        }

        debug!(block = index, ?successor, "condition rewired relations");
        self.relations = relations;
        self.rebuild_adjacency();
    }

    /// Phase 1: compute every block that depends only on the group
    /// boundary, restarting the scan whenever a condition rewires the
    /// graph.
    fn compute_independent_blocks(&mut self) {
        loop {
            let mut rewired = false;

            for index in 0..self.blocks.len() {
                let block_index = i32::try_from(index).unwrap_or(i32::MAX);
                if !self.is_independent(block_index) {
                    continue;
                }

                let inputs = self.find_input_values(block_index);
                match self.blocks[index].compute(&inputs) {
                    Computed::Outputs(outputs) => {
                        self.computed.insert(block_index, outputs);
                    },
                    Computed::Redirect(successor) => {
                        self.splice_condition(block_index, successor);
                        rewired = true;
                        break;
                    },
                }
            }

            if !rewired {
                break;
            }
        }
    }

    /// Phase 2: repeatedly compute every not-yet-computed block whose full
    /// dependency set is satisfied, until a pass makes no progress.
    fn compute_dependent_blocks(&mut self) {
        loop {
            let mut progressed = 0usize;

            let frontier: Vec<i32> = self.computed
                                         .keys()
                                         .filter_map(|done| self.children_of.get(done))
                                         .flatten()
                                         .copied()
                                         .collect();

            'pass: for child in frontier {
                if self.computed.contains_key(&child) || !self.is_computable(child) {
                    continue;
                }
                let Ok(index) = usize::try_from(child) else {
                    continue;
                };
                if index >= self.blocks.len() {
                    continue;
                }

                let inputs = self.find_input_values(child);
                match self.blocks[index].compute(&inputs) {
                    Computed::Outputs(outputs) => {
                        self.computed.insert(child, outputs);
                        progressed += 1;
                    },
                    Computed::Redirect(successor) => {
                        self.splice_condition(child, successor);
                        progressed += 1;
                        // The relation list changed; derive a fresh
                        // frontier before computing anything else.
                        break 'pass;
                    },
                }
            }

            if progressed == 0 {
                break;
            }
        }
    }
}

impl Block for GroupBlock {
    /// Evaluates the whole graph for one set of boundary inputs.
    ///
    /// The result is whatever values route, through the relation set, into
    /// the group boundary's output side.
    fn compute(&mut self, inputs: &Ports) -> Computed {
        self.computed.clear();
        self.computed.insert(PARENT_INDEX, inputs.clone());

        self.compute_independent_blocks();
        self.compute_dependent_blocks();

        debug!(computed = self.computed.len() - 1, total = self.blocks.len(), "graph pass done");
        Computed::Outputs(self.find_input_values(PARENT_INDEX))
    }
}
