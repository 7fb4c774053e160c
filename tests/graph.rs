use bloq::{
    graph::{
        block::{Block, BlockRelation, Computed, Ports, PARENT_INDEX},
        condition::{ConditionBlock, EqualsTo, FormulaCondition, Not},
        group::GroupBlock,
        library::{
            fold_add, fold_concat, fold_mult, AdditionBlock, DivisionBlock, FormulaBlock,
            Iteration, LinearBlock, LoopBlock, MultiplicationBlock, ProxyBlock, SquareRootBlock,
            SubtractionBlock,
        },
    },
    interpreter::value::ValueType,
};

fn ports(values: &[(i32, ValueType)]) -> Ports {
    values.iter().cloned().collect()
}

fn decimal(n: i64) -> ValueType {
    ValueType::from(n)
}

fn compute(group: &mut GroupBlock, inputs: Ports) -> Ports {
    match group.compute(&inputs) {
        Computed::Outputs(outputs) => outputs,
        Computed::Redirect(_) => panic!("a group never redirects"),
    }
}

#[test]
fn a_chain_of_blocks_matches_direct_computation() {
    // parent → A (sum) → B (sum with a third parent input) → parent.
    let blocks: Vec<Box<dyn Block>> = vec![Box::new(AdditionBlock), Box::new(AdditionBlock)];
    let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                         BlockRelation::new(PARENT_INDEX, 0, 1, 1),
                         BlockRelation::new(0, 1, 0, 0),
                         BlockRelation::new(PARENT_INDEX, 1, 2, 1),
                         BlockRelation::new(1, PARENT_INDEX, 0, 0)];

    let mut group = GroupBlock::new(blocks, relations);
    let outputs = compute(&mut group,
                          ports(&[(0, decimal(2)), (1, decimal(3)), (2, decimal(5))]));

    // (2 + 3) + 5, exactly what the underlying pure functions produce.
    let direct = fold_add(&[fold_add(&[decimal(2), decimal(3)]), decimal(5)]);
    assert_eq!(outputs[&0], direct);
    assert_eq!(outputs[&0].to_text(), "10");
}

#[test]
fn formula_blocks_compute_named_inputs() {
    let blocks: Vec<Box<dyn Block>> =
        vec![Box::new(FormulaBlock::new(vec!["a * a + b".to_string()]).with_input(0, "a")
                                                                      .with_input(1, "b"))];
    let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                         BlockRelation::new(PARENT_INDEX, 0, 1, 1),
                         BlockRelation::new(0, PARENT_INDEX, 0, 0)];

    let mut group = GroupBlock::new(blocks, relations);
    let outputs = compute(&mut group, ports(&[(0, decimal(4)), (1, decimal(6))]));

    assert_eq!(outputs[&0].to_text(), "22");
}

#[test]
fn condition_blocks_rewire_the_graph_at_run_time() {
    // parent feeds a condition; the condition redirects the flow to block
    // 1 (double) when the input is positive and to block 2 (add 100)
    // otherwise. Only the chosen block contributes to the outputs.
    let build = || -> GroupBlock {
        let blocks: Vec<Box<dyn Block>> =
            vec![Box::new(ConditionBlock::new(Box::new(FormulaCondition::new("in0 > 0")),
                                              Some(1),
                                              Some(2))),
                 Box::new(FormulaBlock::new(vec!["in0 * 2".to_string()])),
                 Box::new(FormulaBlock::new(vec!["in0 + 100".to_string()]))];
        let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                             BlockRelation::new(0, 1, 0, 0),
                             BlockRelation::new(0, 2, 0, 0),
                             BlockRelation::new(1, PARENT_INDEX, 0, 0),
                             BlockRelation::new(2, PARENT_INDEX, 0, 1)];
        GroupBlock::new(blocks, relations)
    };

    let outputs = compute(&mut build(), ports(&[(0, decimal(5))]));
    assert_eq!(outputs[&0].to_text(), "10");
    // The non-chosen branch never computed; its output slot is absent.
    assert!(!outputs.contains_key(&1));

    let outputs = compute(&mut build(), ports(&[(0, decimal(-5))]));
    assert_eq!(outputs[&1].to_text(), "95");
    assert!(!outputs.contains_key(&0));
}

#[test]
fn a_condition_choosing_no_successor_starves_downstream_blocks() {
    let blocks: Vec<Box<dyn Block>> =
        vec![Box::new(ConditionBlock::new(Box::new(FormulaCondition::new("in0 > 0")),
                                          Some(1),
                                          None)),
             Box::new(FormulaBlock::new(vec!["in0 * 2".to_string()]))];
    let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                         BlockRelation::new(0, 1, 0, 0),
                         BlockRelation::new(1, PARENT_INDEX, 0, 0)];

    let mut group = GroupBlock::new(blocks, relations);
    let outputs = compute(&mut group, ports(&[(0, decimal(-1))]));

    assert!(outputs.is_empty());
}

#[test]
fn arithmetic_blocks() {
    let cases: Vec<(Box<dyn Block>, Vec<(i32, ValueType)>, &str)> =
        vec![(Box::new(AdditionBlock), vec![(0, decimal(2)), (1, decimal(3))], "5"),
             (Box::new(SubtractionBlock), vec![(0, decimal(9)), (1, decimal(4))], "5"),
             (Box::new(MultiplicationBlock::new()), vec![(0, decimal(6)), (1, decimal(7))], "42"),
             (Box::new(DivisionBlock), vec![(0, decimal(1)), (1, decimal(8))], "0.125"),
             (Box::new(SquareRootBlock), vec![(0, decimal(49))], "7")];

    for (mut block, inputs, expected) in cases {
        let Computed::Outputs(outputs) = block.compute(&ports(&inputs)) else {
            panic!("arithmetic blocks always produce outputs");
        };
        assert_eq!(outputs[&0].to_text(), expected);
    }
}

#[test]
fn division_by_zero_and_missing_operands_yield_undefined() {
    let Computed::Outputs(outputs) =
        DivisionBlock.compute(&ports(&[(0, decimal(1)), (1, decimal(0))]))
    else {
        panic!("division produces outputs");
    };
    assert_eq!(outputs[&0], ValueType::Undefined);

    let Computed::Outputs(outputs) = SubtractionBlock.compute(&ports(&[(0, decimal(1))])) else {
        panic!("subtraction produces outputs");
    };
    assert_eq!(outputs[&0], ValueType::Undefined);
}

#[test]
fn fold_operations() {
    assert_eq!(fold_add(&[decimal(1), ValueType::Boolean(true), "x".into()]).to_text(), "2");
    assert_eq!(fold_mult(&[decimal(6), decimal(7)]).to_text(), "42");
    assert_eq!(fold_mult(&[decimal(6), ValueType::Boolean(false)]).to_text(), "0");
    assert_eq!(fold_concat(&[decimal(1), "+".into(), decimal(2)]).to_text(), "1+2");
}

#[test]
fn condition_combinators() {
    use bloq::graph::condition::Condition;

    assert!(EqualsTo(decimal(5)).test(&[decimal(5)]));
    assert!(EqualsTo("abc".into()).test(&["abc".into()]));
    assert!(!EqualsTo(decimal(5)).test(&["abc".into()]));
    assert!(Not(Box::new(EqualsTo(decimal(5)))).test(&[decimal(6)]));

    let formula = FormulaCondition::new("a % 2 == 0").with_input(0, "a");
    assert!(formula.test(&[decimal(4)]));
    assert!(!formula.test(&[decimal(5)]));
}

#[test]
fn linear_blocks_run_in_sequence_and_honor_jumps() {
    // A straight pipeline: each stage adds one.
    let mut pipeline = LinearBlock::new(vec![
        Box::new(FormulaBlock::new(vec!["in0 + 1".to_string()])),
        Box::new(FormulaBlock::new(vec!["in0 + 1".to_string()])),
    ]);
    let Computed::Outputs(outputs) = pipeline.compute(&ports(&[(0, decimal(1))])) else {
        panic!("pipelines produce outputs");
    };
    assert_eq!(outputs[&0].to_text(), "3");

    // A condition at the head jumps over the middle stage.
    let mut pipeline = LinearBlock::new(vec![
        Box::new(ConditionBlock::new(Box::new(FormulaCondition::new("in0 > 0")),
                                     Some(2),
                                     Some(1))),
        Box::new(FormulaBlock::new(vec!["in0 + 100".to_string()])),
        Box::new(FormulaBlock::new(vec!["in0 + 1".to_string()])),
    ]);
    let Computed::Outputs(outputs) = pipeline.compute(&ports(&[(0, decimal(1))])) else {
        panic!("pipelines produce outputs");
    };
    assert_eq!(outputs[&0].to_text(), "2");
}

#[test]
fn proxy_blocks_feed_constants() {
    let blocks: Vec<Box<dyn Block>> =
        vec![Box::new(ProxyBlock::new(ports(&[(0, decimal(40))]))), Box::new(AdditionBlock)];
    let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 7),
                         BlockRelation::new(0, 1, 0, 0),
                         BlockRelation::new(PARENT_INDEX, 1, 0, 1),
                         BlockRelation::new(1, PARENT_INDEX, 0, 0)];

    let mut group = GroupBlock::new(blocks, relations);
    let outputs = compute(&mut group, ports(&[(0, decimal(2))]));

    assert_eq!(outputs[&0].to_text(), "42");
}

#[test]
fn loop_blocks_iterate_until_break() {
    // Sums the iteration numbers 0..=4 into output slot 0.
    struct SumFive {
        total: i64,
        done:  bool,
    }

    impl Iteration for SumFive {
        fn set_loop_inputs(&mut self, _inputs: &Ports) {}

        fn compute_iteration(&mut self, iteration: i64, _inputs: &Ports) -> Ports {
            if iteration >= 5 {
                self.done = true;
            } else {
                self.total += iteration;
            }
            ports(&[(0, ValueType::from(self.total))])
        }

        fn should_break(&self) -> bool {
            self.done
        }
    }

    let mut looped = LoopBlock::new(SumFive { total: 0, done: false });
    let Computed::Outputs(outputs) = looped.compute(&Ports::new()) else {
        panic!("loops produce outputs");
    };
    assert_eq!(outputs[&0].to_text(), "10");
}

#[test]
fn cascaded_conditions_route_through_two_decisions() {
    // cond A picks between cond B and a fallback; cond B picks between
    // two formulas. Every hop reuses slot 0, so the splices chain.
    let build = || -> GroupBlock {
        let blocks: Vec<Box<dyn Block>> =
            vec![Box::new(ConditionBlock::new(Box::new(FormulaCondition::new("in0 > 0")),
                                              Some(1),
                                              Some(4))),
                 Box::new(ConditionBlock::new(Box::new(FormulaCondition::new("in0 > 10")),
                                              Some(2),
                                              Some(3))),
                 Box::new(FormulaBlock::new(vec!["in0 * 2".to_string()])),
                 Box::new(FormulaBlock::new(vec!["in0 * 3".to_string()])),
                 Box::new(FormulaBlock::new(vec!["0 - in0".to_string()]))];
        let relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                             BlockRelation::new(0, 1, 0, 0),
                             BlockRelation::new(0, 4, 0, 0),
                             BlockRelation::new(1, 2, 0, 0),
                             BlockRelation::new(1, 3, 0, 0),
                             BlockRelation::new(2, PARENT_INDEX, 0, 0),
                             BlockRelation::new(3, PARENT_INDEX, 0, 1),
                             BlockRelation::new(4, PARENT_INDEX, 0, 2)];
        GroupBlock::new(blocks, relations)
    };

    // 20 > 0, 20 > 10: doubled.
    let outputs = compute(&mut build(), ports(&[(0, decimal(20))]));
    assert_eq!(outputs[&0].to_text(), "40");

    // 5 > 0 but not > 10: tripled.
    let outputs = compute(&mut build(), ports(&[(0, decimal(5))]));
    assert_eq!(outputs[&1].to_text(), "15");

    // -5 routes to the negation fallback.
    let outputs = compute(&mut build(), ports(&[(0, decimal(-5))]));
    assert_eq!(outputs[&2].to_text(), "5");
}

#[test]
fn groups_nest_as_blocks() {
    // An inner group that doubles, embedded in an outer group that adds 1
    // afterwards.
    let inner_blocks: Vec<Box<dyn Block>> =
        vec![Box::new(FormulaBlock::new(vec!["in0 * 2".to_string()]))];
    let inner_relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                               BlockRelation::new(0, PARENT_INDEX, 0, 0)];
    let inner = GroupBlock::new(inner_blocks, inner_relations);

    let outer_blocks: Vec<Box<dyn Block>> =
        vec![Box::new(inner), Box::new(FormulaBlock::new(vec!["in0 + 1".to_string()]))];
    let outer_relations = vec![BlockRelation::new(PARENT_INDEX, 0, 0, 0),
                               BlockRelation::new(0, 1, 0, 0),
                               BlockRelation::new(1, PARENT_INDEX, 0, 0)];

    let mut outer = GroupBlock::new(outer_blocks, outer_relations);
    let outputs = compute(&mut outer, ports(&[(0, decimal(21))]));

    assert_eq!(outputs[&0].to_text(), "43");
}
