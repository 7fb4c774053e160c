use std::collections::HashMap;

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, One, Zero};

use crate::{
    graph::block::{Block, Computed, Ports},
    interpreter::{parser::code::calculate_formula, value::ValueType},
    util::decimal,
};

/// Sums every numeric input; booleans count as `1`/`0`, non-numeric
/// values are skipped.
#[must_use]
pub fn fold_add(inputs: &[ValueType]) -> ValueType {
    let mut acc = BigDecimal::zero();
    for value in inputs.iter().filter(|v| v.is_numeric()) {
        acc += value.to_decimal();
    }

    ValueType::Decimal(acc)
}

/// Multiplies every numeric input; a `false` among the factors
/// short-circuits the product to zero, a `true` is a neutral factor.
#[must_use]
pub fn fold_mult(inputs: &[ValueType]) -> ValueType {
    let mut acc = BigDecimal::one();
    for value in inputs.iter().filter(|v| v.is_numeric()) {
        match value {
            ValueType::Boolean(false) => return ValueType::Decimal(BigDecimal::zero()),
            ValueType::Boolean(true) => {},
            _ => acc *= value.to_decimal(),
        }
    }

    ValueType::Decimal(acc)
}

/// Concatenates the text rendition of every input.
#[must_use]
pub fn fold_concat(inputs: &[ValueType]) -> ValueType {
    let mut text = String::new();
    for value in inputs {
        text.push_str(&value.to_text());
    }

    ValueType::Text(text)
}

/// A block whose outputs are computed from formula strings, one formula
/// per output slot, with inputs exposed as named variables (`in0`, `in1`,
/// … unless renamed).
pub struct FormulaBlock {
    formulas:    Vec<String>,
    input_names: HashMap<i32, String>,
}

impl FormulaBlock {
    /// Creates a block computing one output per formula string.
    #[must_use]
    pub fn new(formulas: Vec<String>) -> Self {
        Self { formulas,
               input_names: HashMap::new(), }
    }

    /// Names the input slot at `index`, making it addressable from the
    /// formulas.
    #[must_use]
    pub fn with_input(mut self, index: i32, name: impl Into<String>) -> Self {
        self.input_names.insert(index, name.into());
        self
    }
}

impl Block for FormulaBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let mut params: HashMap<String, ValueType> = HashMap::new();
        for (&index, value) in inputs {
            if value.is_numeric() {
                let name = self.input_names
                               .get(&index)
                               .cloned()
                               .unwrap_or_else(|| format!("in{index}"));
                params.insert(name, value.clone());
            }
        }

        let mut outputs = Ports::new();
        for (index, formula) in self.formulas.iter().enumerate() {
            let slot = i32::try_from(index).unwrap_or(i32::MAX);
            outputs.insert(slot, calculate_formula(formula, &params));
        }

        Computed::Outputs(outputs)
    }
}

/// A block with constant outputs, independent of its inputs. Useful as a
/// source feeding literals into a graph.
pub struct ProxyBlock {
    outputs: Ports,
}

impl ProxyBlock {
    /// Creates a block that always produces `outputs`.
    #[must_use]
    pub fn new(outputs: Ports) -> Self {
        Self { outputs }
    }
}

impl Block for ProxyBlock {
    fn compute(&mut self, _inputs: &Ports) -> Computed {
        Computed::Outputs(self.outputs.clone())
    }
}

/// Sums all inputs into output slot `0`.
pub struct AdditionBlock;

impl Block for AdditionBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let values: Vec<ValueType> = inputs.values().cloned().collect();
        Computed::Outputs(single_output(fold_add(&values)))
    }
}

/// Subtracts input `1` from input `0` into output slot `0`; non-numeric
/// operands yield `Undefined`.
pub struct SubtractionBlock;

impl Block for SubtractionBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let minuend = inputs.get(&0).cloned().unwrap_or(ValueType::Undefined);
        let subtrahend = inputs.get(&1).cloned().unwrap_or(ValueType::Undefined);

        if !minuend.is_numeric() || !subtrahend.is_numeric() {
            return Computed::Outputs(single_output(ValueType::Undefined));
        }

        let negated = ValueType::Decimal(-subtrahend.to_decimal());
        Computed::Outputs(single_output(fold_add(&[minuend, negated])))
    }
}

/// Multiplies all inputs (times an optional initial factor) into output
/// slot `0`.
pub struct MultiplicationBlock {
    initial_factor: ValueType,
}

impl MultiplicationBlock {
    /// Creates a multiplication block with a neutral initial factor.
    #[must_use]
    pub fn new() -> Self {
        Self { initial_factor: ValueType::Decimal(BigDecimal::one()), }
    }

    /// Creates a multiplication block seeded with `factor`.
    #[must_use]
    pub fn with_initial_factor(factor: ValueType) -> Self {
        Self { initial_factor: factor }
    }
}

impl Default for MultiplicationBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for MultiplicationBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let mut factors = vec![self.initial_factor.clone()];
        factors.extend(inputs.values().cloned());
        Computed::Outputs(single_output(fold_mult(&factors)))
    }
}

/// Divides input `0` by input `1` into output slot `0`; a non-numeric
/// operand or an unrepresentable quotient yields `Undefined`.
pub struct DivisionBlock;

impl Block for DivisionBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let dividend = inputs.get(&0).cloned().unwrap_or(ValueType::Undefined);
        let divisor = inputs.get(&1).cloned().unwrap_or(ValueType::Undefined);

        if !dividend.is_numeric() || !divisor.is_numeric() || divisor.to_decimal().is_zero() {
            return Computed::Outputs(single_output(ValueType::Undefined));
        }

        let quotient = dividend.to_decimal() / divisor.to_decimal();
        Computed::Outputs(single_output(ValueType::Decimal(decimal::quantize(&quotient))))
    }
}

/// Computes the square root of input `0` into output slot `0`.
pub struct SquareRootBlock;

impl Block for SquareRootBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let value = inputs.get(&0).cloned().unwrap_or(ValueType::Undefined);
        if !value.is_numeric() {
            return Computed::Outputs(single_output(ValueType::Undefined));
        }

        let half = BigDecimal::from_f64(0.5).unwrap_or_else(BigDecimal::zero);
        let result = decimal::pow(&value.to_decimal(), &half, 0)
            .map_or(ValueType::Undefined, ValueType::Decimal);
        Computed::Outputs(single_output(result))
    }
}

/// A pipeline of blocks executed in sequence: each block's outputs become
/// the next block's inputs, and the last outputs are the pipeline's
/// result.
///
/// A [`ConditionBlock`](crate::graph::condition::ConditionBlock) inside
/// the pipeline jumps execution to the block index it chooses (the inputs
/// pass through unchanged); a block marked final stops the pipeline.
pub struct LinearBlock {
    blocks: Vec<Box<dyn Block>>,
}

impl LinearBlock {
    /// Creates a pipeline over `blocks`, executed in order.
    #[must_use]
    pub fn new(blocks: Vec<Box<dyn Block>>) -> Self {
        Self { blocks }
    }
}

impl Block for LinearBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let mut values = inputs.clone();
        let mut index = 0usize;

        while index < self.blocks.len() {
            let is_final = self.blocks[index].is_final();

            match self.blocks[index].compute(&values) {
                Computed::Outputs(outputs) => {
                    values = outputs;
                    index += 1;
                },
                Computed::Redirect(Some(next)) => {
                    match usize::try_from(next) {
                        Ok(next) if next < self.blocks.len() => index = next,
                        _ => index += 1,
                    }
                },
                Computed::Redirect(None) => index += 1,
            }

            if is_final {
                break;
            }
        }

        Computed::Outputs(values)
    }
}

/// One iteration step of a [`LoopBlock`].
///
/// Implementations receive the iteration number together with the
/// previous iteration's outputs, and raise `should_break` when the loop
/// is done. The loop's boundary inputs are injected once, before the
/// first iteration.
pub trait Iteration {
    /// Stores the loop's boundary inputs for use across iterations.
    fn set_loop_inputs(&mut self, inputs: &Ports);

    /// Computes one iteration: `iteration` is the zero-based pass number,
    /// `inputs` the previous iteration's outputs.
    fn compute_iteration(&mut self, iteration: i64, inputs: &Ports) -> Ports;

    /// True once the loop should stop; checked after every iteration.
    fn should_break(&self) -> bool;
}

/// Repeats an [`Iteration`] until it signals a break, feeding each
/// iteration the previous iteration's outputs.
pub struct LoopBlock<I: Iteration> {
    iteration: I,
}

impl<I: Iteration> LoopBlock<I> {
    /// Creates a loop around the given iteration step.
    #[must_use]
    pub fn new(iteration: I) -> Self {
        Self { iteration }
    }
}

impl<I: Iteration> Block for LoopBlock<I> {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        self.iteration.set_loop_inputs(inputs);

        let mut iteration_values = Ports::new();
        let mut index = 0i64;

        loop {
            iteration_values = self.iteration.compute_iteration(index, &iteration_values);
            if self.iteration.should_break() {
                break;
            }
            index += 1;
        }

        Computed::Outputs(iteration_values)
    }
}

fn single_output(value: ValueType) -> Ports {
    let mut outputs = Ports::new();
    outputs.insert(0, value);
    outputs
}
