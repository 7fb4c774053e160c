use std::collections::HashMap;

use crate::{
    graph::block::{Block, Computed, Ports},
    interpreter::{parser::code::calculate_formula, value::ValueType},
};

/// Numeric tolerance for equality tests between condition inputs.
const EQUALITY_TOLERANCE: f64 = 1e-7;

/// A boolean test over a block's input values.
///
/// Conditions are the pluggable half of a [`ConditionBlock`]: the block
/// supplies the wiring and the flow decision, the condition supplies the
/// verdict. Implementations combine freely via [`All`], [`Any`] and
/// [`Not`].
pub trait Condition {
    /// Evaluates the condition against the input values, in slot order.
    fn test(&self, inputs: &[ValueType]) -> bool;
}

/// A condition evaluated from a formula string, with inputs exposed as
/// named variables.
///
/// Unnamed slots default to `in0`, `in1`, …; non-numeric inputs appear as
/// `0`. A non-numeric formula result counts as `false`.
pub struct FormulaCondition {
    formula:     String,
    input_names: HashMap<usize, String>,
}

impl FormulaCondition {
    /// Creates a condition from a formula such as `"a > b * 2"`.
    #[must_use]
    pub fn new(formula: impl Into<String>) -> Self {
        Self { formula:     formula.into(),
               input_names: HashMap::new(), }
    }

    /// Names the input at `index`, making it addressable from the formula.
    #[must_use]
    pub fn with_input(mut self, index: usize, name: impl Into<String>) -> Self {
        self.input_names.insert(index, name.into());
        self
    }
}

impl Condition for FormulaCondition {
    fn test(&self, inputs: &[ValueType]) -> bool {
        let mut params: HashMap<String, ValueType> = HashMap::new();

        for (index, value) in inputs.iter().enumerate() {
            let name = self.input_names
                           .get(&index)
                           .cloned()
                           .unwrap_or_else(|| format!("in{index}"));
            let value = if value.is_numeric() {
                value.clone()
            } else {
                ValueType::from(0)
            };
            params.insert(name, value);
        }

        let result = calculate_formula(&self.formula, &params);
        result.is_numeric() && result.to_boolean()
    }
}

/// Tests whether the first input equals a captured value: numerically
/// within [`EQUALITY_TOLERANCE`] for numbers, exactly for text.
pub struct EqualsTo(pub ValueType);

impl Condition for EqualsTo {
    fn test(&self, inputs: &[ValueType]) -> bool {
        let lhs = inputs.first().unwrap_or(&ValueType::Undefined);

        match (lhs, &self.0) {
            (ValueType::Text(l), ValueType::Text(r)) => l == r,
            (l, r) if l.is_numeric() && r.is_numeric() => {
                (l.to_f64() - r.to_f64()).abs() < EQUALITY_TOLERANCE
            },
            _ => false,
        }
    }
}

/// Tests whether the first input is greater than a captured value.
/// Text compares by length; mixed kinds are never greater.
pub struct GreaterThan(pub ValueType);

impl Condition for GreaterThan {
    fn test(&self, inputs: &[ValueType]) -> bool {
        let lhs = inputs.first().unwrap_or(&ValueType::Undefined);

        match (lhs, &self.0) {
            (ValueType::Text(l), ValueType::Text(r)) => l.len() > r.len(),
            (l, r) if l.is_numeric() && r.is_numeric() => l.to_f64() > r.to_f64(),
            _ => false,
        }
    }
}

/// Tests whether the first input is less than a captured value.
pub struct LessThan(pub ValueType);

impl Condition for LessThan {
    fn test(&self, inputs: &[ValueType]) -> bool {
        let lhs = inputs.first().cloned().unwrap_or(ValueType::Undefined);
        GreaterThan(lhs).test(std::slice::from_ref(&self.0))
    }
}

/// Tests whether the first input is less than the second.
pub struct Less;

impl Condition for Less {
    fn test(&self, inputs: &[ValueType]) -> bool {
        let first = inputs.first().cloned().unwrap_or(ValueType::Undefined);
        let second = inputs.get(1).cloned().unwrap_or(ValueType::Undefined);
        GreaterThan(first).test(std::slice::from_ref(&second))
    }
}

/// True when every inner condition holds.
pub struct All(pub Vec<Box<dyn Condition>>);

impl Condition for All {
    fn test(&self, inputs: &[ValueType]) -> bool {
        self.0.iter().all(|condition| condition.test(inputs))
    }
}

/// True when at least one inner condition holds.
pub struct Any(pub Vec<Box<dyn Condition>>);

impl Condition for Any {
    fn test(&self, inputs: &[ValueType]) -> bool {
        self.0.iter().any(|condition| condition.test(inputs))
    }
}

/// Inverts an inner condition.
pub struct Not(pub Box<dyn Condition>);

impl Condition for Not {
    fn test(&self, inputs: &[ValueType]) -> bool {
        !self.0.test(inputs)
    }
}

/// A flow-control block: computing it produces no outputs but decides
/// which successor the graph should route around it.
///
/// Inside a [`GroupBlock`](crate::graph::group::GroupBlock), the decision
/// triggers relation surgery — see the group documentation. Inside a
/// [`LinearBlock`](crate::graph::library::LinearBlock), it jumps the
/// pipeline to the chosen position.
pub struct ConditionBlock {
    condition:     Box<dyn Condition>,
    on_true:       Option<i32>,
    on_false:      Option<i32>,
    input_indices: Option<Vec<i32>>,
}

impl ConditionBlock {
    /// Creates a condition block routing to `on_true` or `on_false` by the
    /// verdict of `condition`. `None` routes mean "no path".
    #[must_use]
    pub fn new(condition: Box<dyn Condition>,
               on_true: Option<i32>,
               on_false: Option<i32>)
               -> Self {
        Self { condition,
               on_true,
               on_false,
               input_indices: None }
    }

    /// Restricts (and orders) which input slots feed the condition test;
    /// by default all inputs are passed in slot order.
    #[must_use]
    pub fn with_input_indices(mut self, indices: Vec<i32>) -> Self {
        self.input_indices = Some(indices);
        self
    }
}

impl Block for ConditionBlock {
    fn compute(&mut self, inputs: &Ports) -> Computed {
        let values: Vec<ValueType> = match &self.input_indices {
            Some(indices) => indices.iter()
                                    .filter_map(|i| inputs.get(i))
                                    .cloned()
                                    .collect(),
            None => inputs.values().cloned().collect(),
        };

        let chosen = if self.condition.test(&values) {
            self.on_true
        } else {
            self.on_false
        };

        Computed::Redirect(chosen)
    }
}
