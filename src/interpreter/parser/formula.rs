use std::collections::HashMap;

use crate::{
    console::Console,
    error::RuntimeError,
    interpreter::{
        parser::sorter::sort_tokens,
        runner::EvalResult,
        token::{Op, Token},
        value::ValueType,
    },
};

/// A single parsed expression or assignment statement.
///
/// Construction does all the expensive work once: the assignment prefix
/// (`name =`) is split off, the remaining tokens are sorted into postfix
/// order, and the postfix stream is resolved into an ordered list of
/// operator actions with concrete operand slots. Running the formula is
/// then a linear walk over the action list — no re-parsing, no re-sorting.
///
/// A formula may instead carry one of the `return`/`break`/`continue`
/// control flags; such formulas short-circuit at run time and their
/// expression (if any) is never evaluated.
#[derive(Debug, Clone)]
pub struct Formula {
    unsorted:            Vec<Token>,
    tokens:              Vec<Token>,
    variable_name:       Option<String>,
    actions:             Vec<Action>,
    immediate_undefined: bool,
    /// The 1-based source line the formula starts on.
    pub line:            usize,
    /// Set when the formula carries a `return` marker.
    pub should_return:   bool,
    /// Set when the formula carries a `break` marker.
    pub should_break:    bool,
    /// Set when the formula carries a `continue` marker.
    pub should_continue: bool,
}

/// One pre-resolved operator application: which operator, which value
/// slots feed it, and which slot receives the result.
#[derive(Debug, Clone)]
struct Action {
    op:       Op,
    operands: Vec<usize>,
    target:   usize,
}

impl Formula {
    /// Builds a formula from the raw (infix) token run of one statement.
    ///
    /// If the second token is `=` the first must be a word; the word
    /// becomes the assignment target and the remainder is the expression.
    /// Any other placement of `=` (or a sort failure, or an operator with
    /// no reachable operands) marks the formula to evaluate immediately to
    /// `Undefined` without touching its expression at run time.
    ///
    /// # Parameters
    /// - `unsorted`: The infix tokens, newlines already stripped.
    /// - `line`: The 1-based source line of the first token.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use bloq::{
    ///     console::NullConsole,
    ///     interpreter::{lexer::tokenize, parser::formula::Formula, token::Token},
    /// };
    ///
    /// let tokens: Vec<Token> = tokenize("x = 2 + 3 * 4").into_iter()
    ///                                                    .map(|(t, _)| t)
    ///                                                    .filter(|t| *t != Token::NewLine)
    ///                                                    .collect();
    /// let formula = Formula::new(tokens, 1);
    ///
    /// assert_eq!(formula.variable_name(), Some("x"));
    /// let value = formula.calculate(&HashMap::new(), &mut NullConsole).unwrap();
    /// assert_eq!(value.to_text(), "14");
    /// ```
    #[must_use]
    pub fn new(unsorted: Vec<Token>, line: usize) -> Self {
        let should_return = unsorted.contains(&Token::Return);
        let should_break = unsorted.contains(&Token::Break);
        let should_continue = unsorted.contains(&Token::Continue);

        let (variable_name, expression) = split_assignment(&unsorted);
        let mut immediate_undefined = expression.is_none();
        let tokens = sort_tokens(expression.unwrap_or_default());

        let mut actions = Vec::new();
        if !immediate_undefined {
            match resolve_actions(&tokens) {
                Some(resolved) => actions = resolved,
                None => immediate_undefined = true,
            }
        }

        Self { unsorted,
               tokens,
               variable_name,
               actions,
               immediate_undefined,
               line,
               should_return,
               should_break,
               should_continue }
    }

    /// The assignment target, when the formula has a `name =` prefix.
    #[must_use]
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    /// Returns `true` when the formula has no expression tokens at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Renders the formula's original tokens back to text, for console
    /// diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        let parts: Vec<String> = self.unsorted.iter().map(ToString::to_string).collect();
        parts.join(" ")
    }

    /// Evaluates the formula against the given variable bindings.
    ///
    /// Words resolve against `params`; literals stand for themselves. The
    /// pre-computed actions then run left to right, each splicing its
    /// result back into its target slot; printing operators forward their
    /// result to the console sink as a side effect. The value left in the
    /// first slot is the formula's result.
    ///
    /// # Parameters
    /// - `params`: Variable bindings visible to this formula.
    /// - `console`: Sink receiving `print`/`println` output.
    ///
    /// # Returns
    /// The resulting value; `Undefined` for formulas marked as malformed at
    /// construction time.
    ///
    /// # Errors
    /// - [`RuntimeError::UnknownVariable`] if a word has no defined value.
    /// - Any error surfaced by an operator (see [`Op::calculate`]).
    ///
    /// The caller is expected to catch these at the formula boundary and
    /// continue with `Undefined`.
    pub fn calculate(&self,
                     params: &HashMap<String, ValueType>,
                     console: &mut dyn Console)
                     -> EvalResult<ValueType> {
        if self.immediate_undefined {
            return Ok(ValueType::Undefined);
        }

        let mut slots: Vec<Option<ValueType>> = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            match token {
                Token::Value(v) => slots.push(Some(v.clone())),
                Token::Word(name) => match params.get(name) {
                    Some(value) if !value.is_undefined() => slots.push(Some(value.clone())),
                    _ => {
                        return Err(RuntimeError::UnknownVariable { name: name.clone(),
                                                                   line: self.line, });
                    },
                },
                _ => slots.push(None),
            }
        }

        for action in &self.actions {
            let mut args = Vec::with_capacity(action.operands.len());
            for &index in &action.operands {
                let value = slots.get(index)
                                 .and_then(Clone::clone)
                                 .ok_or(RuntimeError::MissingOperand { line: self.line })?;
                args.push(value);
            }

            let value = action.op.calculate(&args, self.line)?;
            if action.op.does_print() {
                console.print_value(&value);
            }
            slots[action.target] = Some(value);
        }

        Ok(slots.first().and_then(Clone::clone).unwrap_or(ValueType::Undefined))
    }
}

/// Splits a leading `name =` prefix off the token run.
///
/// Returns the assignment target (if any) and the expression tokens, or
/// `None` for the expression when `=` appears anywhere it is not allowed.
fn split_assignment(unsorted: &[Token]) -> (Option<String>, Option<Vec<Token>>) {
    let misplaced = |tokens: &[Token]| tokens.contains(&Token::Assign);

    if unsorted.get(1) == Some(&Token::Assign) {
        if let Some(Token::Word(name)) = unsorted.first() {
            let expression = &unsorted[2..];
            if misplaced(expression) {
                return (None, None);
            }
            return (Some(name.clone()), Some(expression.to_vec()));
        }
        return (None, None);
    }

    if misplaced(unsorted) {
        return (None, None);
    }

    (None, Some(unsorted.to_vec()))
}

/// Resolves a postfix token stream into an ordered action list.
///
/// Repeatedly finds the first remaining operator and scans backwards for
/// the nearest unconsumed value slots to feed it, skipping slots already
/// claimed by earlier actions. Consumed operand slots and the operator
/// slot itself are retired; the result slot stays live so later operators
/// can consume it. Zero-argument operators retire nothing and turn their
/// own slot into the result slot.
///
/// Returns `None` when an operator cannot find operands for its arity or
/// when a control marker is interleaved with real operators — both mark
/// the formula as immediately `Undefined`.
fn resolve_actions(tokens: &[Token]) -> Option<Vec<Action>> {
    #[derive(Clone, PartialEq)]
    enum Slot {
        Value,
        Marker,
        Operator(Op),
        Retired,
    }

    let mut slots: Vec<Slot> = tokens.iter()
                                     .map(|token| match token {
                                         Token::Value(_) | Token::Word(_) => Slot::Value,
                                         Token::Op(op) => Slot::Operator(*op),
                                         _ => Slot::Marker,
                                     })
                                     .collect();

    let mut actions = Vec::new();

    loop {
        let live = slots.iter().filter(|s| **s != Slot::Retired).count();
        if live <= 1 && matches!(slots.first(), Some(Slot::Value) | None) {
            break;
        }

        let found = slots.iter().position(|s| matches!(s, Slot::Operator(_) | Slot::Marker));
        let Some(index) = found else {
            break;
        };

        let Slot::Operator(op) = slots[index].clone() else {
            // A control marker mixed into the expression stream.
            return None;
        };

        if index < op.arity() {
            return None;
        }

        let backscan = |slots: &[Slot], from: usize| {
            (0..from).rev().find(|&i| slots[i] == Slot::Value)
        };

        match op.arity() {
            2 => {
                let rhs = backscan(&slots, index)?;
                let lhs = backscan(&slots, rhs)?;
                actions.push(Action { op,
                                      operands: vec![lhs, rhs],
                                      target: lhs, });
                slots[rhs] = Slot::Retired;
                slots[index] = Slot::Retired;
            },
            1 => {
                let operand = backscan(&slots, index)?;
                actions.push(Action { op,
                                      operands: vec![operand],
                                      target: operand, });
                slots[index] = Slot::Retired;
            },
            _ => {
                actions.push(Action { op,
                                      operands: Vec::new(),
                                      target: index, });
                slots[index] = Slot::Value;
            },
        }
    }

    Some(actions)
}
