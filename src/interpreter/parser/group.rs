use crate::interpreter::parser::formula::Formula;

/// A node of the structured program tree produced by the grouper.
///
/// Each variant owns its children; a program is simply the root `Block`.
/// Formulas are fully pre-compiled at construction (sorted tokens plus an
/// action list), so walking this tree at run time never re-parses
/// anything.
#[derive(Debug, Clone)]
pub enum TokenGroup {
    /// A group with no content, produced by degenerate input. Running it is
    /// a no-op.
    Empty,
    /// A single expression or assignment statement.
    Formula(Formula),
    /// An ordered sequence of statements sharing a variable scope.
    Block(Vec<TokenGroup>),
    /// `if (condition) { … } else { … }`; either branch may be empty.
    Condition {
        /// The condition formula; a non-numeric result skips both branches.
        condition: Formula,
        /// Statements executed when the condition is truthy.
        on_true:   Box<TokenGroup>,
        /// Statements executed when the condition is falsy.
        on_false:  Box<TokenGroup>,
    },
    /// `while (condition) { … }`
    WhileLoop {
        /// Re-evaluated before every iteration.
        condition: Formula,
        /// The loop body.
        body:      Box<TokenGroup>,
    },
    /// `for (variable from start to end step step) { … }`
    ForLoop {
        /// The loop variable, rebound before every iteration.
        variable: String,
        /// Evaluated once, before iterating.
        start:    Formula,
        /// Evaluated once, before iterating.
        end:      Formula,
        /// Evaluated once; when absent the step is `1` or `-1` depending on
        /// the direction implied by `start` and `end`.
        step:     Option<Formula>,
        /// The loop body.
        body:     Box<TokenGroup>,
    },
}

impl TokenGroup {
    /// Returns `true` when running the group can have no effect.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Formula(formula) => {
                formula.is_empty()
                && !formula.should_return
                && !formula.should_break
                && !formula.should_continue
            },
            Self::Block(groups) => groups.iter().all(Self::is_empty),
            Self::Condition { condition, .. } | Self::WhileLoop { condition, .. } => {
                condition.is_empty()
            },
            Self::ForLoop { body, .. } => body.is_empty(),
        }
    }
}
