#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while evaluating a formula.
///
/// None of these abort a program: the runner catches them at the formula
/// boundary, reports them to the console sink together with the formula's
/// source text, and substitutes `Undefined` for the formula's value.
pub enum RuntimeError {
    /// A formula referenced a variable that has no defined value.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operator action referenced a slot that holds no value.
    ///
    /// This can only arise from malformed postfix streams that slipped past
    /// the construction-time checks.
    MissingOperand {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric operation produced a value with no decimal representation
    /// (infinity or NaN on the floating-point detour).
    NotRepresentable {
        /// The operation that failed, e.g. `"ln"`.
        operation: &'static str,
        /// The source line where the error occurred.
        line:      usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::MissingOperand { line } => {
                write!(f, "Error on line {line}: Operator is missing an operand.")
            },
            Self::NotRepresentable { operation, line } => write!(f,
                                                                 "Error on line {line}: '{operation}' produced a value that cannot be represented."),
        }
    }
}

impl std::error::Error for RuntimeError {}
