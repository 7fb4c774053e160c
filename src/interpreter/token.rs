use std::{thread, time::Duration};

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, One, Zero};

use crate::{
    error::RuntimeError,
    interpreter::{runner::EvalResult, value::ValueType},
    util::decimal,
};

/// One lexical unit of a script, as consumed by the sorter, the grouper and
/// the runner.
///
/// Tokens are produced once by the lexer and treated as read-only
/// afterwards; a formula's sorted token list is computed at parse time and
/// never re-derived.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A literal value: a number, a boolean, a string, or the folded `π`
    /// constant.
    Value(ValueType),
    /// An identifier, resolved against the variable bindings at run time.
    Word(String),
    /// An operator or builtin function from the fixed operator table.
    Op(Op),
    /// `(`
    LeftBracket,
    /// `)`
    RightBracket,
    /// `=`, valid only as `name = expression`.
    Assign,
    /// `{`
    BlockStart,
    /// `}`
    BlockEnd,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `for`
    For,
    /// `from`
    From,
    /// `to`
    To,
    /// `step`
    Step,
    /// `return`
    Return,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// End of a physical source line.
    NewLine,
}

impl Token {
    /// Returns `true` for a binary (two-operand, non-postfix) operator.
    ///
    /// A formula that ends a line on a binary operator is mid-expression and
    /// continues onto the next physical line.
    #[must_use]
    pub const fn is_binary_op(&self) -> bool {
        match self {
            Self::Op(op) => op.arity() == 2 && !op.is_right_hand(),
            _ => false,
        }
    }

    /// Returns `true` for the `return`/`break`/`continue` markers that flag
    /// a formula instead of contributing to its expression.
    #[must_use]
    pub const fn is_control_marker(&self) -> bool {
        matches!(self, Self::Return | Self::Break | Self::Continue)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(ValueType::Text(s)) => write!(f, "\"{s}\""),
            Self::Value(v) => write!(f, "{v}"),
            Self::Word(w) => write!(f, "{w}"),
            Self::Op(op) => write!(f, "{op}"),
            Self::LeftBracket => write!(f, "("),
            Self::RightBracket => write!(f, ")"),
            Self::Assign => write!(f, "="),
            Self::BlockStart => write!(f, "{{"),
            Self::BlockEnd => write!(f, "}}"),
            Self::If => write!(f, "if"),
            Self::Else => write!(f, "else"),
            Self::While => write!(f, "while"),
            Self::For => write!(f, "for"),
            Self::From => write!(f, "from"),
            Self::To => write!(f, "to"),
            Self::Step => write!(f, "step"),
            Self::Return => write!(f, "return"),
            Self::Break => write!(f, "break"),
            Self::Continue => write!(f, "continue"),
            Self::NewLine => writeln!(f),
        }
    }
}

/// The fixed set of operators and builtin functions.
///
/// Every operator is a stateless descriptor: precedence, arity,
/// associativity and a pure calculation over [`ValueType`] arguments. The
/// precedence tiers strictly order the operator classes:
///
/// | tier | operators |
/// |------|-----------|
/// | 0 | `\|\|` `&&` |
/// | 1 | `<` `<=` `>` `>=` `==` `!=` |
/// | 2 | `+` `-` `%` |
/// | 3 | `*` `/` |
/// | 4 | `^` |
/// | 5 | unary minus, `√`, trig, logs, `int`, `abs` |
/// | 6 | `!` (postfix factorial) |
/// | 7 | `rand` (zero arguments) |
///
/// `print`, `println` and `sleep` sit below every tier (−1) so that their
/// whole argument expression is evaluated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `<`
    Less,
    /// `<=`, `≤`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`, `≥`
    GreaterOrEqual,
    /// `==`
    Equals,
    /// `!=`, `≠`
    NotEquals,
    /// `+`; concatenates when either side is text.
    Plus,
    /// `-` (binary subtraction)
    Minus,
    /// `%`, `mod`
    Mod,
    /// `*`, `•`, `×`
    Mult,
    /// `/`, `÷`, `:`
    Div,
    /// `^`, `**`
    Pow,
    /// `√`, `sqrt`
    Sqrt,
    /// `-` in prefix position.
    UnaryMinus,
    /// `!` (postfix)
    Factorial,
    /// `sin`
    Sin,
    /// `cos`
    Cos,
    /// `tg`, `tan`
    Tan,
    /// `ln`
    Ln,
    /// `lg`
    Lg,
    /// `int` (floor)
    Int,
    /// `abs`
    Abs,
    /// `print`
    Print,
    /// `println`
    Println,
    /// `sleep` (seconds)
    Sleep,
    /// `rand` (zero arguments, uniform in `[0, 1)`)
    Rand,
}

impl Op {
    /// The binding strength of the operator; higher binds tighter.
    #[must_use]
    pub const fn precedence(self) -> i32 {
        match self {
            Self::Print | Self::Println | Self::Sleep => -1,
            Self::Or | Self::And => 0,
            Self::Less
            | Self::LessOrEqual
            | Self::Greater
            | Self::GreaterOrEqual
            | Self::Equals
            | Self::NotEquals => 1,
            Self::Plus | Self::Minus | Self::Mod => 2,
            Self::Mult | Self::Div => 3,
            Self::Pow => 4,
            Self::Sqrt
            | Self::UnaryMinus
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Ln
            | Self::Lg
            | Self::Int
            | Self::Abs => 5,
            Self::Factorial => 6,
            Self::Rand => 7,
        }
    }

    /// The number of operands the operator consumes (0, 1 or 2).
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Or
            | Self::And
            | Self::Less
            | Self::LessOrEqual
            | Self::Greater
            | Self::GreaterOrEqual
            | Self::Equals
            | Self::NotEquals
            | Self::Plus
            | Self::Minus
            | Self::Mod
            | Self::Mult
            | Self::Div
            | Self::Pow => 2,
            Self::Rand => 0,
            _ => 1,
        }
    }

    /// Returns `true` for postfix operators, which the sorter appends to the
    /// output directly instead of pushing onto the operator stack.
    #[must_use]
    pub const fn is_right_hand(self) -> bool {
        matches!(self, Self::Factorial)
    }

    /// Returns `true` if the operator's result is forwarded to the console
    /// sink after every application.
    #[must_use]
    pub const fn does_print(self) -> bool {
        matches!(self, Self::Print | Self::Println)
    }

    /// Applies the operator to its arguments and produces a new value.
    ///
    /// Missing or wrongly-typed arguments never fail: each operator
    /// substitutes a neutral default (zero, one or `false`) so evaluation
    /// always terminates with *some* value. Division that cannot be
    /// represented yields the `Boolean(false)` sentinel instead of an
    /// error; this exact behavior is relied upon by existing scripts.
    ///
    /// # Parameters
    /// - `args`: Operand values, `self.arity()` of them.
    /// - `line`: Source line for error reporting.
    ///
    /// # Errors
    /// [`RuntimeError::NotRepresentable`] when a transcendental operation
    /// has no finite result (e.g. `ln 0`) or a modulo divides by zero. The
    /// runner catches these at the formula boundary.
    ///
    /// # Example
    /// ```
    /// use bloq::interpreter::{token::Op, value::ValueType};
    ///
    /// let sum = Op::Plus.calculate(&[ValueType::from(2), ValueType::from(3)], 1).unwrap();
    /// assert_eq!(sum.to_text(), "5");
    ///
    /// // `+` concatenates as soon as either side is text.
    /// let text = Op::Plus.calculate(&[ValueType::from("n="), ValueType::from(7)], 1).unwrap();
    /// assert_eq!(text.to_text(), "n=7");
    ///
    /// // An unrepresentable quotient is the `false` sentinel, not an error.
    /// let div = Op::Div.calculate(&[ValueType::from(1), ValueType::from(0)], 1).unwrap();
    /// assert_eq!(div, ValueType::Boolean(false));
    /// ```
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn calculate(self, args: &[ValueType], line: usize) -> EvalResult<ValueType> {
        let lhs = args.first();
        let rhs = args.get(1);

        match self {
            Self::Or => {
                let l = lhs.is_some_and(ValueType::to_boolean);
                let r = rhs.is_some_and(ValueType::to_boolean);
                Ok(ValueType::Boolean(l || r))
            },
            Self::And => {
                let l = lhs.is_some_and(ValueType::to_boolean);
                let r = rhs.is_some_and(ValueType::to_boolean);
                Ok(ValueType::Boolean(l && r))
            },
            Self::Less => Ok(ValueType::Boolean(decimal_arg(lhs) < decimal_arg(rhs))),
            Self::LessOrEqual => Ok(ValueType::Boolean(decimal_arg(lhs) <= decimal_arg(rhs))),
            Self::Greater => Ok(ValueType::Boolean(decimal_arg(lhs) > decimal_arg(rhs))),
            Self::GreaterOrEqual => Ok(ValueType::Boolean(decimal_arg(lhs) >= decimal_arg(rhs))),
            Self::Equals => Ok(ValueType::Boolean(values_equal(lhs, rhs))),
            Self::NotEquals => Ok(ValueType::Boolean(!values_equal(lhs, rhs))),
            Self::Plus => {
                if lhs.is_some_and(ValueType::is_text) || rhs.is_some_and(ValueType::is_text) {
                    let l = lhs.map(ValueType::to_text).unwrap_or_default();
                    let r = rhs.map(ValueType::to_text).unwrap_or_default();
                    return Ok(ValueType::Text(l + &r));
                }
                Ok(ValueType::Decimal(decimal_arg(lhs) + decimal_arg(rhs)))
            },
            Self::Minus => Ok(ValueType::Decimal(decimal_arg(lhs) - decimal_arg(rhs))),
            Self::Mod => {
                let divisor = decimal_arg(rhs);
                if divisor.is_zero() {
                    return Err(RuntimeError::NotRepresentable { operation: "%", line });
                }
                Ok(ValueType::Decimal(decimal_arg(lhs) % divisor))
            },
            Self::Mult => Ok(ValueType::Decimal(decimal_arg(lhs) * decimal_arg(rhs))),
            Self::Div => {
                let l = lhs.map_or(0.0, ValueType::to_f64);
                let r = rhs.map_or(1.0, ValueType::to_f64);
                // A quotient with no decimal representation signals failure
                // with the `false` sentinel, never an error.
                Ok(BigDecimal::from_f64(l / r)
                    .map_or(ValueType::Boolean(false), |q| {
                        ValueType::Decimal(decimal::quantize(&q))
                    }))
            },
            Self::Pow => {
                let l = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                let r = rhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                Ok(ValueType::Decimal(decimal::pow(&l, &r, line)?))
            },
            Self::Sqrt => {
                let x = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                let half = BigDecimal::from_f64(0.5).unwrap_or_else(BigDecimal::zero);
                Ok(ValueType::Decimal(decimal::pow(&x, &half, line)?))
            },
            Self::UnaryMinus => Ok(ValueType::Decimal(-decimal_arg(lhs))),
            Self::Factorial => {
                let x = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                Ok(ValueType::Decimal(decimal::factorial(&x)))
            },
            Self::Sin => Ok(ValueType::Decimal(decimal::sin(&decimal_arg(lhs), line)?)),
            Self::Cos => Ok(ValueType::Decimal(decimal::cos(&decimal_arg(lhs), line)?)),
            Self::Tan => Ok(ValueType::Decimal(decimal::tan(&decimal_arg(lhs), line)?)),
            Self::Ln => {
                let x = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                Ok(ValueType::Decimal(decimal::ln(&x, line)?))
            },
            Self::Lg => {
                let x = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                Ok(ValueType::Decimal(decimal::lg(&x, line)?))
            },
            Self::Int => {
                let x = lhs.map_or_else(BigDecimal::one, ValueType::to_decimal);
                Ok(ValueType::Decimal(decimal::floor(&x)))
            },
            Self::Abs => Ok(ValueType::Decimal(decimal_arg(lhs).abs())),
            Self::Print => Ok(lhs.cloned().unwrap_or_else(|| ValueType::Text(String::new()))),
            Self::Println => {
                let text = lhs.map(ValueType::to_text).unwrap_or_default();
                Ok(ValueType::Text(text + "\n"))
            },
            Self::Sleep => {
                let seconds = lhs.map_or(0.0, ValueType::to_f64);
                if seconds.is_finite() && seconds > 0.0 {
                    thread::sleep(Duration::from_millis((seconds * 1000.0) as u64));
                }
                Ok(lhs.cloned().unwrap_or(ValueType::Undefined))
            },
            Self::Rand => {
                let sample = rand::random::<f64>();
                Ok(BigDecimal::from_f64(sample)
                    .map_or(ValueType::Undefined, ValueType::Decimal))
            },
        }
    }

    /// The primary symbol of the operator, as used when rendering a formula
    /// back to text.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equals => "==",
            Self::NotEquals => "!=",
            Self::Plus => "+",
            Self::Minus | Self::UnaryMinus => "-",
            Self::Mod => "%",
            Self::Mult => "*",
            Self::Div => "/",
            Self::Pow => "^",
            Self::Sqrt => "sqrt",
            Self::Factorial => "!",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Ln => "ln",
            Self::Lg => "lg",
            Self::Int => "int",
            Self::Abs => "abs",
            Self::Print => "print",
            Self::Println => "println",
            Self::Sleep => "sleep",
            Self::Rand => "rand",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

fn decimal_arg(arg: Option<&ValueType>) -> BigDecimal {
    arg.map_or_else(BigDecimal::zero, ValueType::to_decimal)
}

/// Equality with text awareness: two text values compare as strings, every
/// other combination compares numerically.
fn values_equal(lhs: Option<&ValueType>, rhs: Option<&ValueType>) -> bool {
    match (lhs, rhs) {
        (Some(ValueType::Text(l)), Some(ValueType::Text(r))) => l == r,
        _ => decimal_arg(lhs) == decimal_arg(rhs),
    }
}
