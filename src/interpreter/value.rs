use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive, Zero};

/// Represents a runtime value in the interpreter.
///
/// This enum models every type a script expression can produce: assignments,
/// operator results, condition results and console output all carry a
/// `ValueType`. There is deliberately no fifth kind; every operator maps
/// values onto this set.
///
/// `Decimal` and `Boolean` are the *numeric* variants: both support
/// arithmetic, ordering and boolean coercion (a boolean acts as `1`/`0`).
/// `Text` supports only concatenation and equality. `Undefined` is the
/// sentinel produced whenever an operation cannot yield a meaningful result;
/// it is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    /// The result of an operation that could not produce a meaningful value.
    Undefined,
    /// A text value, produced by string literals and concatenation.
    Text(String),
    /// An arbitrary-precision decimal number.
    Decimal(BigDecimal),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison operators (`<`, `==`, `!=`, etc.) and logical
    /// operations (`&&`, `||`). Participates in arithmetic as `1`/`0`.
    Boolean(bool),
}

impl From<BigDecimal> for ValueType {
    fn from(d: BigDecimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<bool> for ValueType {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for ValueType {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ValueType {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ValueType {
    fn from(n: i64) -> Self {
        Self::Decimal(BigDecimal::from(n))
    }
}

impl ValueType {
    /// Converts the value to a decimal for arithmetic.
    ///
    /// Booleans coerce to `1`/`0`. Text is parsed as a number where possible
    /// and coerces to `0` otherwise. `Undefined` coerces to `0`; operators
    /// never receive it in practice because variable resolution rejects
    /// undefined bindings before evaluation.
    ///
    /// # Returns
    /// The decimal rendition of the value.
    ///
    /// # Example
    /// ```
    /// use bigdecimal::BigDecimal;
    /// use bloq::interpreter::value::ValueType;
    ///
    /// assert_eq!(ValueType::Boolean(true).to_decimal(), BigDecimal::from(1));
    /// assert_eq!(ValueType::from("2.5").to_decimal().to_plain_string(), "2.5");
    /// assert_eq!(ValueType::from("not a number").to_decimal(), BigDecimal::from(0));
    /// ```
    #[must_use]
    pub fn to_decimal(&self) -> BigDecimal {
        match self {
            Self::Decimal(d) => d.clone(),
            Self::Boolean(true) => 1.into(),
            Self::Boolean(false) | Self::Undefined => BigDecimal::zero(),
            Self::Text(s) => s.parse::<f64>()
                              .ok()
                              .and_then(BigDecimal::from_f64)
                              .unwrap_or_else(BigDecimal::zero),
        }
    }
    /// Converts the value to an `f64` for the transcendental operations that
    /// cannot stay in decimal arithmetic.
    ///
    /// Unparseable text yields `NaN`, mirroring the decimal coercion rules.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
            Self::Boolean(true) => 1.0,
            Self::Boolean(false) | Self::Undefined => 0.0,
            Self::Text(s) => s.parse().unwrap_or(f64::NAN),
        }
    }
    /// Converts the value to a boolean.
    ///
    /// A decimal is truthy when non-zero. Text and `Undefined` are always
    /// falsy; only numeric values can steer control flow.
    #[must_use]
    pub fn to_boolean(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Decimal(d) => !d.is_zero(),
            Self::Text(_) | Self::Undefined => false,
        }
    }
    /// Renders the value the way the console prints it.
    ///
    /// Decimals drop trailing zeros and always use plain (non-exponent)
    /// notation, so `1.2300` prints as `1.23` and `1E+2` as `100`.
    ///
    /// # Example
    /// ```
    /// use bloq::interpreter::value::ValueType;
    ///
    /// let trailing = ValueType::parse_decimal("1.2300").unwrap();
    /// assert_eq!(trailing.to_text(), "1.23");
    ///
    /// assert_eq!(ValueType::Undefined.to_text(), "undefined");
    /// assert_eq!(ValueType::Boolean(false).to_text(), "false");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Undefined => "undefined".to_string(),
            Self::Text(s) => s.clone(),
            Self::Decimal(d) => d.normalized().to_plain_string(),
            Self::Boolean(true) => "true".to_string(),
            Self::Boolean(false) => "false".to_string(),
        }
    }

    /// Returns `true` if the value is [`Text`].
    ///
    /// [`Text`]: ValueType::Text
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(..))
    }

    /// Returns `true` if the value is numeric, i.e. [`Decimal`] or
    /// [`Boolean`]. Only numeric values may drive conditions and loops.
    ///
    /// [`Decimal`]: ValueType::Decimal
    /// [`Boolean`]: ValueType::Boolean
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Decimal(..) | Self::Boolean(..))
    }

    /// Returns `true` if the value is [`Undefined`].
    ///
    /// [`Undefined`]: ValueType::Undefined
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Parses a decimal literal from source text.
    ///
    /// Only plain `digits[.digits]` forms are produced by the lexer, so the
    /// conversion cannot fail for lexed input; `None` is returned for
    /// anything else.
    #[must_use]
    pub fn parse_decimal(text: &str) -> Option<Self> {
        BigDecimal::from_str(text).ok().map(Self::Decimal)
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
