use std::{num::NonZeroU64, str::FromStr, sync::LazyLock};

use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{FromPrimitive, One, ToPrimitive, Zero};

use crate::{error::RuntimeError, interpreter::runner::EvalResult};

/// The decimal expansion of π used for the `π` literal and trig argument
/// reduction.
pub const PI_LITERAL: &str = "3.1415926535897932384626433832795";

/// Number of significant digits kept when a result has to pass through
/// floating point (division, non-integer powers).
pub const SIGNIFICANT_DIGITS: u64 = 14;
/// Number of fractional digits kept by the transcendental functions
/// (trigonometry and logarithms).
pub const FRACTIONAL_DIGITS: i64 = 14;

static TWO_PI: LazyLock<BigDecimal> = LazyLock::new(|| {
    BigDecimal::from_str(PI_LITERAL).expect("π literal parses") * BigDecimal::from(2)
});

/// Rounds a decimal to the 14-significant-digit context used for results
/// that were computed through floating point.
///
/// This is the decimal analogue of a `MathContext(14, HALF_UP)` and exists
/// to suppress binary floating-point noise in otherwise exact decimal
/// arithmetic.
///
/// # Example
/// ```
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use bloq::util::decimal::quantize;
///
/// let noisy = BigDecimal::from_str("0.333333333333333314829616256247").unwrap();
/// assert_eq!(quantize(&noisy).to_plain_string(), "0.33333333333333");
/// ```
#[must_use]
pub fn quantize(x: &BigDecimal) -> BigDecimal {
    let digits = NonZeroU64::new(SIGNIFICANT_DIGITS).expect("nonzero digit count");
    x.with_precision_round(digits, RoundingMode::HalfUp)
}

/// Rounds a decimal to 14 fractional digits, half up.
///
/// Applied to every trigonometric and logarithmic result so that values
/// such as `sin(π)` come out as `0` instead of `1.2246e-16`.
#[must_use]
pub fn round_fractional(x: &BigDecimal) -> BigDecimal {
    x.with_scale_round(FRACTIONAL_DIGITS, RoundingMode::HalfUp)
}

/// Rounds a decimal down to the nearest integer (floor).
///
/// This backs the `int` builtin: `int 2.7` is `2` and `int -2.3` is `-3`.
///
/// # Example
/// ```
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use bloq::util::decimal::floor;
///
/// let x = BigDecimal::from_str("2.7").unwrap();
/// assert_eq!(floor(&x), BigDecimal::from(2));
///
/// let x = BigDecimal::from_str("-2.3").unwrap();
/// assert_eq!(floor(&x), BigDecimal::from(-3));
/// ```
#[must_use]
pub fn floor(x: &BigDecimal) -> BigDecimal {
    x.with_scale_round(0, RoundingMode::Floor)
}

/// Raises `x` to the power `y`.
///
/// Integer-valued operands stay in exact decimal arithmetic: non-negative
/// integer exponents use repeated squaring, negative integer exponents take
/// the reciprocal of the base first and then exponentiate, quantized to the
/// significant-digit context. A zero base short-circuits to zero. Every
/// other combination is computed through `f64::powf` and re-quantized.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] when the floating-point path
/// produces a non-finite result (e.g. a negative base with a fractional
/// exponent).
///
/// # Example
/// ```
/// use bigdecimal::BigDecimal;
/// use bloq::util::decimal::pow;
///
/// // Integer operands stay exact, far past f64 precision.
/// let big = pow(&BigDecimal::from(2), &BigDecimal::from(100), 1).unwrap();
/// assert_eq!(big.to_plain_string(), "1267650600228229401496703205376");
///
/// // Negative integer exponents go through the reciprocal.
/// let inv = pow(&BigDecimal::from(2), &BigDecimal::from(-2), 1).unwrap();
/// assert_eq!(inv.to_plain_string(), "0.25");
/// ```
pub fn pow(x: &BigDecimal, y: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    if x.is_zero() {
        return Ok(BigDecimal::zero());
    }

    if x.is_integer() && y.is_integer() {
        if let Some(exponent) = y.to_i64() {
            if exponent >= 0 {
                return Ok(int_pow(x, exponent.unsigned_abs()));
            }

            let reciprocal = BigDecimal::one() / x;
            return Ok(quantize(&int_pow(&reciprocal, exponent.unsigned_abs())));
        }
    }

    let value = x.to_f64().unwrap_or(f64::NAN).powf(y.to_f64().unwrap_or(f64::NAN));
    BigDecimal::from_f64(value).map(|d| quantize(&d))
                               .ok_or(RuntimeError::NotRepresentable { operation: "^", line })
}

/// Computes the sine of `x` (radians).
///
/// The argument is reduced modulo 2π in decimal arithmetic before the
/// floating-point evaluation; the result is rounded to 14 fractional
/// digits.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] if the argument does not fit
/// in an `f64`.
pub fn sin(x: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    through_f64(&(x % &*TWO_PI), f64::sin, "sin", line)
}

/// Computes the cosine of `x` (radians). See [`sin`] for the rounding
/// contract.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] if the argument does not fit
/// in an `f64`.
pub fn cos(x: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    through_f64(&(x % &*TWO_PI), f64::cos, "cos", line)
}

/// Computes the tangent of `x` (radians). See [`sin`] for the rounding
/// contract.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] if the argument does not fit
/// in an `f64`.
pub fn tan(x: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    through_f64(&(x % &*TWO_PI), f64::tan, "tan", line)
}

/// Computes the natural logarithm of `x`.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] for non-positive arguments,
/// where the logarithm has no finite value.
pub fn ln(x: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    through_f64(x, f64::ln, "ln", line)
}

/// Computes the base-10 logarithm of `x`.
///
/// # Errors
/// Returns [`RuntimeError::NotRepresentable`] for non-positive arguments.
pub fn lg(x: &BigDecimal, line: usize) -> EvalResult<BigDecimal> {
    through_f64(x, f64::log10, "lg", line)
}

/// Computes the factorial of the integer part of `x`.
///
/// Multiplies `2..=n` in exact decimal arithmetic; values below `2` yield
/// `1`, matching the usual empty-product convention.
///
/// # Example
/// ```
/// use bigdecimal::BigDecimal;
/// use bloq::util::decimal::factorial;
///
/// assert_eq!(factorial(&BigDecimal::from(5)), BigDecimal::from(120));
/// assert_eq!(factorial(&BigDecimal::from(0)), BigDecimal::from(1));
/// ```
#[must_use]
pub fn factorial(x: &BigDecimal) -> BigDecimal {
    let n = x.with_scale_round(0, RoundingMode::Down).to_i64().unwrap_or(0);

    let mut result = BigDecimal::one();
    for i in 2..=n {
        result *= BigDecimal::from(i);
    }

    result
}

fn through_f64(x: &BigDecimal,
               f: fn(f64) -> f64,
               operation: &'static str,
               line: usize)
               -> EvalResult<BigDecimal> {
    let value = f(x.to_f64().unwrap_or(f64::NAN));
    BigDecimal::from_f64(value).map(|d| round_fractional(&d))
                               .ok_or(RuntimeError::NotRepresentable { operation, line })
}

fn int_pow(base: &BigDecimal, mut exponent: u64) -> BigDecimal {
    let mut result = BigDecimal::one();
    let mut factor = base.clone();

    while exponent > 0 {
        if exponent & 1 == 1 {
            result = &result * &factor;
        }
        exponent >>= 1;
        if exponent > 0 {
            factor = &factor * &factor;
        }
    }

    result
}
