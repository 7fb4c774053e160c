/// Decimal math helpers.
///
/// This module implements the numeric contract of the language: arithmetic
/// stays in arbitrary-precision decimals, and the handful of irreducibly
/// transcendental operations (trigonometry, logarithms, non-integer powers)
/// detour through `f64` and are re-quantized to a fixed digit budget so
/// that floating-point noise never leaks into script results.
///
/// # Responsibilities
/// - Exact integer exponentiation and factorials on `BigDecimal`.
/// - Floating-point evaluation plus re-quantization for trig/log/pow.
/// - The rounding primitives (`quantize`, `round_fractional`, `floor`) used
///   by the operator table.
pub mod decimal;
