/// Runtime errors.
///
/// Contains the error types that can be raised while a formula is being
/// evaluated: unresolved variables, missing operands, values that cannot be
/// represented as decimals. These errors never escape the interpreter; the
/// runner catches them at the formula boundary, reports them through the
/// console sink and continues with `Undefined`.
pub mod runtime_error;

pub use runtime_error::RuntimeError;
