use std::str::FromStr;

use bigdecimal::BigDecimal;
use bloq::util::decimal::{factorial, floor, lg, ln, pow, quantize, round_fractional, sin, tan};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap_or_else(|e| panic!("bad literal {s}: {e}"))
}

#[test]
fn integer_powers_are_exact() {
    assert_eq!(pow(&dec("2"), &dec("64"), 1).unwrap(),
               dec("18446744073709551616"));
    assert_eq!(pow(&dec("10"), &dec("30"), 1).unwrap(),
               dec("1000000000000000000000000000000"));
    assert_eq!(pow(&dec("-3"), &dec("3"), 1).unwrap(), dec("-27"));
    assert_eq!(pow(&dec("7"), &dec("0"), 1).unwrap(), dec("1"));
}

#[test]
fn zero_base_short_circuits() {
    assert_eq!(pow(&dec("0"), &dec("5"), 1).unwrap(), dec("0"));
    assert_eq!(pow(&dec("0"), &dec("-1"), 1).unwrap(), dec("0"));
}

#[test]
fn negative_integer_exponents_use_the_reciprocal() {
    assert_eq!(pow(&dec("2"), &dec("-2"), 1).unwrap(), dec("0.25"));
    assert_eq!(pow(&dec("4"), &dec("-1"), 1).unwrap(), dec("0.25"));
    assert_eq!(pow(&dec("3"), &dec("-2"), 1).unwrap().to_plain_string(),
               "0.11111111111111");
}

#[test]
fn fractional_exponents_requantize() {
    assert_eq!(pow(&dec("2"), &dec("0.5"), 1).unwrap().to_plain_string(),
               "1.4142135623731");
    assert_eq!(pow(&dec("16"), &dec("0.5"), 1).unwrap(), dec("4"));
}

#[test]
fn a_negative_base_with_a_fractional_exponent_is_an_error() {
    assert!(pow(&dec("-4"), &dec("0.5"), 7).is_err());
}

#[test]
fn trig_results_are_rounded_clean() {
    // sin π would be ~1.2e-16 in raw floating point.
    let pi = dec(bloq::util::decimal::PI_LITERAL);
    assert_eq!(sin(&pi, 1).unwrap(), dec("0"));
    assert_eq!(sin(&dec("0"), 1).unwrap(), dec("0"));
    assert_eq!(tan(&dec("0"), 1).unwrap(), dec("0"));
}

#[test]
fn trig_reduces_its_argument_modulo_two_pi() {
    let two_pi = dec(bloq::util::decimal::PI_LITERAL) * dec("2");
    let shifted = &dec("1") + &two_pi;
    assert_eq!(sin(&shifted, 1).unwrap(), sin(&dec("1"), 1).unwrap());
}

#[test]
fn logarithms_round_to_fourteen_fractional_digits() {
    assert_eq!(ln(&dec("1"), 1).unwrap(), dec("0"));
    assert_eq!(lg(&dec("1000"), 1).unwrap(), dec("3"));
    assert_eq!(ln(&dec("2"), 1).unwrap().to_plain_string(), "0.69314718055995");
}

#[test]
fn logarithms_of_non_positive_values_are_errors() {
    assert!(ln(&dec("0"), 3).is_err());
    assert!(ln(&dec("-1"), 3).is_err());
    assert!(lg(&dec("0"), 3).is_err());
}

#[test]
fn quantize_keeps_fourteen_significant_digits() {
    assert_eq!(quantize(&dec("123456789012345678")).to_plain_string(),
               "123456789012350000");
    assert_eq!(quantize(&dec("0.125")).to_plain_string(), "0.125");
}

#[test]
fn round_fractional_keeps_fourteen_fractional_digits() {
    assert_eq!(round_fractional(&dec("0.123456789012345678")).to_plain_string(),
               "0.12345678901235");
    assert_eq!(round_fractional(&dec("2.5")), dec("2.5"));
}

#[test]
fn floor_rounds_toward_negative_infinity() {
    assert_eq!(floor(&dec("2.7")), dec("2"));
    assert_eq!(floor(&dec("-2.3")), dec("-3"));
    assert_eq!(floor(&dec("5")), dec("5"));
}

#[test]
fn factorials() {
    assert_eq!(factorial(&dec("0")), dec("1"));
    assert_eq!(factorial(&dec("1")), dec("1"));
    assert_eq!(factorial(&dec("5")), dec("120"));
    assert_eq!(factorial(&dec("20")), dec("2432902008176640000"));
    // The integer part drives the computation.
    assert_eq!(factorial(&dec("5.9")), dec("120"));
}
