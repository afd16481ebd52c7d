//! Numeric literal parsers.
//!
//! Each parser matches the textual shape of the literal first and then converts the matched text
//! with the standard library's exact conversions. A literal that has the right shape but does not
//! fit the target type fails with a [`LiteralError`] cause instead of wrapping or saturating.

use std::{error::Error, fmt};
use super::{
    input::Input,
    parser::{Parser, ParserExt},
    primitive::{char, char_ignore_case},
    text::digits,
};

/// A literal could not be represented in the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralError {
    /// The integer does not fit.
    IntegerOverflow,

    /// The floating-point value is too large to be finite.
    FloatOverflow,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegerOverflow => write!(f, "Integer overflow"),
            Self::FloatOverflow => write!(f, "Floating point number overflow"),
        }
    }
}

impl Error for LiteralError {}

/// An optional `+` or `-`.
fn sign<I: Input<Item = char>>() -> impl Parser<I, Option<char>> {
    char('+').or(char('-')).optional()
}

/// Matches an unsigned decimal literal: digits, an optional fraction and an optional exponent,
/// such as `12`, `0.25` or `6.02e23`. Yields the matched text.
pub fn decimal_text<I: Input<Item = char>>() -> impl Parser<I, String> {
    let fraction = char('.').and(digits());
    let exponent = char_ignore_case('e').and(sign()).and(digits());
    digits()
        .and(fraction.optional())
        .and(exponent.optional())
        .as_text()
        .with_message("Number expected")
}

/// Matches a decimal literal with an optional leading sign. Yields the matched text.
pub fn number_text<I: Input<Item = char>>() -> impl Parser<I, String> {
    sign().and(decimal_text()).as_text()
}

/// Matches an integer with an optional leading sign. Yields the matched text.
fn integer_text<I: Input<Item = char>>() -> impl Parser<I, String> {
    sign().and(digits()).as_text().with_message("Integer expected")
}

/// Parses an `i32`.
pub fn int32<I: Input<Item = char>>() -> impl Parser<I, i32> {
    integer_text().try_map(|text| text.parse::<i32>().map_err(|_| LiteralError::IntegerOverflow))
}

/// Parses an `i64`.
pub fn int64<I: Input<Item = char>>() -> impl Parser<I, i64> {
    integer_text().try_map(|text| text.parse::<i64>().map_err(|_| LiteralError::IntegerOverflow))
}

/// Parses an `f32`. Values too large to be finite are rejected.
pub fn float<I: Input<Item = char>>() -> impl Parser<I, f32> {
    number_text().try_map(|text| match text.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LiteralError::FloatOverflow),
    })
}

/// Parses an `f64`. Values too large to be finite are rejected.
pub fn double<I: Input<Item = char>>() -> impl Parser<I, f64> {
    number_text().try_map(|text| match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LiteralError::FloatOverflow),
    })
}
