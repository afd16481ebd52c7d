//! Conversions between [`Rational`] and the primitive numeric types and strings.

use rug::{Float, Integer};
use std::str::FromStr;
use thiserror::Error;
use super::Rational;

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Rational {
                fn from(value: $ty) -> Self {
                    Rational::integer(value)
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, Integer);

/// Builds the exact value `(-1)^negative * mantissa * 2^exponent` from the fields of an IEEE-754
/// binary number.
///
/// `bias` is the exponent bias plus the number of explicit mantissa bits, so that a normal number
/// is `(mantissa | implicit bit) * 2^(exponent - bias)`.
fn from_binary_parts(
    negative: bool,
    exponent: i64,
    mantissa: u64,
    max_exponent: i64,
    bias: i64,
    mantissa_bits: u32,
) -> Rational {
    if exponent == max_exponent {
        return match (mantissa, negative) {
            (0, false) => Rational::infinity(),
            (0, true) => Rational::neg_infinity(),
            _ => Rational::nan(),
        };
    }

    // subnormal numbers have no implicit bit and the smallest exponent
    let (mantissa, exponent) = if exponent == 0 {
        (mantissa, 1 - bias)
    } else {
        (mantissa | 1 << mantissa_bits, exponent - bias)
    };

    let mut dividend = Integer::from(mantissa);
    let mut divisor = Integer::from(1);
    if exponent >= 0 {
        dividend <<= exponent as u32;
    } else {
        divisor <<= exponent.unsigned_abs() as u32;
    }
    if negative {
        dividend = -dividend;
    }

    Rational::reduced(dividend, divisor)
}

impl Rational {
    /// Converts an `f64` exactly, by decomposing its bit pattern.
    pub fn from_f64(value: f64) -> Self {
        let bits = value.to_bits();
        from_binary_parts(
            bits >> 63 != 0,
            ((bits >> 52) & 0x7ff) as i64,
            bits & ((1 << 52) - 1),
            0x7ff,
            1075,
            52,
        )
    }

    /// Converts an `f32` exactly, by decomposing its bit pattern.
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        from_binary_parts(
            bits >> 31 != 0,
            ((bits >> 23) & 0xff) as i64,
            (bits & ((1 << 23) - 1)) as u64,
            0xff,
            150,
            23,
        )
    }

    /// Rounds the finite value to the nearest binary float with `precision` bits of mantissa.
    fn to_float(&self, precision: u32) -> Float {
        let exact = rug::Rational::from((self.dividend.clone(), self.divisor.clone()));
        Float::with_val(precision, &exact)
    }

    /// Converts to the nearest `f64`. Values that came from an `f64` convert back exactly.
    pub fn to_f64(&self) -> f64 {
        if self.is_nan() {
            f64::NAN
        } else if self.is_infinite() {
            if self.is_negative() { f64::NEG_INFINITY } else { f64::INFINITY }
        } else {
            self.to_float(f64::MANTISSA_DIGITS).to_f64()
        }
    }

    /// Converts to the nearest `f32`. Values that came from an `f32` convert back exactly.
    pub fn to_f32(&self) -> f32 {
        if self.is_nan() {
            f32::NAN
        } else if self.is_infinite() {
            if self.is_negative() { f32::NEG_INFINITY } else { f32::INFINITY }
        } else {
            self.to_float(f32::MANTISSA_DIGITS).to_f32()
        }
    }
}

impl From<f64> for Rational {
    fn from(value: f64) -> Self {
        Rational::from_f64(value)
    }
}

impl From<f32> for Rational {
    fn from(value: f32) -> Self {
        Rational::from_f32(value)
    }
}

/// The string is not a valid [`Rational`] literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a valid rational number")]
pub struct ParseRationalError(String);

/// Parses an optionally signed run of ASCII digits.
fn parse_integer(text: &str) -> Option<Integer> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The largest power of ten a decimal literal may scale by, as in `1e100000`.
const MAX_DECIMAL_SCALE: u64 = 100_000;

/// Parses a decimal literal such as `-12.5e-3` into its exact value. Literals whose exponent
/// moves the decimal point by more than [`MAX_DECIMAL_SCALE`] places are rejected.
fn parse_decimal(text: &str) -> Option<Rational> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], unsigned[at + 1..].parse::<i32>().ok()?),
        None => (unsigned, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut dividend: Integer = format!("{}{}", whole, fraction).parse().ok()?;
    if negative {
        dividend = -dividend;
    }

    let scale = exponent as i64 - fraction.len() as i64;
    if scale.unsigned_abs() > MAX_DECIMAL_SCALE {
        return None;
    }
    let power = Integer::from(Integer::u_pow_u(10, u32::try_from(scale.unsigned_abs()).ok()?));
    Some(if scale >= 0 {
        Rational::integer(dividend * power)
    } else {
        Rational::reduced(dividend, power)
    })
}

/// Accepts `n`, `n/d`, decimal literals with an optional exponent, `NaN`, `Infinity` and
/// `-Infinity`.
impl FromStr for Rational {
    type Err = ParseRationalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parsed = match text {
            "NaN" => Some(Rational::nan()),
            "Infinity" | "+Infinity" => Some(Rational::infinity()),
            "-Infinity" => Some(Rational::neg_infinity()),
            _ => match text.split_once('/') {
                Some((dividend, divisor)) => parse_integer(dividend.trim())
                    .zip(parse_integer(divisor.trim()))
                    .map(|(dividend, divisor)| Rational::reduced(dividend, divisor)),
                None => parse_decimal(text),
            },
        };
        parsed.ok_or_else(|| ParseRationalError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn float_decomposition_is_exact() {
        assert_eq!(Rational::from_f64(0.5), Rational::new(1, 2));
        assert_eq!(Rational::from_f64(-3.0), Rational::integer(-3));
        assert_eq!(Rational::from_f64(0.1), Rational::new(3602879701896397u64, 36028797018963968u64));
        assert_eq!(Rational::from_f32(0.1), Rational::new(13421773, 134217728));
        assert_eq!(Rational::from_f64(-0.0), Rational::zero());
    }

    #[test]
    fn float_sentinels() {
        assert_eq!(Rational::from(f64::INFINITY), Rational::infinity());
        assert_eq!(Rational::from(f32::NEG_INFINITY), Rational::neg_infinity());
        assert!(Rational::from(f64::NAN).is_nan());
        assert!(Rational::nan().to_f64().is_nan());
        assert_eq!(Rational::neg_infinity().to_f32(), f32::NEG_INFINITY);
    }

    #[test]
    fn subnormals() {
        let smallest = f64::from_bits(1);
        let exact = Rational::from_f64(smallest);
        assert_eq!(exact.dividend(), &1);
        assert_eq!(exact.divisor(), &Integer::from(Integer::u_pow_u(2, 1074)));
        assert_eq!(exact.to_f64().to_bits(), 1);

        let smallest = f32::from_bits(1);
        assert_eq!(Rational::from_f32(smallest).to_f32().to_bits(), 1);
    }

    #[test]
    fn round_trips_are_bit_identical() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let value = f64::from_bits(rng.gen::<u64>());
            if value.is_finite() {
                assert_eq!(Rational::from_f64(value).to_f64().to_bits(), value.to_bits());
            }

            let value = f32::from_bits(rng.gen::<u32>());
            if value.is_finite() {
                assert_eq!(Rational::from_f32(value).to_f32().to_bits(), value.to_bits());
            }
        }

        for value in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, f64::EPSILON, 1.0, -1.0] {
            assert_eq!(Rational::from_f64(value).to_f64(), value);
        }
    }

    #[test]
    fn nearest_rounding() {
        assert_eq!(Rational::new(1, 3).to_f64(), 1.0 / 3.0);
        assert_eq!(Rational::new(2, 3).to_f32(), 2.0f32 / 3.0);
    }

    #[test]
    fn parse_strings() {
        assert_eq!("25.2".parse::<Rational>().unwrap(), Rational::new(126, 5));
        assert_eq!("-12.5e-3".parse::<Rational>().unwrap(), Rational::new(-1, 80));
        assert_eq!("3e2".parse::<Rational>().unwrap(), Rational::integer(300));
        assert_eq!("-6/8".parse::<Rational>().unwrap(), Rational::new(-3, 4));
        assert_eq!(" 7 ".parse::<Rational>().unwrap(), Rational::integer(7));
        assert_eq!(".5".parse::<Rational>().unwrap(), Rational::new(1, 2));
        assert_eq!("-Infinity".parse::<Rational>().unwrap(), Rational::neg_infinity());
        assert!("NaN".parse::<Rational>().unwrap().is_nan());

        for bad in ["", ".", "1/", "x", "1.2.3", "1e", "--1", "1/2/3", "1e2000000000", "1e99999999999"] {
            assert_eq!(bad.parse::<Rational>(), Err(ParseRationalError(bad.to_string())));
        }
    }

    #[test]
    fn decimal_scale_is_bounded() {
        let largest = "1e100000".parse::<Rational>().unwrap();
        assert_eq!(largest.dividend(), &Integer::from(Integer::u_pow_u(10, 100_000)));
        let smallest = "0.5e-99999".parse::<Rational>().unwrap();
        assert_eq!(smallest.divisor(), &(Integer::from(Integer::u_pow_u(10, 100_000)) / 5));

        assert!("1e100001".parse::<Rational>().is_err());
        assert!("1e-100001".parse::<Rational>().is_err());
        assert!("0.000001e-99995".parse::<Rational>().is_err());
    }

    #[test]
    fn display_parse_agree() {
        for value in [Rational::new(-7, 3), Rational::integer(42), Rational::infinity()] {
            assert_eq!(value.to_string().parse::<Rational>().unwrap(), value);
        }
    }
}
