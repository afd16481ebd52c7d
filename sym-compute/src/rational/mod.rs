//! Exact arbitrary-precision fractions.
//!
//! A [`Rational`] is a pair of [`Integer`]s, `dividend / divisor`, kept in lowest terms with a
//! non-negative divisor. Three extra states are encoded with a zero divisor:
//!
//! | dividend | divisor | value       |
//! | -------- | ------- | ----------- |
//! | `1`      | `0`     | `Infinity`  |
//! | `-1`     | `0`     | `-Infinity` |
//! | `0`      | `0`     | `NaN`       |
//!
//! Every constructor reduces its input, so the pair is canonical. Because of this, arithmetic on
//! the sentinel states falls out of the ordinary fraction formulas: `Infinity - Infinity` computes
//! `0 / 0`, which is `NaN`, and `5 / 0` computes `5 / 0`, which clamps to `Infinity`.
//!
//! Equality compares the canonical pair, except that `NaN` is never equal to anything, itself
//! included. For use in containers, [`Rational::total_cmp`] orders `NaN` before every other value.

mod convert;
mod ops;

pub use convert::ParseRationalError;

use rug::{ops::Pow, Float, Integer};
use std::{cmp::Ordering, fmt};

/// The number of bits of precision used for the lossy logarithms.
const LOG_PRECISION: u32 = 1 << 7;

/// The largest dividend or divisor, in bits, that [`Rational::checked_pow`] will compute. This is
/// a little over 300 000 decimal digits.
pub const MAX_POWER_BITS: u64 = 1 << 20;

/// An exact fraction over arbitrary-precision integers, with `Infinity`, `-Infinity` and `NaN`
/// sentinel states.
///
/// See the [module-level documentation](self) for the representation.
#[derive(Debug, Clone, Hash)]
pub struct Rational {
    dividend: Integer,
    divisor: Integer,
}

impl Rational {
    /// Creates the fraction `dividend / divisor` in lowest terms.
    ///
    /// A zero divisor produces `Infinity`, `-Infinity` or `NaN` depending on the sign of the
    /// dividend.
    pub fn new(dividend: impl Into<Integer>, divisor: impl Into<Integer>) -> Self {
        Self::reduced(dividend.into(), divisor.into())
    }

    /// Reduces the pair by its greatest common divisor and moves the sign onto the dividend.
    pub(crate) fn reduced(mut dividend: Integer, mut divisor: Integer) -> Self {
        if divisor.is_zero() {
            let sign = dividend.cmp0() as i32;
            return Self { dividend: Integer::from(sign), divisor };
        }

        if divisor.is_negative() {
            dividend = -dividend;
            divisor = -divisor;
        }

        let gcd = Integer::from(dividend.gcd_ref(&divisor));
        if gcd > 1 {
            dividend.div_exact_mut(&gcd);
            divisor.div_exact_mut(&gcd);
        }

        Self { dividend, divisor }
    }

    /// Creates an integral value.
    pub fn integer(value: impl Into<Integer>) -> Self {
        Self { dividend: value.into(), divisor: Integer::from(1) }
    }

    pub fn zero() -> Self {
        Self::integer(0)
    }

    pub fn one() -> Self {
        Self::integer(1)
    }

    pub fn nan() -> Self {
        Self { dividend: Integer::new(), divisor: Integer::new() }
    }

    pub fn infinity() -> Self {
        Self { dividend: Integer::from(1), divisor: Integer::new() }
    }

    pub fn neg_infinity() -> Self {
        Self { dividend: Integer::from(-1), divisor: Integer::new() }
    }

    /// The numerator of the canonical pair.
    pub fn dividend(&self) -> &Integer {
        &self.dividend
    }

    /// The denominator of the canonical pair. Zero only for the sentinel states.
    pub fn divisor(&self) -> &Integer {
        &self.divisor
    }

    pub fn is_zero(&self) -> bool {
        self.dividend.is_zero() && !self.divisor.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.dividend == 1 && self.divisor == 1
    }

    pub fn is_nan(&self) -> bool {
        self.dividend.is_zero() && self.divisor.is_zero()
    }

    /// Returns true for `Infinity` and `-Infinity`.
    pub fn is_infinite(&self) -> bool {
        self.divisor.is_zero() && !self.dividend.is_zero()
    }

    /// Returns true for every value that is neither infinite nor `NaN`.
    pub fn is_finite(&self) -> bool {
        !self.divisor.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.divisor == 1
    }

    /// Returns true for negative values, `-Infinity` included.
    pub fn is_negative(&self) -> bool {
        self.dividend.is_negative()
    }

    /// Returns `-1`, `0` or `1`. `NaN` has a sign of `0`.
    pub fn signum(&self) -> i32 {
        self.dividend.cmp0() as i32
    }

    /// If the value is an integer that fits in an `i32`, returns it.
    pub fn to_i32(&self) -> Option<i32> {
        if self.is_integer() {
            self.dividend.to_i32()
        } else {
            None
        }
    }

    /// Returns `1 / self`.
    pub fn recip(&self) -> Self {
        Self::reduced(self.divisor.clone(), self.dividend.clone())
    }

    pub fn abs(&self) -> Self {
        Self { dividend: self.dividend.clone().abs(), divisor: self.divisor.clone() }
    }

    /// Raises the value to an integer power. A negative exponent inverts the base first, and any
    /// value raised to `0` is `1`.
    pub fn pow(&self, exponent: i32) -> Self {
        if exponent == 0 {
            return Self::one();
        }

        let base = if exponent < 0 { self.recip() } else { self.clone() };
        let n = exponent.unsigned_abs();
        Self::reduced(base.dividend.pow(n), base.divisor.pow(n))
    }

    /// Like [`Rational::pow`], but returns `None` instead of computing a dividend or divisor of
    /// more than [`MAX_POWER_BITS`] bits.
    pub fn checked_pow(&self, exponent: i32) -> Option<Self> {
        let bits = self.dividend.significant_bits().max(self.divisor.significant_bits());
        let estimate = u64::from(bits.saturating_sub(1)) * u64::from(exponent.unsigned_abs());
        (estimate <= MAX_POWER_BITS).then(|| self.pow(exponent))
    }

    /// The smaller of the two values. `NaN` is returned if either side is `NaN`.
    pub fn min(&self, other: &Self) -> Self {
        match self.partial_cmp(other) {
            Some(Ordering::Greater) => other.clone(),
            Some(_) => self.clone(),
            None => Self::nan(),
        }
    }

    /// The larger of the two values. `NaN` is returned if either side is `NaN`.
    pub fn max(&self, other: &Self) -> Self {
        match self.partial_cmp(other) {
            Some(Ordering::Less) => other.clone(),
            Some(_) => self.clone(),
            None => Self::nan(),
        }
    }

    /// The natural logarithm, as a floating-point approximation.
    pub fn ln(&self) -> f64 {
        if self.is_nan() || self.is_negative() {
            return f64::NAN;
        }
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        if self.is_infinite() {
            return f64::INFINITY;
        }

        let dividend = Float::with_val(LOG_PRECISION, &self.dividend).ln();
        let divisor = Float::with_val(LOG_PRECISION, &self.divisor).ln();
        (dividend - divisor).to_f64()
    }

    /// The logarithm in the given base, as a floating-point approximation.
    pub fn log(&self, base: &Self) -> f64 {
        self.ln() / base.ln()
    }

    /// Orders every value, with `NaN` first, then `-Infinity`, the finite values and `Infinity`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        fn rank(value: &Rational) -> u8 {
            match (value.is_finite(), value.signum()) {
                (true, _) => 2,
                (false, 0) => 0,
                (false, sign) if sign < 0 => 1,
                (false, _) => 3,
            }
        }

        match (rank(self), rank(other)) {
            (2, 2) => {
                let lhs = Integer::from(&self.dividend * &other.divisor);
                let rhs = Integer::from(&other.dividend * &self.divisor);
                lhs.cmp(&rhs)
            },
            (lhs, rhs) => lhs.cmp(&rhs),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        !self.is_nan() && self.dividend == other.dividend && self.divisor == other.divisor
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            None
        } else {
            Some(self.total_cmp(other))
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nan() {
            write!(f, "NaN")
        } else if self.is_infinite() {
            if self.is_negative() {
                write!(f, "-Infinity")
            } else {
                write!(f, "Infinity")
            }
        } else if self.is_integer() {
            write!(f, "{}", self.dividend)
        } else {
            write!(f, "{}/{}", self.dividend, self.divisor)
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rational {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rational {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
