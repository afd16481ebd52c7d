//! Arithmetic operators for [`Rational`].
//!
//! Each operator is written once over references; the owned forms forward to it.

use rug::Integer;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use super::Rational;

fn add(lhs: &Rational, rhs: &Rational) -> Rational {
    let dividend = Integer::from(&lhs.dividend * &rhs.divisor) + Integer::from(&rhs.dividend * &lhs.divisor);
    Rational::reduced(dividend, Integer::from(&lhs.divisor * &rhs.divisor))
}

fn sub(lhs: &Rational, rhs: &Rational) -> Rational {
    let dividend = Integer::from(&lhs.dividend * &rhs.divisor) - Integer::from(&rhs.dividend * &lhs.divisor);
    Rational::reduced(dividend, Integer::from(&lhs.divisor * &rhs.divisor))
}

/// Multiplies two fractions, cancelling across the pairs first so the intermediate products stay
/// small.
fn mul(lhs: &Rational, rhs: &Rational) -> Rational {
    if !lhs.is_finite() || !rhs.is_finite() {
        return Rational::reduced(
            Integer::from(&lhs.dividend * &rhs.dividend),
            Integer::from(&lhs.divisor * &rhs.divisor),
        );
    }

    let left = Integer::from(lhs.dividend.gcd_ref(&rhs.divisor));
    let right = Integer::from(rhs.dividend.gcd_ref(&lhs.divisor));

    let dividend = Integer::from(lhs.dividend.div_exact_ref(&left)) * Integer::from(rhs.dividend.div_exact_ref(&right));
    let divisor = Integer::from(lhs.divisor.div_exact_ref(&right)) * Integer::from(rhs.divisor.div_exact_ref(&left));
    Rational::reduced(dividend, divisor)
}

/// The reciprocal of zero is `Infinity`, so dividing by zero follows the multiplication rules.
fn div(lhs: &Rational, rhs: &Rational) -> Rational {
    mul(lhs, &rhs.recip())
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $impl:ident) => {
        impl $trait<&Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                $impl(self, rhs)
            }
        }

        impl $trait<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                $impl(self, &rhs)
            }
        }

        impl $trait<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                $impl(&self, rhs)
            }
        }

        impl $trait<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                $impl(&self, &rhs)
            }
        }

        impl $assign_trait<&Rational> for Rational {
            fn $assign_method(&mut self, rhs: &Rational) {
                *self = $impl(self, rhs);
            }
        }

        impl $assign_trait<Rational> for Rational {
            fn $assign_method(&mut self, rhs: Rational) {
                *self = $impl(self, &rhs);
            }
        }
    };
}

binary_op!(Add, add, AddAssign, add_assign, add);
binary_op!(Sub, sub, SubAssign, sub_assign, sub);
binary_op!(Mul, mul, MulAssign, mul_assign, mul);
binary_op!(Div, div, DivAssign, div_assign, div);

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational { dividend: Integer::from(-&self.dividend), divisor: self.divisor.clone() }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational { dividend: -self.dividend, divisor: self.divisor }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn q(dividend: i64, divisor: i64) -> Rational {
        Rational::new(dividend, divisor)
    }

    #[test]
    fn field_operations() {
        assert_eq!(q(1, 2) + q(1, 3), q(5, 6));
        assert_eq!(q(1, 2) - q(3, 4), q(-1, 4));
        assert_eq!(q(6, 35) * q(14, 9), q(4, 15));
        assert_eq!(q(2, 3) / q(-4, 9), q(-3, 2));
        assert_eq!(-q(2, 3), q(-2, 3));
        assert_eq!(&q(7, 2) - &q(7, 2), Rational::zero());
    }

    #[test]
    fn assign_forms() {
        let mut value = q(1, 4);
        value += q(1, 4);
        value *= &q(6, 1);
        value -= q(1, 1);
        value /= q(4, 1);
        assert_eq!(value, q(1, 2));
    }

    #[test]
    fn ieee_like_sentinels() {
        let inf = Rational::infinity;
        assert!((inf() - inf()).is_nan());
        assert!((inf() / inf()).is_nan());
        assert!((Rational::zero() * inf()).is_nan());
        assert_eq!(inf() + q(-1000, 1), inf());
        assert_eq!(inf() * q(-2, 1), Rational::neg_infinity());
        assert_eq!(q(5, 1) / Rational::zero(), inf());
        assert_eq!(q(-5, 1) / Rational::zero(), Rational::neg_infinity());
        assert!((Rational::zero() / Rational::zero()).is_nan());
        assert_eq!(q(3, 1) / inf(), Rational::zero());
        assert!((Rational::nan() + q(1, 1)).is_nan());
        assert!((-Rational::nan()).is_nan());
    }
}
