//! Terms: a rational coefficient times a product of powers.

use crate::{
    expr::Expr,
    function::Operator,
    rational::Rational,
};
use super::{order::compare, SimplifyError};

/// A base raised to a nonzero rational exponent.
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub base: Expr,
    pub exponent: Rational,
}

impl Factor {
    /// Renders `base ^ exponent`, or just `base` when the exponent is one.
    fn into_expr(self) -> Expr {
        if self.exponent.is_one() {
            self.base
        } else {
            self.base.pow(Expr::Number(self.exponent))
        }
    }
}

/// A term of a sum: `coefficient * f1 ^ e1 * f2 ^ e2 * ...`.
///
/// The factors are kept sorted in canonical order, and each base appears at most once. A factor
/// whose exponents cancel out is removed. A number base with an integer exponent is folded into
/// the coefficient, so number bases only remain under fractional exponents such as `2 ^ (1/2)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coefficient: Rational,
    pub factors: Vec<Factor>,
}

impl Term {
    /// A term with no factors.
    pub fn constant(coefficient: Rational) -> Self {
        Self { coefficient, factors: Vec::new() }
    }

    /// The term `base ^ exponent`.
    pub fn power(base: Expr, exponent: Rational) -> Self {
        let mut term = Self::constant(Rational::one());
        term.mul_factor(base, exponent);
        term
    }

    /// Returns true if the two terms have the same factors and only differ by their coefficient.
    pub fn is_like(&self, other: &Self) -> bool {
        self.factors == other.factors
    }

    /// Multiplies the term by `base ^ exponent`.
    pub fn mul_factor(&mut self, base: Expr, exponent: Rational) {
        if exponent.is_zero() {
            return;
        }

        // number bases fold into the coefficient, unless the power is too large to compute
        if let Some(power) = base.as_number().zip(exponent.to_i32()).and_then(|(value, n)| value.checked_pow(n)) {
            self.coefficient *= power;
            return;
        }

        match self.factors.iter().position(|factor| factor.base == base) {
            Some(index) => {
                let factor = &mut self.factors[index];
                factor.exponent += exponent;
                if factor.exponent.is_zero() {
                    self.factors.remove(index);
                } else if factor.base.is_number() {
                    // two fractional powers of a number may add up to an integer power
                    let factor = self.factors.remove(index);
                    self.mul_factor(factor.base, factor.exponent);
                }
            },
            None => {
                let index = self.factors
                    .iter()
                    .position(|factor| compare(&base, &factor.base).is_lt())
                    .unwrap_or(self.factors.len());
                self.factors.insert(index, Factor { base, exponent });
            },
        }
    }

    /// Multiplies two terms.
    pub fn mul(&self, other: &Self) -> Self {
        let mut product = self.clone();
        product.coefficient *= &other.coefficient;
        for factor in &other.factors {
            product.mul_factor(factor.base.clone(), factor.exponent.clone());
        }
        product
    }

    /// Raises the term to an integer power. Fails if the coefficient is zero and the exponent is
    /// negative, or if the power of the coefficient is too large to compute.
    pub fn powi(&self, exponent: i32) -> Result<Self, SimplifyError> {
        let coefficient = self.coefficient.checked_pow(exponent).ok_or_else(|| SimplifyError::PowerTooLarge {
            base: self.coefficient.clone(),
            exponent,
        })?;
        if !coefficient.is_finite() {
            return Err(SimplifyError::NonFinite(coefficient));
        }

        let mut power = Self::constant(coefficient);
        for factor in &self.factors {
            power.mul_factor(factor.base.clone(), &factor.exponent * Rational::from(exponent));
        }
        Ok(power)
    }

    /// The reciprocal of the term. Fails if the coefficient is zero.
    pub fn recip(&self) -> Result<Self, SimplifyError> {
        self.powi(-1)
    }

    /// Returns the index of a factor that must be expanded again.
    ///
    /// Opaque factors keep a rendered sum or product as their base. Once merging turns the
    /// exponent of such a factor into an integer, the power can be folded: a product base can be
    /// raised term by term, and a sum base with exponent one is distributed over the rest of the
    /// term.
    pub fn expandable(&self) -> Option<usize> {
        self.factors.iter().position(|factor| {
            match factor.base.as_operator() {
                Some((Operator::Add | Operator::Subtract, _)) => factor.exponent.is_one(),
                Some((Operator::Multiply | Operator::Divide | Operator::Negate, _)) => {
                    factor.exponent.is_integer()
                },
                _ => false,
            }
        })
    }

    /// Renders the term as `coefficient * f1 * f2 / (d1 * d2)`.
    ///
    /// Factors with negative exponents move to the divider, together with the denominator of the
    /// coefficient. A coefficient of `1` is omitted, and a coefficient of `-1` negates the first
    /// factor instead.
    pub fn into_expr(self) -> Result<Expr, SimplifyError> {
        let dividend = Rational::integer(self.coefficient.dividend().clone());
        let divisor = Rational::integer(self.coefficient.divisor().clone());

        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for factor in self.factors {
            if factor.exponent.is_negative() {
                denominator.push(Factor { base: factor.base, exponent: -factor.exponent }.into_expr());
            } else {
                numerator.push(factor.into_expr());
            }
        }

        let unit = dividend.abs().is_one();
        if !unit || numerator.is_empty() {
            numerator.insert(0, Expr::number(dividend.clone())?);
        } else if dividend.is_negative() {
            let first = numerator.remove(0);
            numerator.insert(0, -first);
        }
        if !divisor.is_one() {
            denominator.insert(0, Expr::number(divisor)?);
        }

        let numerator = product(numerator);
        Ok(if denominator.is_empty() {
            numerator
        } else {
            numerator / product(denominator)
        })
    }
}

/// Joins factors with `*`. The list must not be empty.
fn product(mut factors: Vec<Expr>) -> Expr {
    if factors.len() == 1 {
        factors.remove(0)
    } else {
        Expr::operator(Operator::Multiply, factors)
    }
}
