//! Sums of terms, the normal form built by the simplifier.

use crate::{
    expr::Expr,
    function::Operator,
    rational::Rational,
};
use super::{term::Term, SimplifyError};

/// A rational constant plus a list of terms.
///
/// Like terms are merged when they are added, and a term whose coefficient becomes zero is
/// dropped. The remaining terms keep the order in which they first appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct Sum {
    pub constant: Rational,
    pub terms: Vec<Term>,
}

impl Sum {
    pub fn constant(value: Rational) -> Self {
        Self { constant: value, terms: Vec::new() }
    }

    pub fn zero() -> Self {
        Self::constant(Rational::zero())
    }

    /// A sum holding a single term.
    pub fn term(term: Term) -> Self {
        let mut sum = Self::zero();
        sum.add_term(term);
        sum
    }

    /// If the sum has no terms, returns its constant.
    pub fn as_constant(&self) -> Option<&Rational> {
        self.terms.is_empty().then_some(&self.constant)
    }

    /// If the sum is a single term with no constant, returns the term.
    pub fn as_monomial(&self) -> Option<&Term> {
        match self.terms.as_slice() {
            [term] if self.constant.is_zero() => Some(term),
            _ => None,
        }
    }

    /// Adds a term, merging it with a like term if there is one.
    pub fn add_term(&mut self, term: Term) {
        if term.factors.is_empty() {
            self.constant += term.coefficient;
            return;
        }
        if term.coefficient.is_zero() {
            return;
        }

        match self.terms.iter().position(|existing| existing.is_like(&term)) {
            Some(index) => {
                self.terms[index].coefficient += term.coefficient;
                if self.terms[index].coefficient.is_zero() {
                    self.terms.remove(index);
                }
            },
            None => self.terms.push(term),
        }
    }

    pub fn add(mut self, other: Sum) -> Self {
        self.constant += other.constant;
        for term in other.terms {
            self.add_term(term);
        }
        self
    }

    pub fn neg(mut self) -> Self {
        self.constant = -self.constant;
        for term in &mut self.terms {
            term.coefficient = -&term.coefficient;
        }
        self
    }

    pub fn sub(self, other: Sum) -> Self {
        self.add(other.neg())
    }

    /// The terms of the sum, with the constant as a term of its own.
    fn items(&self) -> impl Iterator<Item = Term> + '_ {
        let constant = (!self.constant.is_zero()).then(|| Term::constant(self.constant.clone()));
        self.terms.iter().cloned().chain(constant)
    }

    /// Multiplies every term of one sum with every term of the other.
    pub fn mul(&self, other: &Sum) -> Self {
        let mut product = Self::zero();
        for lhs in self.items() {
            for rhs in other.items() {
                product.add_term(lhs.mul(&rhs));
            }
        }
        product
    }

    /// Renders the sum.
    ///
    /// Terms with a positive coefficient come first, joined with `+`. Every term with a negative
    /// coefficient is then subtracted. If there are no positive terms, the first negative term
    /// keeps its sign instead.
    pub fn into_expr(self) -> Result<Expr, SimplifyError> {
        let constant = (!self.constant.is_zero()).then(|| Term::constant(self.constant));
        let (positives, negatives): (Vec<_>, Vec<_>) = self.terms
            .into_iter()
            .chain(constant)
            .partition(|term| !term.coefficient.is_negative());

        let mut positives = positives
            .into_iter()
            .map(Term::into_expr)
            .collect::<Result<Vec<_>, _>>()?;
        let mut negatives = negatives.into_iter();
        let mut expr = match positives.len() {
            0 => match negatives.next() {
                Some(first) => first.into_expr()?,
                None => return Ok(Expr::from(0)),
            },
            1 => positives.remove(0),
            _ => Expr::operator(Operator::Add, positives),
        };

        for mut term in negatives {
            term.coefficient = -&term.coefficient;
            expr = expr - term.into_expr()?;
        }
        Ok(expr)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Variable;

    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name).unwrap())
    }

    fn term(coefficient: i32, name: &str) -> Term {
        let mut term = Term::constant(Rational::from(coefficient));
        term.mul_factor(var(name), Rational::one());
        term
    }

    fn sum(constant: i32, terms: Vec<Term>) -> Sum {
        let mut sum = Sum::constant(Rational::from(constant));
        for term in terms {
            sum.add_term(term);
        }
        sum
    }

    fn render(sum: Sum) -> String {
        sum.into_expr().unwrap().to_string()
    }

    #[test]
    fn like_terms_merge() {
        let total = sum(1, vec![term(2, "x"), term(3, "y")]).add(sum(-1, vec![term(-2, "x"), term(1, "y")]));
        assert_eq!(total, sum(0, vec![term(4, "y")]));
        assert_eq!(total.as_monomial(), Some(&term(4, "y")));
        assert_eq!(sum(2, vec![]).as_constant(), Some(&Rational::from(2)));
    }

    #[test]
    fn signs_are_grouped() {
        assert_eq!(render(sum(0, vec![])), "0");
        assert_eq!(render(sum(-5, vec![])), "-5");
        assert_eq!(render(sum(-1, vec![term(-1, "a"), term(2, "b"), term(1, "c")])), "2 * b + c - a - 1");
        assert_eq!(render(sum(0, vec![term(-3, "a"), term(-1, "b")])), "-3 * a - b");
        assert_eq!(render(sum(4, vec![term(1, "a")])), "a + 4");
    }

    #[test]
    fn distribution() {
        let lhs = sum(1, vec![term(1, "x")]);
        let rhs = sum(-1, vec![term(1, "x")]);
        let product = lhs.mul(&rhs);
        assert_eq!(render(product), "x ^ 2 - 1");
    }
}
