//! Simplification of expressions into a canonical sum of products.
//!
//! The simplifier rewrites an expression into a [`Sum`]: a rational constant plus a list of
//! [`Term`]s, where each term is a rational coefficient times a product of powers. Addition and
//! subtraction merge like terms. Multiplication distributes over sums, and like factors merge by
//! adding their exponents. Number arithmetic is exact.
//!
//! Some powers cannot be folded this way, such as `(x + 1) ^ 2` or `x ^ n`. Those are kept as
//! opaque factors whose base is the simplified form of the original base.
//!
//! The sum is then rendered back into an [`Expr`]. Terms with a positive coefficient come first,
//! then every negative term is subtracted:
//!
//! ```
//! use sym_compute::{expr::Variable, grammar::parse_expression, registry::Registry, simplify::simplify};
//!
//! let mut registry = Registry::default();
//! registry.add_variable(Variable::new("x").unwrap());
//!
//! let expr = parse_expression("(x + 1) * (x - 1) - x * 2 / 4", &registry).unwrap();
//! assert_eq!(simplify(&expr).unwrap().to_string(), "x ^ 2 - x / 2 - 1");
//! ```
//!
//! Simplification is idempotent: simplifying an already simplified expression returns the same
//! tree.
//!
//! Functions other than the arithmetic operators are not evaluated. Only their arguments are
//! simplified, so `sqrt(4)` stays `sqrt(4)`. The exception is `diff(f, x)`, which is replaced by
//! the simplified derivative of `f` with respect to `x`.

mod order;
mod sum;
mod term;

use crate::{
    derivative::{differentiate, DerivativeError},
    expr::{ConstructionError, Constant, Expr, FunctionExpr, Variable},
    function::{Builtin, Operator},
    rational::Rational,
    visit::Transform,
};
use log::{debug, trace};
use sum::Sum;
use term::Term;
use thiserror::Error;

/// An expression could not be simplified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
    /// `diff(f, v)` where `v` has no variables.
    #[error("cannot differentiate with respect to `{0}`, which is constant")]
    DerivativeByConstant(String),

    /// `diff(f, v)` where `v` is neither a variable nor constant.
    #[error("cannot differentiate with respect to `{0}`, which is not a variable")]
    UnresolvedDerivative(String),

    /// Exact arithmetic produced an infinite or undefined value, such as `1 / 0`.
    #[error("the expression evaluates to `{0}`")]
    NonFinite(Rational),

    /// An integer power of a number is too large to compute exactly, such as `10 ^ 2147483647`.
    #[error("`{base} ^ {exponent}` is too large to compute exactly")]
    PowerTooLarge {
        base: Rational,
        exponent: i32,
    },

    #[error(transparent)]
    Derivative(#[from] DerivativeError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// Simplifies an expression.
///
/// See the [module-level documentation](self) for the canonical form.
pub fn simplify(expr: &Expr) -> Result<Expr, SimplifyError> {
    debug!("simplifying `{}`", expr);
    let simplified = Simplifier.transform(expr)?.into_expr()?;
    trace!("simplified `{}` to `{}`", expr, simplified);
    Ok(simplified)
}

/// Builds the [`Sum`] of a tree.
struct Simplifier;

impl Simplifier {
    /// Resolves `diff(function, target)`.
    fn derivative(&mut self, function: &Expr, target: &Expr) -> Result<Sum, SimplifyError> {
        match simplify(target)? {
            Expr::Variable(variable) => {
                let derivative = differentiate(function, &variable)?;
                self.transform(&derivative)
            },
            target if target.is_constant() => Err(SimplifyError::DerivativeByConstant(target.to_string())),
            target => Err(SimplifyError::UnresolvedDerivative(target.to_string())),
        }
    }

    /// Simplifies the arguments of a function that is not an arithmetic operator.
    fn call(&mut self, function: &FunctionExpr) -> Result<Sum, SimplifyError> {
        let args = function.args()
            .iter()
            .map(|arg| self.transform(arg).and_then(Sum::into_expr))
            .collect::<Result<Vec<_>, _>>()?;
        let call = FunctionExpr::new(function.function().clone(), args)?;
        Ok(Sum::term(Term::power(Expr::Function(call), Rational::one())))
    }

    /// Expands the factors flagged by [`Term::expandable`], until no term has one.
    fn expand(&mut self, sum: Sum) -> Result<Sum, SimplifyError> {
        if sum.terms.iter().all(|term| term.expandable().is_none()) {
            return Ok(sum);
        }

        let mut expanded = Sum::constant(sum.constant);
        for mut term in sum.terms {
            match term.expandable() {
                Some(index) => {
                    let factor = term.factors.remove(index);
                    let base = self.transform(&factor.base)?;
                    let raised = power(base, Sum::constant(factor.exponent))?;
                    expanded = expanded.add(self.expand(raised.mul(&Sum::term(term)))?);
                },
                None => expanded.add_term(term),
            }
        }
        Ok(expanded)
    }
}

impl Transform for Simplifier {
    type Output = Sum;
    type Error = SimplifyError;

    fn transform_number(&mut self, value: &Rational) -> Result<Sum, SimplifyError> {
        if value.is_finite() {
            Ok(Sum::constant(value.clone()))
        } else {
            Err(SimplifyError::NonFinite(value.clone()))
        }
    }

    fn transform_constant(&mut self, constant: Constant) -> Result<Sum, SimplifyError> {
        Ok(Sum::term(Term::power(Expr::Constant(constant), Rational::one())))
    }

    fn transform_variable(&mut self, variable: &Variable) -> Result<Sum, SimplifyError> {
        Ok(Sum::term(Term::power(Expr::Variable(variable.clone()), Rational::one())))
    }

    fn transform_function(&mut self, function: &FunctionExpr) -> Result<Sum, SimplifyError> {
        let sum = match (function.operator(), function.args()) {
            (Some(Operator::Plus), [arg]) => self.transform(arg)?,
            (Some(Operator::Negate), [arg]) => self.transform(arg)?.neg(),
            (Some(Operator::Add), args) => {
                let mut sum = Sum::zero();
                for arg in args {
                    sum = sum.add(self.transform(arg)?);
                }
                sum
            },
            (Some(Operator::Subtract), [lhs, rhs]) => self.transform(lhs)?.sub(self.transform(rhs)?),
            (Some(Operator::Multiply), args) => {
                let mut product = Sum::constant(Rational::one());
                for arg in args {
                    product = product.mul(&self.transform(arg)?);
                }
                product
            },
            (Some(Operator::Divide), [lhs, rhs]) => {
                let divisor = power(self.transform(rhs)?, Sum::constant(Rational::from(-1)))?;
                self.transform(lhs)?.mul(&divisor)
            },
            (Some(Operator::Power), [base, exponent]) => {
                power(self.transform(base)?, self.transform(exponent)?)?
            },
            (None, [function_arg, target]) if function.function().builtin() == Some(Builtin::Diff) => {
                self.derivative(function_arg, target)?
            },
            _ => self.call(function)?,
        };
        self.expand(sum)
    }
}

/// Raises a sum to a power.
fn power(base: Sum, exponent: Sum) -> Result<Sum, SimplifyError> {
    let exponent = match exponent.as_constant().cloned() {
        Some(exponent) => exponent,
        None => {
            if base.as_constant().is_some_and(Rational::is_one) {
                return Ok(base);
            }
            let power = base.into_expr()?.pow(exponent.into_expr()?);
            return Ok(Sum::term(Term::power(power, Rational::one())));
        },
    };

    if exponent.is_zero() {
        return Ok(Sum::constant(Rational::one()));
    }
    if exponent.is_one() {
        return Ok(base);
    }
    if let Some(value) = base.as_constant() {
        return constant_power(value, exponent);
    }

    if let Some(term) = base.as_monomial() {
        if let Some(n) = exponent.to_i32() {
            return Ok(Sum::term(term.powi(n)?));
        }
        if let [factor] = term.factors.as_slice() {
            if term.coefficient.is_one() && factor.exponent.is_one() {
                return Ok(Sum::term(Term::power(factor.base.clone(), exponent)));
            }
        }
    }

    Ok(Sum::term(Term::power(base.into_expr()?, exponent)))
}

/// Raises a number to a rational power. Integer powers are computed exactly; other powers are
/// kept as a factor, such as `2 ^ (1/2)`.
fn constant_power(value: &Rational, exponent: Rational) -> Result<Sum, SimplifyError> {
    if value.is_one() {
        return Ok(Sum::constant(Rational::one()));
    }

    if let Some(n) = exponent.to_i32() {
        let power = value
            .checked_pow(n)
            .ok_or_else(|| SimplifyError::PowerTooLarge { base: value.clone(), exponent: n })?;
        return if power.is_finite() {
            Ok(Sum::constant(power))
        } else {
            Err(SimplifyError::NonFinite(power))
        };
    }

    if value.is_zero() {
        return if exponent.is_negative() {
            Err(SimplifyError::NonFinite(Rational::infinity()))
        } else {
            Ok(Sum::zero())
        };
    }

    Ok(Sum::term(Term::power(Expr::Number(value.clone()), exponent)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{grammar::parse_expression, registry::Registry, substitute::Substitution};

    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::default();
        for name in ["x", "y", "a", "b", "n"] {
            registry.add_variable(Variable::new(name).unwrap());
        }
        registry
    }

    fn parse(source: &str) -> Expr {
        parse_expression(source, &registry()).unwrap()
    }

    fn simplified(source: &str) -> String {
        simplify(&parse(source)).unwrap().to_string()
    }

    #[test]
    fn like_terms() {
        assert_eq!(simplified("x + x"), "2 * x");
        assert_eq!(simplified("x - x"), "0");
        assert_eq!(simplified("3 * x - 2 * x + 1 - 1"), "x");
        assert_eq!(simplified("a + b * 2.5 - a * b"), "a + 5 * b / 2 - a * b");
        assert_eq!(simplified("x * y - y * x"), "0");
    }

    #[test]
    fn signs() {
        assert_eq!(simplified("-(x - y)"), "y - x");
        assert_eq!(simplified("-x - 1"), "-x - 1");
        assert_eq!(simplified("+x * -1"), "-x");
        assert_eq!(simplified("-(-(x))"), "x");
        assert_eq!(simplified("2 - 5"), "-3");
    }

    #[test]
    fn products() {
        assert_eq!(simplified("x * x * x"), "x ^ 3");
        assert_eq!(simplified("y * 2 * x"), "2 * x * y");
        assert_eq!(simplified("(x + 1) * (x - 1)"), "x ^ 2 - 1");
        assert_eq!(simplified("2 * (x + y)"), "2 * x + 2 * y");
    }

    #[test]
    fn quotients() {
        assert_eq!(simplified("x / x"), "1");
        assert_eq!(simplified("2 * x / (4 * y)"), "x / (2 * y)");
        assert_eq!(simplified("1 / (x + 1)"), "1 / (x + 1)");
        assert_eq!(simplified("(x ^ 2 - x) / x"), "x - 1");
        assert_eq!(simplified("6 / 4"), "3 / 2");
    }

    #[test]
    fn powers() {
        assert_eq!(simplified("2 ^ 10"), "1024");
        assert_eq!(simplified("(2 * x) ^ 2"), "4 * x ^ 2");
        assert_eq!(simplified("x ^ 2 * x ^ -1"), "x");
        assert_eq!(simplified("x ^ (1/2) * x ^ (1/2)"), "x");
        assert_eq!(simplified("x ^ n * x ^ n"), "(x ^ n) ^ 2");
        assert_eq!(simplified("(x + 1) ^ 2"), "(x + 1) ^ 2");
        assert_eq!(simplified("(x + 1) ^ 2 / (x + 1)"), "x + 1");
        assert_eq!(simplified("x ^ 0 + 1 ^ n"), "2");
        assert_eq!(simplified("4 ^ (1/2)"), "4 ^ (1/2)");
    }

    #[test]
    fn substituted_values_fold_exactly() {
        let simplified = simplify(&parse("a + b * 2 - a * b")).unwrap();
        assert_eq!(simplified.to_string(), "a + 2 * b - a * b");

        let bind = |b: Rational| {
            Substitution::new(vec![
                (Variable::new("a").unwrap(), Expr::number(Rational::new(252, 10)).unwrap()),
                (Variable::new("b").unwrap(), Expr::number(b).unwrap()),
            ])
            .unwrap()
        };
        let value = simplify(&bind(Rational::new(111, 10)).apply(&simplified).unwrap()).unwrap();
        assert_eq!(value, Expr::Number(Rational::new(-5808, 25)));

        // the sample driver's default input
        let simplified = simplify(&parse("a + b * 2.5 - a * b")).unwrap();
        let value = simplify(&bind(Rational::new(111, 10)).apply(&simplified).unwrap()).unwrap();
        assert_eq!(value, Expr::Number(Rational::new(-22677, 100)));
        assert_eq!(value.to_string(), "-22677/100");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let infinite = Expr::Number(Rational::infinity()) + parse("x");
        assert_eq!(simplify(&infinite), Err(SimplifyError::NonFinite(Rational::infinity())));

        let undefined = parse("x") * Expr::Number(Rational::nan());
        assert!(matches!(simplify(&undefined), Err(SimplifyError::NonFinite(value)) if value.is_nan()));
    }

    #[test]
    fn oversized_powers() {
        assert_eq!(
            simplify(&parse("10 ^ 2147483647")),
            Err(SimplifyError::PowerTooLarge { base: Rational::from(10), exponent: i32::MAX }),
        );
        assert_eq!(
            simplify(&parse("(2 * x) ^ 2000000000")),
            Err(SimplifyError::PowerTooLarge { base: Rational::from(2), exponent: 2_000_000_000 }),
        );
        assert_eq!(simplified("1 ^ 2147483647 + (-1) ^ 2147483647"), "0");
        assert_eq!(simplified("(x ^ 2147483647) ^ 1"), "x ^ 2147483647");
    }

    #[test]
    fn functions_keep_their_arguments() {
        assert_eq!(simplified("sin(x + x)"), "sin(2 * x)");
        assert_eq!(simplified("sqrt(4) * sqrt(4)"), "sqrt(4) ^ 2");
        assert_eq!(simplified("cos(x) ^ 2 + sin(x) ^ 2"), "cos(x) ^ 2 + sin(x) ^ 2");
    }

    #[test]
    fn derivatives_are_resolved() {
        assert_eq!(simplified("diff(x ^ 3, x)"), "3 * x ^ 2");
        assert_eq!(simplified("diff(sin(x), x)"), "cos(x)");
        assert_eq!(simplified("diff(x * y, y)"), "x");
        assert_eq!(simplified("diff(x, x + 0)"), "1");

        assert_eq!(
            simplify(&parse("diff(x, 2)")),
            Err(SimplifyError::DerivativeByConstant("2".to_string())),
        );
        assert_eq!(
            simplify(&parse("diff(x, 2 * x)")),
            Err(SimplifyError::UnresolvedDerivative("2 * x".to_string())),
        );
    }

    #[test]
    fn division_by_zero() {
        assert!(matches!(simplify(&parse("x / 0")), Err(SimplifyError::NonFinite(_))));
        assert!(matches!(simplify(&parse("1 / (x - x)")), Err(SimplifyError::NonFinite(_))));
        assert!(matches!(simplify(&parse("0 ^ -1")), Err(SimplifyError::NonFinite(_))));
    }

    #[test]
    fn idempotent() {
        let sources = [
            "a + b * 2.5 - a * b",
            "-x - 1",
            "x / 2 - y / 3",
            "(x + 1) ^ 2 * (y - 1)",
            "1 / (x + 1) + x / (x + 1)",
            "e ^ x * 2",
            "-(x ^ 2) * y",
            "(-2) ^ (1/2) * x",
            "(2 * x) ^ (1/2) * 3",
            "x ^ (1/2) / y ^ (3/2)",
            "sin(x) ^ 2 - cos(x) / 3",
            "-1 / (x * y)",
            "pi * x - pi",
        ];

        for source in sources {
            let once = simplify(&parse(source)).unwrap();
            let twice = simplify(&once).unwrap();
            assert_eq!(once, twice, "simplifying `{}` twice", source);

            let reparsed = simplify(&parse(&once.to_string())).unwrap();
            assert_eq!(once, reparsed, "re-parsing the simplified form of `{}`", source);
        }
    }

    #[cfg(feature = "numerical")]
    mod numerical {
        use assert_float_eq::{
            afe_abs,
            afe_absolute_error_msg,
            afe_is_absolute_eq,
            afe_is_relative_eq,
            afe_relative_error_msg,
            assert_float_absolute_eq,
            assert_float_relative_eq,
        };
        use rand::{rngs::StdRng, Rng, SeedableRng};
        use std::collections::HashMap;
        use crate::approximate::approximate_with;

        use super::*;

        /// Builds a random tree over `x` and `y` with small integer leaves.
        fn random_expr(rng: &mut StdRng, depth: u32) -> Expr {
            if depth == 0 || rng.gen_ratio(1, 4) {
                return match rng.gen_range(0..3) {
                    0 => Expr::from(rng.gen_range(-4..=4)),
                    1 => Expr::from(Variable::new("x").unwrap()),
                    _ => Expr::from(Variable::new("y").unwrap()),
                };
            }

            let lhs = random_expr(rng, depth - 1);
            match rng.gen_range(0..6) {
                0 => lhs + random_expr(rng, depth - 1),
                1 => lhs - random_expr(rng, depth - 1),
                2 => lhs * random_expr(rng, depth - 1),
                3 => lhs / random_expr(rng, depth - 1),
                4 => lhs.pow(Expr::from(rng.gen_range(0..=3))),
                _ => -lhs,
            }
        }

        #[test]
        fn random_expressions_keep_their_value() {
            let mut rng = StdRng::seed_from_u64(0x51);
            let mut checked = 0;

            for _ in 0..300 {
                let expr = random_expr(&mut rng, 4);
                let Ok(simplified) = simplify(&expr) else {
                    continue;
                };

                let bindings = HashMap::from([
                    ("x".to_string(), rng.gen_range(0.5..2.0)),
                    ("y".to_string(), rng.gen_range(-2.0..-0.5)),
                ]);
                let expected = approximate_with(&expr, &bindings).unwrap();
                if !expected.is_finite() || expected.abs() > 1e9 {
                    continue;
                }

                let actual = approximate_with(&simplified, &bindings).unwrap();
                if expected.abs() < 1.0 {
                    assert_float_absolute_eq!(actual, expected, 1e-6);
                } else {
                    assert_float_relative_eq!(actual, expected, 1e-6);
                }
                checked += 1;
            }

            assert!(checked > 100);
        }
    }
}
