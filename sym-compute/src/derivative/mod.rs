//! Symbolic differentiation.
//!
//! [`differentiate`] applies the textbook rules node by node: linearity for sums and signs, the
//! product rule for products of any length, the quotient rule and the generalized power rule
//! `d(f ^ g) = f ^ (g - 1) * (f' * g + f * ln(f) * g')`. Functions follow the chain rule; see
//! [`function`] for the elementary derivatives.
//!
//! The result is not simplified, but obviously zero and unit factors are dropped while it is
//! built, so `d(3 * x)` is `3` rather than `0 * x + 3 * 1`. Pass the result to
//! [`simplify`](crate::simplify::simplify) to normalize it.

mod function;

use crate::{
    expr::{ConstructionError, Expr, Variable},
    function::Operator,
    rational::Rational,
    simplify::SimplifyError,
};
use log::{debug, trace};
use thiserror::Error;

/// A derivative could not be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DerivativeError {
    /// The function has no derivative rule and no body to differentiate.
    #[error("the `{function}` function cannot be differentiated")]
    Unsupported {
        function: String,
    },

    /// A nested `diff` could not be resolved.
    #[error(transparent)]
    Simplify(Box<SimplifyError>),

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl From<SimplifyError> for DerivativeError {
    fn from(error: SimplifyError) -> Self {
        Self::Simplify(Box::new(error))
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is only used to prune the
/// derivative while it is built, and is not mathematically rigorous.
fn is_trivially_zero(expr: &Expr) -> bool {
    match expr {
        Expr::Number(value) => value.is_zero(),
        Expr::Function(_) => match expr.as_operator() {
            Some((Operator::Add, args)) => args.iter().all(is_trivially_zero),
            Some((Operator::Subtract, args)) => args.iter().all(is_trivially_zero),
            Some((Operator::Multiply, args)) => args.iter().any(is_trivially_zero),
            Some((Operator::Plus | Operator::Negate, [arg])) => is_trivially_zero(arg),
            Some((Operator::Divide, [dividend, _])) => is_trivially_zero(dividend),
            Some((Operator::Power, [base, exponent])) => {
                is_trivially_zero(base) && !is_trivially_zero(exponent)
            },
            _ => false,
        },
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one.
fn is_trivially_unity(expr: &Expr) -> bool {
    match expr {
        Expr::Number(value) => value.is_one(),
        Expr::Function(_) => match expr.as_operator() {
            Some((Operator::Multiply, args)) => args.iter().all(is_trivially_unity),
            Some((Operator::Plus, [arg])) => is_trivially_unity(arg),
            Some((Operator::Divide, [dividend, divisor])) => {
                is_trivially_unity(dividend) && is_trivially_unity(divisor)
            },
            Some((Operator::Power, [base, exponent])) => {
                is_trivially_zero(exponent) || is_trivially_unity(base)
            },
            _ => false,
        },
        _ => false,
    }
}

/// Builds a product, dropping unit factors. If any factor is zero, the product is zero.
#[derive(Default)]
struct MultBuilder(Vec<Expr>);

impl MultBuilder {
    fn mult(&mut self, expr: Expr) {
        if is_trivially_zero(&expr) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![Expr::from(0)];
            return;
        }

        if !is_trivially_unity(&expr) {
            self.0.push(expr);
        }
    }
}

impl From<MultBuilder> for Expr {
    fn from(mut builder: MultBuilder) -> Self {
        match builder.0.len() {
            0 => Expr::from(1),
            1 => builder.0.remove(0),
            _ => Expr::operator(Operator::Multiply, builder.0),
        }
    }
}

/// Builds a sum, dropping zero terms.
#[derive(Default)]
struct SumBuilder(Vec<Expr>);

impl SumBuilder {
    fn add(&mut self, expr: Expr) {
        if !is_trivially_zero(&expr) {
            self.0.push(expr);
        }
    }

    fn sub(&mut self, expr: Expr) {
        if !is_trivially_zero(&expr) {
            self.0.push(-expr);
        }
    }
}

impl From<SumBuilder> for Expr {
    fn from(mut builder: SumBuilder) -> Self {
        match builder.0.len() {
            0 => Expr::from(0),
            1 => builder.0.remove(0),
            _ => Expr::operator(Operator::Add, builder.0),
        }
    }
}

/// Multiplies the factors with a [`MultBuilder`].
fn product(factors: impl IntoIterator<Item = Expr>) -> Expr {
    let mut builder = MultBuilder::default();
    for factor in factors {
        builder.mult(factor);
    }
    builder.into()
}

/// `dividend / divisor`, or zero if the dividend is clearly zero.
fn quotient(dividend: Expr, divisor: Expr) -> Expr {
    if is_trivially_zero(&dividend) {
        Expr::from(0)
    } else if is_trivially_unity(&divisor) {
        dividend
    } else {
        dividend / divisor
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[Expr], with: &Variable) -> Result<Expr, DerivativeError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, with)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[Expr], with: &Variable) -> Result<Expr, DerivativeError> {
    let mut outer_sum = SumBuilder::default();
    for derivative_index in 0..factors.len() {
        let mut inner_mult = MultBuilder::default();
        for (index, factor) in factors.iter().enumerate() {
            if index == derivative_index {
                inner_mult.mult(derivative(factor, with)?);
            } else {
                inner_mult.mult(factor.clone());
            }
        }
        outer_sum.add(inner_mult.into());
    }
    Ok(outer_sum.into())
}

/// `(f / g)' = f' / g - f * g' / g ^ 2`
fn quotient_rule(dividend: &Expr, divisor: &Expr, with: &Variable) -> Result<Expr, DerivativeError> {
    let mut sum = SumBuilder::default();
    sum.add(quotient(derivative(dividend, with)?, divisor.clone()));
    sum.sub(quotient(
        product([dividend.clone(), derivative(divisor, with)?]),
        divisor.clone().pow(Expr::from(2)),
    ));
    Ok(sum.into())
}

/// `(f ^ g)' = f ^ (g - 1) * (f' * g + f * ln(f) * g')`
///
/// The second term vanishes when the exponent is constant, which leaves the familiar
/// `g * f ^ (g - 1) * f'`.
fn power_rule(base: &Expr, exponent: &Expr, with: &Variable) -> Result<Expr, DerivativeError> {
    let mut inner = SumBuilder::default();
    inner.add(product([derivative(base, with)?, exponent.clone()]));

    let exponent_derivative = derivative(exponent, with)?;
    if !is_trivially_zero(&exponent_derivative) {
        inner.add(product([base.clone(), function::ln(base.clone()), exponent_derivative]));
    }

    let lowered = match exponent.as_number() {
        Some(value) => Expr::number(value - Rational::one())?,
        None => exponent.clone() - Expr::from(1),
    };
    let power = if lowered.is_one() {
        base.clone()
    } else {
        base.clone().pow(lowered)
    };
    Ok(product([power, inner.into()]))
}

/// Differentiates one node.
fn derivative(expr: &Expr, with: &Variable) -> Result<Expr, DerivativeError> {
    if is_trivially_zero(expr) {
        return Ok(Expr::from(0));
    }

    match expr {
        Expr::Number(_) | Expr::Constant(_) => Ok(Expr::from(0)),
        Expr::Variable(variable) => Ok(Expr::from(i32::from(variable == with))),
        Expr::Function(call) => match expr.as_operator() {
            Some((Operator::Plus, [arg])) => derivative(arg, with),
            Some((Operator::Negate, [arg])) => {
                let inner = derivative(arg, with)?;
                Ok(if is_trivially_zero(&inner) { inner } else { -inner })
            },
            Some((Operator::Add, terms)) => sum_rule(terms, with),
            Some((Operator::Subtract, [lhs, rhs])) => {
                let mut sum = SumBuilder::default();
                sum.add(derivative(lhs, with)?);
                sum.sub(derivative(rhs, with)?);
                Ok(sum.into())
            },
            Some((Operator::Multiply, factors)) => product_rule(factors, with),
            Some((Operator::Divide, [dividend, divisor])) => quotient_rule(dividend, divisor, with),
            Some((Operator::Power, [base, exponent])) => power_rule(base, exponent, with),
            _ => function::function_derivative(call, with),
        },
    }
}

/// Computes the partial derivative of `expr` with respect to `with`.
///
/// Any `diff` nodes inside `expr` are resolved first. Fails if `expr` applies a function that has
/// neither a derivative rule nor a symbolic body.
pub fn differentiate(expr: &Expr, with: &Variable) -> Result<Expr, DerivativeError> {
    debug!("differentiating `{}` with respect to `{}`", expr, with);
    let result = derivative(expr, with)?;
    trace!("d/d{} `{}` = `{}`", with, expr, result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{
        expr::Constant,
        function::{Evaluator, Function, PredefinedFunction, UserFunction},
        grammar::parse_expression,
        registry::Registry,
        simplify::simplify,
    };

    use super::*;

    fn x() -> Variable {
        Variable::new("x").unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::default();
        registry.add_variable(x());
        registry.add_variable(Variable::new("y").unwrap());
        registry
    }

    fn parse(source: &str) -> Expr {
        parse_expression(source, &registry()).unwrap()
    }

    /// Differentiates with respect to `x` and simplifies the result.
    fn derive(source: &str) -> String {
        let derivative = differentiate(&parse(source), &x()).unwrap();
        simplify(&derivative).unwrap().to_string()
    }

    #[test]
    fn leaves() {
        assert_eq!(differentiate(&Expr::from(7), &x()), Ok(Expr::from(0)));
        assert_eq!(differentiate(&Expr::from(Constant::Pi), &x()), Ok(Expr::from(0)));
        assert_eq!(differentiate(&parse("x"), &x()), Ok(Expr::from(1)));
        assert_eq!(differentiate(&parse("y"), &x()), Ok(Expr::from(0)));
    }

    #[test]
    fn pruned_while_built() {
        assert_eq!(differentiate(&parse("3 * x"), &x()).unwrap().to_string(), "3");
        assert_eq!(differentiate(&parse("x ^ 2"), &x()).unwrap().to_string(), "x * 2");
        assert_eq!(differentiate(&parse("sin(x)"), &x()).unwrap().to_string(), "cos(x)");
        assert_eq!(differentiate(&parse("y * 5 + 1"), &x()).unwrap().to_string(), "0");
    }

    #[test]
    fn rules() {
        assert_eq!(derive("x ^ 3"), "3 * x ^ 2");
        assert_eq!(derive("sin(x)"), "cos(x)");
        assert_eq!(derive("x ^ 2 + x + 1"), "2 * x + 1");
        assert_eq!(derive("x * y - 4"), "y");
        assert_eq!(derive("1 / x"), "-1 / x ^ 2");
        assert_eq!(derive("cos(2 * x)"), "-2 * sin(2 * x)");
        assert_eq!(derive("exp(x) * x"), "x * exp(x) + exp(x)");
        assert_eq!(derive("diff(x ^ 3, x)"), "6 * x");
    }

    #[test]
    fn user_functions() {
        let formal = Variable::new("t").unwrap();
        let body = Expr::from(formal.clone()).pow(Expr::from(2)) * Expr::from(3);
        let square = Function::from(UserFunction::new("f", vec![formal], body).unwrap());

        let call = square.apply(vec![parse("y")]).unwrap();
        let derivative = differentiate(&call, &Variable::new("y").unwrap()).unwrap();
        assert_eq!(simplify(&derivative).unwrap().to_string(), "6 * y");
    }

    #[test]
    fn user_functions_shadowing_the_library() {
        let formal = Variable::new("t").unwrap();
        let body = Expr::from(formal.clone()).pow(Expr::from(2));
        let mut registry = registry();
        registry.add_function(Function::from(UserFunction::new("sec", vec![formal], body).unwrap()));

        let call = parse_expression("sec(x)", &registry).unwrap();
        let derivative = differentiate(&call, &x()).unwrap();
        assert_eq!(simplify(&derivative).unwrap().to_string(), "2 * x");

        // the library's own `sec` keeps its closed-form rule
        assert_eq!(derive("sec(x)"), "sin(x) / cos(x) ^ 2");
    }

    #[test]
    fn unsupported_functions() {
        let gamma = PredefinedFunction::new("gamma", Evaluator::Unary(f64::exp)).unwrap();
        let call = Function::from(gamma).apply(vec![parse("x")]).unwrap();
        assert_eq!(
            differentiate(&call, &x()),
            Err(DerivativeError::Unsupported { function: "gamma".to_string() }),
        );

        // even with a constant argument
        let call = Function::from(PredefinedFunction::new("gamma", Evaluator::Unary(f64::exp)).unwrap())
            .apply(vec![parse("y")])
            .unwrap();
        assert!(differentiate(&call, &x()).is_err());
    }

    #[cfg(feature = "numerical")]
    mod numerical {
        use std::collections::HashMap;
        use crate::approximate::approximate_with;

        use super::*;

        fn eval_x(expr: &Expr, x: f64) -> f64 {
            let bindings = HashMap::from([("x".to_string(), x)]);
            approximate_with(expr, &bindings).unwrap()
        }

        /// Approximates the derivative with a central difference.
        fn finite_difference(expr: &Expr, x: f64) -> f64 {
            const DX: f64 = 0.00001;
            (eval_x(expr, x + DX) - eval_x(expr, x - DX)) / (2.0 * DX)
        }

        fn test_for_function(function: &'static str, points: impl IntoIterator<Item = f64>) {
            const TOL: f64 = 0.0001;

            let expr = parse(function);
            let symbolic = differentiate(&expr, &x()).unwrap();
            let simplified = simplify(&symbolic).unwrap();

            for point in points {
                let numerically_computed = finite_difference(&expr, point);
                for candidate in [&symbolic, &simplified] {
                    let symbolically_computed = eval_x(candidate, point);
                    assert!(
                        (symbolically_computed - numerically_computed).abs() < TOL,
                        "For \"{function}\" at x={point}, `{candidate}` gave {symbolically_computed} but the finite difference gave {numerically_computed}",
                    );
                }
            }
        }

        const POINTS: [f64; 4] = [0.2, 0.5, 0.9, 1.3];

        #[test]
        fn arithmetic() {
            test_for_function("x^2 + x + 1", POINTS);
            test_for_function("x / (x + 1)", POINTS);
            test_for_function("(x - 1) * (x + 2) * x", POINTS);
            test_for_function("2 ^ x", POINTS);
            test_for_function("x ^ x", POINTS);
            test_for_function("x ^ (1/2) - 3 / x ^ 2", POINTS);
        }

        #[test]
        fn elementary() {
            for function in [
                "sqrt(x)", "exp(2 * x)", "ln(x) * x", "log(x, 2)", "log(3, x + 1)",
                "sin(x) * cos(x)", "tan(x)", "arcsin(x / 2)", "arccos(x / 2)", "arctan(x)",
            ] {
                test_for_function(function, POINTS);
            }
        }

        #[test]
        fn library() {
            for function in [
                "cot(x)", "sec(x)", "cosec(x)", "arccot(x)",
                "sinh(x)", "cosh(x)", "tanh(x)", "coth(x)",
                "arcsinh(x)", "arccosh(x + 2)", "arctanh(x / 3)", "arccoth(x + 2)",
                "sech(x)", "arcsec(x + 2)",
            ] {
                test_for_function(function, POINTS);
            }
        }
    }
}
