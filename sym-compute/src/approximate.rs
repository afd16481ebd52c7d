//! Floating-point approximation of expressions.
//!
//! This is the only place where exactness is given up on purpose. Numbers are converted with
//! [`Rational::to_f64`], which rounds to the nearest `f64`, and functions are evaluated with their
//! native implementations (see [`Function::evaluate`]).

use crate::{
    expr::{ConstructionError, Constant, Expr, FunctionExpr, Variable},
    function::Arity,
    rational::Rational,
    visit::Transform,
};
use std::collections::HashMap;
use thiserror::Error;

#[cfg(doc)]
use crate::function::Function;

/// An expression could not be evaluated numerically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A function was evaluated with the wrong number of arguments.
    #[error("`{function}` expects {expected} argument(s), but {found} were given")]
    ArgumentCount {
        function: String,
        expected: Arity,
        found: usize,
    },

    /// The function has no numeric meaning, such as `diff`.
    #[error("`{0}` cannot be evaluated numerically")]
    NotEvaluable(String),

    /// A variable has no value.
    #[error("the variable `{0}` has no value")]
    UnboundVariable(String),

    /// The constant has no real value.
    #[error("the constant `{0}` has no real value")]
    Constant(Constant),

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

/// Evaluates an expression that contains no variables.
pub fn approximate(expr: &Expr) -> Result<f64, EvalError> {
    approximate_with(expr, &HashMap::new())
}

/// Evaluates an expression, taking the value of each variable from `bindings`, keyed by the
/// variable's [id](Variable::id).
pub fn approximate_with(expr: &Expr, bindings: &HashMap<String, f64>) -> Result<f64, EvalError> {
    Approximator { bindings }.transform(expr)
}

/// The value of a constant, if it is real.
pub fn constant_value(constant: Constant) -> Option<f64> {
    match constant {
        Constant::Pi => Some(std::f64::consts::PI),
        Constant::E => Some(std::f64::consts::E),
        Constant::I => None,
        Constant::Infinity | Constant::PositiveInfinity => Some(f64::INFINITY),
        Constant::NegativeInfinity => Some(f64::NEG_INFINITY),
    }
}

struct Approximator<'a> {
    bindings: &'a HashMap<String, f64>,
}

impl Transform for Approximator<'_> {
    type Output = f64;
    type Error = EvalError;

    fn transform_number(&mut self, value: &Rational) -> Result<f64, EvalError> {
        Ok(value.to_f64())
    }

    fn transform_constant(&mut self, constant: Constant) -> Result<f64, EvalError> {
        constant_value(constant).ok_or(EvalError::Constant(constant))
    }

    fn transform_variable(&mut self, variable: &Variable) -> Result<f64, EvalError> {
        self.bindings
            .get(variable.id())
            .copied()
            .ok_or_else(|| EvalError::UnboundVariable(variable.id().to_string()))
    }

    fn transform_function(&mut self, function: &FunctionExpr) -> Result<f64, EvalError> {
        let args = function.args()
            .iter()
            .map(|arg| self.transform(arg))
            .collect::<Result<Vec<_>, _>>()?;
        function.function().evaluate(&args)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{afe_abs, afe_relative_error_msg, afe_is_relative_eq, assert_float_relative_eq};
    use pretty_assertions::assert_eq;
    use crate::function::{library_function, Builtin};

    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name).unwrap())
    }

    #[test]
    fn exact_numbers_round_once() {
        let expr = Expr::Number(Rational::new(1, 3)) + Expr::Number(Rational::new(1, 6));
        assert_eq!(approximate(&expr), Ok(0.5));
    }

    #[test]
    fn constants() {
        let expr = Expr::builtin(Builtin::Cos, vec![Expr::from(Constant::Pi)]);
        assert_float_relative_eq!(approximate(&expr).unwrap(), -1.0);
        assert_eq!(approximate(&Expr::from(Constant::NegativeInfinity)), Ok(f64::NEG_INFINITY));
        assert_eq!(approximate(&Expr::from(Constant::I)), Err(EvalError::Constant(Constant::I)));
    }

    #[test]
    fn bindings() {
        let expr = var("a") * var("b") - var("a");
        let bindings = [("a".to_string(), 4.0), ("b".to_string(), 2.5)].into_iter().collect();
        assert_eq!(approximate_with(&expr, &bindings), Ok(6.0));
        assert_eq!(approximate(&expr), Err(EvalError::UnboundVariable("a".to_string())));
    }

    #[test]
    fn user_functions_evaluate_their_bodies() {
        let Some(sinh) = library_function("sinh") else {
            panic!("sinh is in the library");
        };
        let expr = sinh.apply(vec![Expr::from(1)]).unwrap();
        assert_float_relative_eq!(approximate(&expr).unwrap(), 1f64.sinh());
    }

    #[test]
    fn derivatives_are_not_evaluable() {
        let expr = Expr::builtin(Builtin::Diff, vec![Expr::from(1), var("x")]);
        assert_eq!(approximate(&expr), Err(EvalError::UnboundVariable("x".to_string())));

        let bindings = [("x".to_string(), 0.0)].into_iter().collect();
        assert_eq!(approximate_with(&expr, &bindings), Err(EvalError::NotEvaluable("diff".to_string())));
    }
}
