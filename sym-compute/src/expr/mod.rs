//! The expression tree.
//!
//! An [`Expr`] is an immutable tree with four kinds of node: exact [`Rational`] numbers, named
//! [`Constant`]s, [`Variable`]s and applications of a [`Function`] to argument expressions.
//! Operators such as `+` and `^` are ordinary functions (see [`Operator`]), so every compound
//! expression is a [`FunctionExpr`].
//!
//! Transformations never modify a tree in place. Simplification, differentiation and substitution
//! all build new trees, so a tree can be shared freely between threads.
//!
//! # Construction
//!
//! Applying a function validates the number of arguments before the node is built
//! ([`FunctionExpr::new`], [`Function::apply`]). The arithmetic operators on [`Expr`] (`+`, `-`,
//! `*`, `/`, unary `-`) and [`Expr::pow`] always produce well-formed operator nodes, so they are
//! infallible:
//!
//! ```
//! use sym_compute::expr::{Expr, Variable};
//!
//! let x = Expr::from(Variable::new("x").unwrap());
//! let expr = x.clone().pow(Expr::from(2)) * Expr::from(3) - x;
//! assert_eq!(expr.to_string(), "x ^ 2 * 3 - x");
//! ```
//!
//! # Equality
//!
//! [`PartialEq`] on [`Expr`] is structural: `a + b` and `b + a` are different trees.
//!
//! Numbers built with [`Expr::number`], by parsing or by the transformations are finite. The
//! [`Expr::Number`] variant itself can still be given `Infinity` or `NaN` directly. Such a tree is
//! rejected by [`simplify`](crate::simplify::simplify), and since `NaN` is not equal to itself,
//! [`Expr`] is only [`PartialEq`].

mod constant;
mod display;
mod variable;

pub use constant::Constant;
pub use variable::Variable;

use crate::{
    function::{Arity, Builtin, Function, Operator},
    rational::Rational,
    visit::{VariableCollector, Visitor},
};
use std::ops::{Add, Div, Mul, Neg, Sub};
use thiserror::Error;

/// An expression could not be constructed because its parts do not have the required shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    /// A variable, function or constant was given an empty name.
    #[error("a name cannot be empty")]
    EmptyName,

    /// A function was applied to the wrong number of arguments.
    #[error("`{function}` expects {expected} argument(s), but {found} were given")]
    ArgumentCount {
        function: String,
        expected: Arity,
        found: usize,
    },

    /// A number node was given an infinite or `NaN` value.
    #[error("a number must be finite, but `{0}` was given")]
    NonFinite(Rational),

    /// A user function lists the same parameter twice.
    #[error("the parameter `{0}` appears more than once")]
    DuplicateParameter(String),

    /// A substitution was created without any bindings.
    #[error("a substitution needs at least one binding")]
    EmptySubstitution,

    /// A substitution binds the same variable twice.
    #[error("the variable `{0}` is bound more than once")]
    DuplicateBinding(String),

    /// A substitution was given lists of different lengths.
    #[error("{variables} variable(s) were given {values} value(s)")]
    MismatchedBindings {
        variables: usize,
        values: usize,
    },
}

/// An application of a [`Function`] to a list of argument expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    function: Function,
    args: Vec<Expr>,
}

impl FunctionExpr {
    /// Applies `function` to `args`, after checking that the function accepts that many
    /// arguments.
    pub fn new(function: Function, args: Vec<Expr>) -> Result<Self, ConstructionError> {
        function.validate(args.len())?;
        Ok(Self { function, args })
    }

    /// Builds the node without validation. Only for functions whose arity is known to match.
    pub(crate) fn unchecked(function: Function, args: Vec<Expr>) -> Self {
        Self { function, args }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    /// If the function is an operator, returns it.
    pub fn operator(&self) -> Option<Operator> {
        self.function.as_operator()
    }
}

/// A node of the expression tree.
///
/// See the [module-level documentation](self) for more information.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An exact number. [`Expr::number`] checks that it is finite.
    Number(Rational),

    /// A named constant, such as `pi`.
    Constant(Constant),

    /// A variable, such as `x` or `u[i, j]`.
    Variable(Variable),

    /// A function or operator applied to arguments, such as `sin(x)` or `a + b`.
    Function(FunctionExpr),
}

impl Expr {
    /// Creates a number node. Fails if the value is infinite or `NaN`.
    pub fn number(value: Rational) -> Result<Self, ConstructionError> {
        if value.is_finite() {
            Ok(Self::Number(value))
        } else {
            Err(ConstructionError::NonFinite(value))
        }
    }

    /// Applies an operator whose arity is known to match.
    pub(crate) fn operator(operator: Operator, args: Vec<Expr>) -> Self {
        Self::Function(FunctionExpr::unchecked(Function::Operator(operator), args))
    }

    /// Applies a builtin function whose arity is known to match.
    pub(crate) fn builtin(builtin: Builtin, args: Vec<Expr>) -> Self {
        Self::Function(FunctionExpr::unchecked(builtin.function(), args))
    }

    /// `self ^ exponent`.
    pub fn pow(self, exponent: Expr) -> Self {
        Self::operator(Operator::Power, vec![self, exponent])
    }

    /// `+self`.
    pub fn plus(self) -> Self {
        Self::operator(Operator::Plus, vec![self])
    }

    /// Returns the number, if this is a number node.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            Self::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns true if this is the number `0`.
    pub fn is_zero(&self) -> bool {
        self.as_number().is_some_and(Rational::is_zero)
    }

    /// Returns true if this is the number `1`.
    pub fn is_one(&self) -> bool {
        self.as_number().is_some_and(Rational::is_one)
    }

    /// Returns the variable, if this is a variable node.
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Self::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    /// Returns the function application, if this is one.
    pub fn as_function(&self) -> Option<&FunctionExpr> {
        match self {
            Self::Function(function) => Some(function),
            _ => None,
        }
    }

    /// If this node applies an operator, returns the operator and its operands.
    pub fn as_operator(&self) -> Option<(Operator, &[Expr])> {
        let function = self.as_function()?;
        Some((function.operator()?, function.args()))
    }

    /// Returns the distinct variables of the expression, in order of first appearance.
    pub fn variables(&self) -> Vec<Variable> {
        let mut collector = VariableCollector::default();
        collector.visit(self);
        collector.into_variables()
    }

    /// Returns true if the expression contains no variables.
    pub fn is_constant(&self) -> bool {
        self.variables().is_empty()
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Number(Rational::from(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Number(Rational::from(value))
    }
}

impl From<Constant> for Expr {
    fn from(constant: Constant) -> Self {
        Self::Constant(constant)
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        Self::Variable(variable)
    }
}

impl From<FunctionExpr> for Expr {
    fn from(function: FunctionExpr) -> Self {
        Self::Function(function)
    }
}

/// Explicit conversion of numeric values into number nodes.
///
/// Floating-point values are converted exactly from their binary representation, so `0.1f64`
/// becomes `3602879701896397/36028797018963968`, not `1/10`. Use a decimal string to get the
/// decimal value. Conversion only fails for values that are not finite.
pub trait IntoExpr {
    fn into_expr(self) -> Result<Expr, ConstructionError>;
}

impl IntoExpr for i32 {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Ok(Expr::from(self))
    }
}

impl IntoExpr for i64 {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Ok(Expr::from(self))
    }
}

impl IntoExpr for f32 {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Expr::number(Rational::from_f32(self))
    }
}

impl IntoExpr for f64 {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Expr::number(Rational::from_f64(self))
    }
}

impl IntoExpr for Rational {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Expr::number(self)
    }
}

/// Decimal text such as `"25.2"`, converted exactly. Text that is not a number is reported as a
/// `NaN` value.
impl IntoExpr for &str {
    fn into_expr(self) -> Result<Expr, ConstructionError> {
        Expr::number(self.parse().unwrap_or_else(|_| Rational::nan()))
    }
}

macro_rules! binary_operator {
    ($trait:ident, $method:ident, $operator:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::operator(Operator::$operator, vec![self, rhs])
            }
        }
    };
}

binary_operator!(Add, add, Add);
binary_operator!(Sub, sub, Subtract);
binary_operator!(Mul, mul, Multiply);
binary_operator!(Div, div, Divide);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::operator(Operator::Negate, vec![self])
    }
}
