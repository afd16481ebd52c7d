//! Functions that can be applied to expressions.
//!
//! A [`Function`] is one of three things:
//!
//! - an [`Operator`], such as `+` or `^`, identified by its tag;
//! - a [`PredefinedFunction`], implemented natively on `f64`. The elementary functions (`sqrt`,
//!   `sin`, `ln`, ...) are predefined functions tagged with a [`Builtin`];
//! - a [`UserFunction`], defined by a body expression over formal parameters. The
//!   [standard library](library) of reciprocal, inverse and hyperbolic functions is made of these.
//!
//! The simplifier and differentiator dispatch on the [`Operator`] and [`Builtin`] tags. User
//! functions have no tag and are handled through their name or their body.

pub mod library;
mod operator;
mod predefined;
mod user;

pub use library::{library, library_function};
pub(crate) use library::is_library;
pub use operator::{Fixity, Operator};
pub use predefined::{Builtin, Evaluator, PredefinedFunction};
pub use user::UserFunction;

use crate::expr::{ConstructionError, Expr, FunctionExpr};
use std::{fmt, sync::Arc};

#[cfg(feature = "numerical")]
use crate::approximate::EvalError;

/// The number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    /// Returns true if a call with `count` arguments is allowed.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A function that can be applied to expressions.
///
/// Cloning a function is cheap; predefined and user functions are shared behind an [`Arc`].
#[derive(Debug, Clone)]
pub enum Function {
    Operator(Operator),
    Predefined(Arc<PredefinedFunction>),
    User(Arc<UserFunction>),
}

impl Function {
    /// The name of the function. Operators are named by their id, such as `@add`.
    pub fn name(&self) -> &str {
        match self {
            Self::Operator(operator) => operator.id(),
            Self::Predefined(function) => function.name(),
            Self::User(function) => function.name(),
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Self::Operator(operator) => operator.arity(),
            Self::Predefined(function) => function.arity(),
            Self::User(function) => function.arity(),
        }
    }

    /// Checks that the function accepts `count` arguments.
    pub fn validate(&self, count: usize) -> Result<(), ConstructionError> {
        let arity = self.arity();
        if arity.accepts(count) {
            Ok(())
        } else {
            Err(ConstructionError::ArgumentCount {
                function: self.name().to_string(),
                expected: arity,
                found: count,
            })
        }
    }

    /// Applies the function to `args`, failing if the argument count is wrong.
    pub fn apply(&self, args: Vec<Expr>) -> Result<Expr, ConstructionError> {
        FunctionExpr::new(self.clone(), args).map(Expr::Function)
    }

    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Self::Operator(operator) => Some(*operator),
            _ => None,
        }
    }

    /// The builtin tag, if this is one of the elementary functions.
    pub fn builtin(&self) -> Option<Builtin> {
        match self {
            Self::Predefined(function) => function.builtin(),
            _ => None,
        }
    }

    /// Evaluates the function on floating-point arguments.
    #[cfg(feature = "numerical")]
    pub fn evaluate(&self, args: &[f64]) -> Result<f64, EvalError> {
        match self {
            Self::Operator(operator) => {
                let arity = operator.arity();
                if arity.accepts(args.len()) {
                    Ok(operator.eval(args))
                } else {
                    Err(EvalError::ArgumentCount {
                        function: operator.id().to_string(),
                        expected: arity,
                        found: args.len(),
                    })
                }
            },
            Self::Predefined(function) => function.evaluate(args),
            Self::User(function) => function.evaluate(args),
        }
    }
}

/// Operators are equal by tag. Other functions are equal if they have the same kind and name.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Operator(lhs), Self::Operator(rhs)) => lhs == rhs,
            (Self::Predefined(lhs), Self::Predefined(rhs)) => {
                Arc::ptr_eq(lhs, rhs) || (lhs.name() == rhs.name() && lhs.builtin() == rhs.builtin())
            },
            (Self::User(lhs), Self::User(rhs)) => Arc::ptr_eq(lhs, rhs) || lhs.name() == rhs.name(),
            _ => false,
        }
    }
}

impl Eq for Function {}

impl From<Operator> for Function {
    fn from(operator: Operator) -> Self {
        Self::Operator(operator)
    }
}

impl From<Builtin> for Function {
    fn from(builtin: Builtin) -> Self {
        builtin.function()
    }
}

impl From<PredefinedFunction> for Function {
    fn from(function: PredefinedFunction) -> Self {
        Self::Predefined(Arc::new(function))
    }
}

impl From<UserFunction> for Function {
    fn from(function: UserFunction) -> Self {
        Self::User(Arc::new(function))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::expr::Variable;

    use super::*;

    #[test]
    fn names_and_equality() {
        assert_eq!(Function::from(Operator::Add).name(), "@add");
        assert_eq!(Function::from(Builtin::Sqrt).name(), "sqrt");
        assert_eq!(Function::from(Builtin::Sqrt), Builtin::Sqrt.function());
        assert_ne!(Function::from(Builtin::Sin), Function::from(Builtin::Cos));
        assert_ne!(Function::from(Operator::Add), Function::from(Builtin::Sin));
    }

    #[test]
    fn apply_validates() {
        let x = Expr::from(Variable::new("x").unwrap());
        assert!(Function::from(Builtin::Log).apply(vec![x.clone(), x.clone()]).is_ok());
        assert_eq!(
            Function::from(Operator::Power).apply(vec![x]),
            Err(ConstructionError::ArgumentCount {
                function: "@power".to_string(),
                expected: Arity::Exactly(2),
                found: 1,
            }),
        );
    }

    #[test]
    fn arity_display() {
        assert_eq!(Arity::Exactly(1).to_string(), "exactly 1");
        assert_eq!(Arity::AtLeast(2).to_string(), "at least 2");
    }

    #[cfg(feature = "numerical")]
    #[test]
    fn evaluation() {
        assert_eq!(Function::from(Operator::Multiply).evaluate(&[2.0, 3.0, 4.0]), Ok(24.0));
        assert_eq!(Function::from(Builtin::Sqrt).evaluate(&[16.0]), Ok(4.0));
        assert!(Function::from(Operator::Subtract).evaluate(&[1.0]).is_err());

        let Some(cosh) = library_function("cosh") else {
            panic!("cosh is in the library");
        };
        assert_eq!(cosh.evaluate(&[0.0]), Ok(1.0));
    }
}
