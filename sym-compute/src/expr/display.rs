//! Precedence-aware rendering of expressions.
//!
//! Each operator has a precedence (see [`Operator::precedence`]); a lower number binds tighter.
//! When an operand is rendered, the parent passes down the highest precedence the operand may
//! have without being parenthesized:
//!
//! - the operand of a sign must be an atom, so `-(-x)` and `-(x ^ 2)` keep their parentheses;
//! - the first operand of a binary operator may have the operator's own precedence;
//! - later operands may have one less, so `a - (b - c)` keeps its parentheses;
//! - both operands of `^` may only have the precedence of a sign, since the grammar has no
//!   chained powers.
//!
//! Non-operator functions render as `name(arg, arg, ...)` and reset the context for their
//! arguments.

use std::fmt::{self, Display, Formatter};
use crate::function::{Fixity, Operator};
use super::{Expr, FunctionExpr};

/// The context of the outermost expression, which never needs parentheses.
const TOP: u8 = u8::MAX;

impl Expr {
    /// The precedence of the expression when it is rendered as an operand. Atoms have precedence
    /// `0` and never need parentheses.
    fn precedence(&self) -> u8 {
        match self {
            Self::Number(value) if !value.is_integer() => Operator::Divide.precedence(),
            Self::Number(value) if value.is_negative() => Operator::Negate.precedence(),
            Self::Function(function) => function.operator().map_or(0, Operator::precedence),
            _ => 0,
        }
    }

    /// Writes the expression, parenthesized if its precedence exceeds `allowed`.
    fn fmt_operand(&self, f: &mut Formatter<'_>, allowed: u8) -> fmt::Result {
        if self.precedence() > allowed {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Writes an operator application.
fn fmt_operator(f: &mut Formatter<'_>, operator: Operator, args: &[Expr]) -> fmt::Result {
    let own = operator.precedence();
    match operator.fixity() {
        Fixity::Prefix => {
            write!(f, "{}", operator.symbol())?;
            for arg in args {
                arg.fmt_operand(f, own - 1)?;
            }
            Ok(())
        },
        Fixity::Postfix => {
            for arg in args {
                arg.fmt_operand(f, own - 1)?;
            }
            write!(f, "{}", operator.symbol())
        },
        Fixity::Binary => {
            let (first, later) = if operator == Operator::Power {
                (Operator::Plus.precedence(), Operator::Plus.precedence())
            } else {
                (own, own - 1)
            };

            let mut iter = args.iter();
            if let Some(arg) = iter.next() {
                arg.fmt_operand(f, first)?;
                for arg in iter {
                    write!(f, " {} ", operator.symbol())?;
                    arg.fmt_operand(f, later)?;
                }
            }
            Ok(())
        },
    }
}

impl Display for FunctionExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(operator) = self.operator() {
            return fmt_operator(f, operator, self.args());
        }

        write!(f, "{}(", self.function().name())?;
        let mut iter = self.args().iter();
        if let Some(arg) = iter.next() {
            arg.fmt_operand(f, TOP)?;
            for arg in iter {
                write!(f, ", ")?;
                arg.fmt_operand(f, TOP)?;
            }
        }
        write!(f, ")")
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Constant(constant) => write!(f, "{}", constant),
            Self::Variable(variable) => write!(f, "{}", variable),
            Self::Function(function) => write!(f, "{}", function),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{expr::{Constant, Variable}, function::Builtin, rational::Rational};

    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name).unwrap())
    }

    fn num(dividend: i64, divisor: i64) -> Expr {
        Expr::Number(Rational::new(dividend, divisor))
    }

    #[test]
    fn binary_operators() {
        assert_eq!((var("a") + var("b") * var("c")).to_string(), "a + b * c");
        assert_eq!(((var("a") + var("b")) * var("c")).to_string(), "(a + b) * c");
        assert_eq!((var("a") - (var("b") - var("c"))).to_string(), "a - (b - c)");
        assert_eq!((var("a") - var("b") - var("c")).to_string(), "a - b - c");
        assert_eq!((var("a") / (var("b") * var("c"))).to_string(), "a / (b * c)");
        assert_eq!((var("a") * var("b") / var("c")).to_string(), "a * b / c");
    }

    #[test]
    fn powers_parenthesize_compound_operands() {
        assert_eq!(var("x").pow(Expr::from(2)).to_string(), "x ^ 2");
        assert_eq!((var("x") * var("y")).pow(Expr::from(2)).to_string(), "(x * y) ^ 2");
        assert_eq!(var("x").pow(var("y").pow(var("z"))).to_string(), "x ^ (y ^ z)");
        assert_eq!(var("x").pow(num(1, 2)).to_string(), "x ^ (1/2)");
        assert_eq!((-var("x")).pow(Expr::from(2)).to_string(), "-x ^ 2");
        assert_eq!((-var("x").pow(Expr::from(2))).to_string(), "-(x ^ 2)");
    }

    #[test]
    fn signs_and_numbers() {
        assert_eq!((-(var("a") + var("b"))).to_string(), "-(a + b)");
        assert_eq!((var("a") * num(-3, 1)).to_string(), "a * -3");
        assert_eq!((var("a") * num(-3, 4)).to_string(), "a * (-3/4)");
        assert_eq!(var("a").plus().to_string(), "+a");
        assert_eq!((-(-var("a"))).to_string(), "-(-a)");
        assert_eq!((-num(-3, 1)).to_string(), "-(-3)");
        assert_eq!(num(5, 2).to_string(), "5/2");
    }

    #[test]
    fn functions_and_leaves() {
        let call = Expr::builtin(Builtin::Log, vec![var("x") + Expr::from(1), Expr::from(Constant::E)]);
        assert_eq!(call.to_string(), "log(x + 1, e)");
        assert_eq!((Expr::builtin(Builtin::Sin, vec![var("x")]) * Expr::from(2)).to_string(), "sin(x) * 2");
    }
}
