use super::Arity;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where an operator's symbol is written relative to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// The symbol precedes the single operand, as in `-x`.
    Prefix,

    /// The symbol follows the single operand.
    Postfix,

    /// The symbol separates the operands, as in `a + b`.
    Binary,
}

/// A built-in arithmetic operator.
///
/// Operators are functions with a symbol, a [`Fixity`] and a precedence. The precedence drives
/// both parenthesization when rendering and the precedence levels of the grammar. A lower
/// precedence binds tighter:
///
/// | Precedence | Operators            |
/// | ---------- | -------------------- |
/// | 1          | `+x`, `-x`           |
/// | 2          | `a ^ b`              |
/// | 3          | `a * b`, `a / b`     |
/// | 4          | `a + b`, `a - b`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Unary plus, `+x`.
    Plus,

    /// Unary minus, `-x`.
    Negate,

    /// Addition of two or more terms.
    Add,

    /// Binary subtraction.
    Subtract,

    /// Multiplication of two or more factors.
    Multiply,

    /// Binary division.
    Divide,

    /// Exponentiation.
    Power,
}

impl Operator {
    /// Every operator.
    pub const ALL: [Operator; 7] = [
        Operator::Plus,
        Operator::Negate,
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Power,
    ];

    /// The symbol used to render the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Plus | Self::Add => "+",
            Self::Negate | Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "^",
        }
    }

    pub fn fixity(self) -> Fixity {
        match self {
            Self::Plus | Self::Negate => Fixity::Prefix,
            _ => Fixity::Binary,
        }
    }

    /// The precedence of the operator. See the [type-level documentation](Operator).
    pub fn precedence(self) -> u8 {
        match self {
            Self::Plus | Self::Negate => 1,
            Self::Power => 2,
            Self::Multiply | Self::Divide => 3,
            Self::Add | Self::Subtract => 4,
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Self::Plus | Self::Negate => Arity::Exactly(1),
            Self::Add | Self::Multiply => Arity::AtLeast(2),
            Self::Subtract | Self::Divide | Self::Power => Arity::Exactly(2),
        }
    }

    /// The stable identifier of the operator, such as `@add`. Operators are registered and
    /// callable under this name.
    pub fn id(self) -> &'static str {
        match self {
            Self::Plus => "@plus",
            Self::Negate => "@minus",
            Self::Add => "@add",
            Self::Subtract => "@subtract",
            Self::Multiply => "@multiply",
            Self::Divide => "@divide",
            Self::Power => "@power",
        }
    }

    /// Applies the operator to floating-point operands. The operand count must already have been
    /// validated.
    #[cfg(feature = "numerical")]
    pub(crate) fn eval(self, args: &[f64]) -> f64 {
        match (self, args) {
            (Self::Plus, [a]) => *a,
            (Self::Negate, [a]) => -a,
            (Self::Add, _) => args.iter().sum(),
            (Self::Subtract, [a, b]) => a - b,
            (Self::Multiply, _) => args.iter().product(),
            (Self::Divide, [a, b]) => a / b,
            (Self::Power, [a, b]) => a.powf(*b),
            _ => f64::NAN,
        }
    }
}
