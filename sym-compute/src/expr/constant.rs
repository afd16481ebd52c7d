use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named mathematical constant.
///
/// Constants are opaque leaves: the simplifier never replaces them with numbers, and two constants
/// are equal only if they are the same constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Constant {
    /// The ratio of a circle's circumference to its diameter.
    Pi,

    /// Euler's number, the base of the natural logarithm.
    E,

    /// The imaginary unit, `i^2 = -1`.
    I,

    /// Unsigned infinity.
    Infinity,

    PositiveInfinity,

    NegativeInfinity,
}

impl Constant {
    /// Every constant.
    pub const ALL: [Constant; 6] = [
        Constant::Pi,
        Constant::E,
        Constant::I,
        Constant::Infinity,
        Constant::PositiveInfinity,
        Constant::NegativeInfinity,
    ];

    /// The stable identifier of the constant, such as `@pi`.
    pub fn id(self) -> &'static str {
        match self {
            Self::Pi => "@pi",
            Self::E => "@e",
            Self::I => "@i",
            Self::Infinity => "@inf",
            Self::PositiveInfinity => "@pinf",
            Self::NegativeInfinity => "@ninf",
        }
    }

    /// The name the constant is written with, such as `pi`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
            Self::I => "i",
            Self::Infinity => "inf",
            Self::PositiveInfinity => "pinf",
            Self::NegativeInfinity => "ninf",
        }
    }

    /// Finds the constant written as `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|constant| constant.name() == name)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
