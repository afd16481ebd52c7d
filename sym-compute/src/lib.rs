//! Exact symbolic manipulation of algebraic expressions.
//!
//! Expressions are parsed from text with a [`Registry`] of known names, then simplified,
//! differentiated or rewritten by substitution. All arithmetic on numbers is exact: numbers are
//! [`Rational`]s over arbitrary-precision integers, so `0.1 + 0.2` simplifies to exactly `3/10`.
//!
//! ```
//! use sym_compute::{
//!     derivative::differentiate,
//!     expr::Variable,
//!     grammar::parse_expression,
//!     registry::Registry,
//!     simplify::simplify,
//! };
//!
//! let x = Variable::new("x").unwrap();
//! let mut registry = Registry::default();
//! registry.add_variable(x.clone());
//!
//! let expr = parse_expression("x ^ 3 + sin(x)", &registry).unwrap();
//! let derivative = simplify(&differentiate(&expr, &x).unwrap()).unwrap();
//! assert_eq!(derivative.to_string(), "3 * x ^ 2 + cos(x)");
//! ```
//!
//! Every transformation builds a new tree; expressions are never modified in place.
//!
//! # Features
//!
//! - `numerical` (default): floating-point approximation of expressions, in [`approximate`].
//! - `serde`: serialization of [`Rational`] and of the constant and operator tags.

#[cfg(feature = "numerical")]
pub mod approximate;
pub mod derivative;
pub mod expr;
pub mod function;
pub mod grammar;
pub mod rational;
pub mod registry;
pub mod simplify;
pub mod substitute;
pub mod visit;

pub use derivative::differentiate;
pub use expr::{Expr, Variable};
pub use grammar::parse_expression;
pub use rational::Rational;
pub use registry::Registry;
pub use simplify::simplify;
pub use substitute::Substitution;
