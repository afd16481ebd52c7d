//! The standard library of user functions.
//!
//! These functions are defined symbolically in terms of the [`Builtin`]s, over the single formal
//! parameter `x`. The differentiator has closed-form rules for many of them (see
//! [`crate::derivative`]); the others are differentiated through their bodies.

use crate::expr::{Expr, Variable};
use once_cell::sync::Lazy;
use std::sync::Arc;
use super::{Builtin, Function, UserFunction};

fn call(builtin: Builtin, arg: Expr) -> Expr {
    Expr::builtin(builtin, vec![arg])
}

fn exp(arg: Expr) -> Expr {
    call(Builtin::Exp, arg)
}

fn ln(arg: Expr) -> Expr {
    call(Builtin::Ln, arg)
}

fn sqrt(arg: Expr) -> Expr {
    call(Builtin::Sqrt, arg)
}

fn one() -> Expr {
    Expr::from(1)
}

fn two() -> Expr {
    Expr::from(2)
}

/// Defines a library function of `x`.
fn define(name: &str, body: fn(Expr) -> Expr) -> Arc<UserFunction> {
    let x = Variable::named("x");
    let body = body(Expr::from(x.clone()));
    Arc::new(UserFunction::unchecked(name, vec![x], body))
}

static LIBRARY: Lazy<Vec<Arc<UserFunction>>> = Lazy::new(|| vec![
    define("cot", |x| one() / call(Builtin::Tan, x)),
    define("sec", |x| one() / call(Builtin::Cos, x)),
    define("cosec", |x| one() / call(Builtin::Sin, x)),

    define("arccot", |x| call(Builtin::Arctan, one() / x)),
    define("arcsec", |x| call(Builtin::Arccos, one() / x)),
    define("arccosec", |x| call(Builtin::Arcsin, one() / x)),

    define("sinh", |x| (exp(x.clone()) - exp(-x)) / two()),
    define("cosh", |x| (exp(x.clone()) + exp(-x)) / two()),
    define("tanh", |x| (exp(x.clone()) - exp(-x.clone())) / (exp(x.clone()) + exp(-x))),
    define("coth", |x| (exp(x.clone()) + exp(-x.clone())) / (exp(x.clone()) - exp(-x))),
    define("sech", |x| two() / (exp(x.clone()) + exp(-x))),
    define("csch", |x| two() / (exp(x.clone()) - exp(-x))),

    define("arcsinh", |x| ln(x.clone() + sqrt(x.clone() * x + one()))),
    define("arccosh", |x| ln(x.clone() + sqrt(x.clone() + one()) * sqrt(x - one()))),
    define("arctanh", |x| ln((one() + x.clone()) / (one() - x)) / two()),
    define("arccoth", |x| ln((x.clone() + one()) / (x - one())) / two()),
    define("arcsech", |x| {
        let recip = one() / x;
        ln(recip.clone() + sqrt(recip.clone() + one()) * sqrt(recip - one()))
    }),
    define("arccsch", |x| ln(one() / x.clone() + sqrt(one() / (x.clone() * x) + one()))),
]);

/// Every function of the standard library.
pub fn library() -> impl Iterator<Item = Function> {
    LIBRARY.iter().map(|function| Function::User(Arc::clone(function)))
}

/// Finds a standard library function by its lower-case name.
pub fn library_function(name: &str) -> Option<Function> {
    LIBRARY
        .iter()
        .find(|function| function.name() == name)
        .map(|function| Function::User(Arc::clone(function)))
}

/// Returns true if `function` is the standard library's own definition, not a user function that
/// happens to share its name.
pub(crate) fn is_library(function: &Arc<UserFunction>) -> bool {
    LIBRARY.iter().any(|defined| Arc::ptr_eq(defined, function))
}
