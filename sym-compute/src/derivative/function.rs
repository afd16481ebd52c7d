//! Derivatives of function calls, with the chain rule applied.

use crate::{
    expr::{Expr, FunctionExpr, Variable},
    function::{is_library, library_function, Builtin, Function},
    simplify::simplify,
};
use super::{derivative, product, DerivativeError};

fn call(builtin: Builtin, arg: Expr) -> Expr {
    Expr::builtin(builtin, vec![arg])
}

pub(super) fn ln(arg: Expr) -> Expr {
    call(Builtin::Ln, arg)
}

fn sqrt(arg: Expr) -> Expr {
    call(Builtin::Sqrt, arg)
}

fn square(arg: Expr) -> Expr {
    arg.pow(Expr::from(2))
}

/// Calls a function of the standard library.
fn library_call(name: &str, arg: Expr) -> Result<Expr, DerivativeError> {
    let function = library_function(name)
        .ok_or_else(|| DerivativeError::Unsupported { function: name.to_string() })?;
    Ok(function.apply(vec![arg])?)
}

/// The derivative of a builtin function of one argument, evaluated at `x`.
fn builtin_rule(builtin: Builtin, x: &Expr) -> Option<Expr> {
    let x = x.clone();
    let one = || Expr::from(1);
    let derivative = match builtin {
        Builtin::Sqrt => one() / (Expr::from(2) * sqrt(x)),
        Builtin::Exp => call(Builtin::Exp, x),
        Builtin::Ln => one() / x,
        Builtin::Sin => call(Builtin::Cos, x),
        Builtin::Cos => -call(Builtin::Sin, x),
        Builtin::Tan => one() / square(call(Builtin::Cos, x)),
        Builtin::Arcsin => one() / sqrt(one() - square(x)),
        Builtin::Arccos => Expr::from(-1) / sqrt(one() - square(x)),
        Builtin::Arctan => one() / (one() + square(x)),
        Builtin::Log | Builtin::Diff => return None,
    };
    Some(derivative)
}

/// The derivative of a standard library function, evaluated at `x`. Library functions without a
/// rule, and user functions that only share a library name, are differentiated through their
/// bodies.
fn library_rule(name: &str, x: &Expr) -> Result<Option<Expr>, DerivativeError> {
    let x = x.clone();
    let one = || Expr::from(1);
    let sin = |x| call(Builtin::Sin, x);
    let cos = |x| call(Builtin::Cos, x);

    let derivative = match name {
        "cot" => Expr::from(-1) / square(sin(x)),
        "sec" => sin(x.clone()) / square(cos(x)),
        "cosec" => -cos(x.clone()) / square(sin(x)),
        "arccot" => Expr::from(-1) / (one() + square(x)),
        "sinh" => library_call("cosh", x)?,
        "cosh" => library_call("sinh", x)?,
        "tanh" => one() / square(library_call("cosh", x)?),
        "coth" => Expr::from(-1) / square(library_call("sinh", x)?),
        "arcsinh" => one() / sqrt(square(x) + one()),
        "arccosh" => one() / sqrt(square(x) - one()),
        "arctanh" | "arccoth" => one() / (one() - square(x)),
        _ => return Ok(None),
    };
    Ok(Some(derivative))
}

/// Computes the derivative of a function call and applies the chain rule.
pub(super) fn function_derivative(expr: &FunctionExpr, with: &Variable) -> Result<Expr, DerivativeError> {
    let args = expr.args();
    match expr.function() {
        Function::Predefined(function) => match (function.builtin(), args) {
            (Some(Builtin::Diff), _) => {
                let resolved = simplify(&Expr::Function(expr.clone()))?;
                derivative(&resolved, with)
            },
            (Some(Builtin::Log), [value, base]) => {
                derivative(&(ln(value.clone()) / ln(base.clone())), with)
            },
            (Some(builtin), [arg]) => match builtin_rule(builtin, arg) {
                Some(outer) => Ok(product([outer, derivative(arg, with)?])),
                None => Err(DerivativeError::Unsupported { function: function.name().to_string() }),
            },
            _ => Err(DerivativeError::Unsupported { function: function.name().to_string() }),
        },
        Function::User(function) => {
            if let (true, [arg]) = (is_library(function), args) {
                if let Some(outer) = library_rule(function.name(), arg)? {
                    return Ok(product([outer, derivative(arg, with)?]));
                }
            }
            derivative(&function.expand(args)?, with)
        },
        Function::Operator(operator) => Err(DerivativeError::Unsupported { function: operator.id().to_string() }),
    }
}
