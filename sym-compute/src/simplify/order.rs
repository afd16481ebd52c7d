//! The canonical order of factors inside a term.

use crate::{expr::Expr, function::Operator};
use std::cmp::Ordering;

/// The kind of a node, in canonical order.
fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Number(_) => 0,
        Expr::Constant(_) => 1,
        Expr::Variable(_) => 2,
        Expr::Function(_) => 3,
    }
}

/// Splits a power into its base and exponent.
fn as_power(expr: &Expr) -> Option<(&Expr, &Expr)> {
    match expr.as_operator()? {
        (Operator::Power, [base, exponent]) => Some((base, exponent)),
        _ => None,
    }
}

/// Compares two factor bases.
///
/// Numbers come first, then constants, then variables by id, then functions by name and then by
/// arguments. A power `b ^ e` is ordered by its base `b`, right after `b` itself.
pub fn compare(lhs: &Expr, rhs: &Expr) -> Ordering {
    match (as_power(lhs), as_power(rhs)) {
        (Some((lhs_base, lhs_exp)), Some((rhs_base, rhs_exp))) => {
            return compare(lhs_base, rhs_base).then_with(|| compare(lhs_exp, rhs_exp));
        },
        (Some((lhs_base, _)), None) => return compare(lhs_base, rhs).then(Ordering::Greater),
        (None, Some((rhs_base, _))) => return compare(lhs, rhs_base).then(Ordering::Less),
        (None, None) => {},
    }

    match (lhs, rhs) {
        (Expr::Number(lhs), Expr::Number(rhs)) => lhs.total_cmp(rhs),
        (Expr::Constant(lhs), Expr::Constant(rhs)) => lhs.cmp(rhs),
        (Expr::Variable(lhs), Expr::Variable(rhs)) => lhs.cmp(rhs),
        (Expr::Function(lhs), Expr::Function(rhs)) => lhs.function().name()
            .cmp(rhs.function().name())
            .then_with(|| {
                lhs.args()
                    .iter()
                    .zip(rhs.args())
                    .map(|(lhs, rhs)| compare(lhs, rhs))
                    .find(|ordering| ordering.is_ne())
                    .unwrap_or_else(|| lhs.args().len().cmp(&rhs.args().len()))
            }),
        _ => rank(lhs).cmp(&rank(rhs)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{
        expr::{Constant, Variable},
        function::Builtin,
    };

    use super::*;

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name).unwrap())
    }

    #[test]
    fn kinds_in_order() {
        let mut factors = vec![
            Expr::builtin(Builtin::Sin, vec![var("x")]),
            var("y"),
            Expr::from(Constant::Pi),
            var("x"),
            Expr::from(2),
        ];
        factors.sort_by(compare);
        let rendered = factors.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(rendered, ["2", "pi", "x", "y", "sin(x)"]);
    }

    #[test]
    fn powers_follow_their_base() {
        let x = var("x");
        let power = x.clone().pow(var("n"));
        assert_eq!(compare(&x, &power), Ordering::Less);
        assert_eq!(compare(&power, &var("y")), Ordering::Less);
        assert_eq!(compare(&power, &power.clone()), Ordering::Equal);
    }

    #[test]
    fn functions_by_name_then_arguments() {
        let cos = Expr::builtin(Builtin::Cos, vec![var("y")]);
        let sin_x = Expr::builtin(Builtin::Sin, vec![var("x")]);
        let sin_y = Expr::builtin(Builtin::Sin, vec![var("y")]);
        assert_eq!(compare(&cos, &sin_x), Ordering::Less);
        assert_eq!(compare(&sin_x, &sin_y), Ordering::Less);
    }
}
