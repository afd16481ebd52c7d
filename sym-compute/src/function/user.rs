use crate::{
    expr::{ConstructionError, Expr, Variable},
    substitute::Substitution,
};
use super::Arity;

#[cfg(feature = "numerical")]
use crate::approximate::{approximate_with, EvalError};

/// A function defined symbolically by a body expression over a list of formal parameters.
///
/// Applying a user function keeps the call in the tree, as in `cot(x)`. The body is only used
/// when the call has to be looked into: [`UserFunction::expand`] substitutes the actual arguments
/// for the formals, which is how user functions are differentiated and evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    name: String,
    formals: Vec<Variable>,
    body: Expr,
}

impl UserFunction {
    /// Defines a function. Fails if the name is empty or a parameter is listed twice.
    pub fn new(name: impl Into<String>, formals: Vec<Variable>, body: Expr) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyName);
        }
        for (i, formal) in formals.iter().enumerate() {
            if formals[..i].contains(formal) {
                return Err(ConstructionError::DuplicateParameter(formal.id().to_string()));
            }
        }
        Ok(Self { name, formals, body })
    }

    /// Defines a function whose name and parameters are known to be valid.
    pub(crate) fn unchecked(name: &str, formals: Vec<Variable>, body: Expr) -> Self {
        Self { name: name.to_string(), formals, body }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formals(&self) -> &[Variable] {
        &self.formals
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    pub fn arity(&self) -> Arity {
        Arity::Exactly(self.formals.len())
    }

    /// Returns the body with each formal parameter replaced by the matching argument.
    pub fn expand(&self, args: &[Expr]) -> Result<Expr, ConstructionError> {
        if args.len() != self.formals.len() {
            return Err(ConstructionError::ArgumentCount {
                function: self.name.clone(),
                expected: self.arity(),
                found: args.len(),
            });
        }
        if self.formals.is_empty() {
            return Ok(self.body.clone());
        }

        let substitution = Substitution::from_lists(self.formals.clone(), args.to_vec())?;
        substitution.apply(&self.body)
    }

    /// Evaluates the body with the formals bound to the given values.
    #[cfg(feature = "numerical")]
    pub fn evaluate(&self, args: &[f64]) -> Result<f64, EvalError> {
        if args.len() != self.formals.len() {
            return Err(EvalError::ArgumentCount {
                function: self.name.clone(),
                expected: self.arity(),
                found: args.len(),
            });
        }

        let bindings = self.formals
            .iter()
            .map(|formal| formal.id().to_string())
            .zip(args.iter().copied())
            .collect();
        approximate_with(&self.body, &bindings)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::function::Builtin;

    use super::*;

    fn square() -> UserFunction {
        let t = Variable::new("t").unwrap();
        let body = Expr::from(t.clone()) * Expr::from(t.clone());
        UserFunction::new("square", vec![t], body).unwrap()
    }

    #[test]
    fn expand_substitutes_arguments() {
        let x = Expr::from(Variable::new("x").unwrap());
        let sin = Expr::builtin(Builtin::Sin, vec![x]);
        let expanded = square().expand(&[sin]).unwrap();
        assert_eq!(expanded.to_string(), "sin(x) * sin(x)");
    }

    #[test]
    fn rejects_bad_definitions() {
        let t = Variable::new("t").unwrap();
        assert_eq!(
            UserFunction::new("f", vec![t.clone(), t.clone()], Expr::from(1)),
            Err(ConstructionError::DuplicateParameter("t".to_string())),
        );
        assert_eq!(UserFunction::new("", vec![t], Expr::from(1)), Err(ConstructionError::EmptyName));
        assert!(square().expand(&[]).is_err());
    }

    #[cfg(feature = "numerical")]
    #[test]
    fn evaluation() {
        assert_eq!(square().evaluate(&[3.0]), Ok(9.0));
        assert!(square().evaluate(&[3.0, 4.0]).is_err());
    }
}
