//! Replacement of variables by expressions.

use crate::{
    expr::{ConstructionError, Constant, Expr, FunctionExpr, Variable},
    rational::Rational,
    visit::Transform,
};
use log::debug;
use std::collections::HashMap;

/// A set of bindings from variables to expressions.
///
/// Applying a substitution replaces every occurrence of a bound variable by its expression.
/// Unbound variables, numbers and constants are left as they are. The replacement is not
/// recursive: a bound expression that mentions a bound variable is inserted unchanged.
///
/// ```
/// use sym_compute::{expr::{Expr, Variable}, substitute::Substitution};
///
/// let x = Variable::new("x").unwrap();
/// let y = Variable::new("y").unwrap();
/// let expr = Expr::from(x.clone()) * Expr::from(y.clone());
///
/// let substitution = Substitution::new(vec![(x, Expr::from(3))]).unwrap();
/// assert_eq!(substitution.apply(&expr).unwrap().to_string(), "3 * y");
/// ```
#[derive(Debug, Clone)]
pub struct Substitution {
    bindings: HashMap<String, Expr>,
}

impl Substitution {
    /// Creates a substitution from a list of bindings. Fails if the list is empty or binds the
    /// same variable twice.
    pub fn new(bindings: Vec<(Variable, Expr)>) -> Result<Self, ConstructionError> {
        if bindings.is_empty() {
            return Err(ConstructionError::EmptySubstitution);
        }

        let mut map = HashMap::with_capacity(bindings.len());
        for (variable, value) in bindings {
            if map.insert(variable.id().to_string(), value).is_some() {
                return Err(ConstructionError::DuplicateBinding(variable.id().to_string()));
            }
        }
        Ok(Self { bindings: map })
    }

    /// Creates a substitution binding `variables[i]` to `values[i]`. Fails if the lists have
    /// different lengths, in addition to the checks of [`Substitution::new`].
    pub fn from_lists(variables: Vec<Variable>, values: Vec<Expr>) -> Result<Self, ConstructionError> {
        if variables.len() != values.len() {
            return Err(ConstructionError::MismatchedBindings {
                variables: variables.len(),
                values: values.len(),
            });
        }
        Self::new(variables.into_iter().zip(values).collect())
    }

    /// Returns the expression bound to a variable, if any.
    pub fn get(&self, variable: &Variable) -> Option<&Expr> {
        self.bindings.get(variable.id())
    }

    /// Applies the substitution, building a new tree.
    pub fn apply(&self, expr: &Expr) -> Result<Expr, ConstructionError> {
        debug!("substituting {} binding(s) into `{}`", self.bindings.len(), expr);
        Applier(self).transform(expr)
    }
}

struct Applier<'a>(&'a Substitution);

impl Transform for Applier<'_> {
    type Output = Expr;
    type Error = ConstructionError;

    fn transform_number(&mut self, value: &Rational) -> Result<Expr, ConstructionError> {
        Ok(Expr::Number(value.clone()))
    }

    fn transform_constant(&mut self, constant: Constant) -> Result<Expr, ConstructionError> {
        Ok(Expr::Constant(constant))
    }

    fn transform_variable(&mut self, variable: &Variable) -> Result<Expr, ConstructionError> {
        Ok(self.0.get(variable).cloned().unwrap_or_else(|| Expr::Variable(variable.clone())))
    }

    fn transform_function(&mut self, function: &FunctionExpr) -> Result<Expr, ConstructionError> {
        let args = function.args()
            .iter()
            .map(|arg| self.transform(arg))
            .collect::<Result<Vec<_>, _>>()?;
        FunctionExpr::new(function.function().clone(), args).map(Expr::Function)
    }
}
