//! Recursive traversal of expression trees.
//!
//! Two traits cover the passes over an [`Expr`]:
//!
//! - [`Visitor`] walks a tree by reference, for passes that only gather information, such as
//!   [`VariableCollector`].
//! - [`Transform`] maps a tree to an output value, possibly failing. Simplification, approximation
//!   and substitution are transforms. Differentiation is not: it matches on the tree directly in
//!   [`crate::derivative::differentiate`].
//!
//! Both dispatch with an exhaustive match over the four kinds of node, so a new kind of node
//! cannot be forgotten by a pass.

use crate::{
    expr::{Constant, Expr, FunctionExpr, Variable},
    rational::Rational,
};
use std::collections::HashSet;

/// A pass that walks an expression tree by reference.
///
/// Every method has a default implementation. [`Visitor::visit_function`] visits the arguments
/// from left to right, so an implementation that only overrides the leaf methods still sees every
/// leaf of the tree.
pub trait Visitor {
    fn visit(&mut self, expr: &Expr) {
        match expr {
            Expr::Number(value) => self.visit_number(value),
            Expr::Constant(constant) => self.visit_constant(*constant),
            Expr::Variable(variable) => self.visit_variable(variable),
            Expr::Function(function) => self.visit_function(function),
        }
    }

    fn visit_number(&mut self, _: &Rational) {}

    fn visit_constant(&mut self, _: Constant) {}

    fn visit_variable(&mut self, _: &Variable) {}

    fn visit_function(&mut self, function: &FunctionExpr) {
        for arg in function.args() {
            self.visit(arg);
        }
    }
}

/// A pass that maps an expression tree to an output.
pub trait Transform {
    type Output;
    type Error;

    fn transform(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::Number(value) => self.transform_number(value),
            Expr::Constant(constant) => self.transform_constant(*constant),
            Expr::Variable(variable) => self.transform_variable(variable),
            Expr::Function(function) => self.transform_function(function),
        }
    }

    fn transform_number(&mut self, value: &Rational) -> Result<Self::Output, Self::Error>;

    fn transform_constant(&mut self, constant: Constant) -> Result<Self::Output, Self::Error>;

    fn transform_variable(&mut self, variable: &Variable) -> Result<Self::Output, Self::Error>;

    fn transform_function(&mut self, function: &FunctionExpr) -> Result<Self::Output, Self::Error>;
}

/// Gathers the distinct variables of a tree, in order of first appearance.
///
/// The indexes of an indexed variable are part of its identity and are not visited; `u[i]`
/// contributes `u[i]`, not `i`.
#[derive(Debug, Default)]
pub struct VariableCollector {
    seen: HashSet<String>,
    variables: Vec<Variable>,
}

impl VariableCollector {
    pub fn into_variables(self) -> Vec<Variable> {
        self.variables
    }
}

impl Visitor for VariableCollector {
    fn visit_variable(&mut self, variable: &Variable) {
        if self.seen.insert(variable.id().to_string()) {
            self.variables.push(variable.clone());
        }
    }
}
