use crate::expr::ConstructionError;
use once_cell::sync::Lazy;
use std::{fmt, sync::Arc};
use super::{Arity, Function};

#[cfg(feature = "numerical")]
use crate::approximate::EvalError;

/// The native implementation behind a [`PredefinedFunction`].
#[derive(Clone, Copy)]
pub enum Evaluator {
    /// A function of one argument.
    Unary(fn(f64) -> f64),

    /// A function of two arguments.
    Binary(fn(f64, f64) -> f64),

    /// A function of at least `min` arguments.
    Variadic {
        min: usize,
        eval: fn(&[f64]) -> f64,
    },

    /// A function with no numeric meaning, such as `diff`. It can appear in expressions but
    /// cannot be evaluated.
    Symbolic {
        arity: usize,
    },
}

impl Evaluator {
    pub fn arity(&self) -> Arity {
        match self {
            Self::Unary(_) => Arity::Exactly(1),
            Self::Binary(_) => Arity::Exactly(2),
            Self::Variadic { min, .. } => Arity::AtLeast(*min),
            Self::Symbolic { arity } => Arity::Exactly(*arity),
        }
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unary(_) => write!(f, "Unary"),
            Self::Binary(_) => write!(f, "Binary"),
            Self::Variadic { min, .. } => write!(f, "Variadic {{ min: {} }}", min),
            Self::Symbolic { arity } => write!(f, "Symbolic {{ arity: {} }}", arity),
        }
    }
}

/// The elementary functions known to the differentiator and the simplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Sqrt,
    Exp,
    Ln,

    /// `log(a, b)`, the logarithm of `a` in base `b`.
    Log,

    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,

    /// `diff(f, x)`, the derivative of `f` with respect to `x`. Resolved by simplification.
    Diff,
}

impl Builtin {
    /// Every builtin, in declaration order.
    pub const ALL: [Builtin; 11] = [
        Builtin::Sqrt,
        Builtin::Exp,
        Builtin::Ln,
        Builtin::Log,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Arcsin,
        Builtin::Arccos,
        Builtin::Arctan,
        Builtin::Diff,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Arcsin => "arcsin",
            Self::Arccos => "arccos",
            Self::Arctan => "arctan",
            Self::Diff => "diff",
        }
    }

    fn evaluator(self) -> Evaluator {
        match self {
            Self::Sqrt => Evaluator::Unary(f64::sqrt),
            Self::Exp => Evaluator::Unary(f64::exp),
            Self::Ln => Evaluator::Unary(f64::ln),
            Self::Log => Evaluator::Binary(f64::log),
            Self::Sin => Evaluator::Unary(f64::sin),
            Self::Cos => Evaluator::Unary(f64::cos),
            Self::Tan => Evaluator::Unary(f64::tan),
            Self::Arcsin => Evaluator::Unary(f64::asin),
            Self::Arccos => Evaluator::Unary(f64::acos),
            Self::Arctan => Evaluator::Unary(f64::atan),
            Self::Diff => Evaluator::Symbolic { arity: 2 },
        }
    }

    /// The shared function object for this builtin.
    pub fn function(self) -> Function {
        Function::Predefined(Arc::clone(&BUILTINS[self as usize]))
    }
}

/// One shared definition per builtin, indexed by the builtin's discriminant.
static BUILTINS: Lazy<[Arc<PredefinedFunction>; 11]> = Lazy::new(|| {
    Builtin::ALL.map(|builtin| Arc::new(PredefinedFunction {
        name: builtin.name().to_string(),
        builtin: Some(builtin),
        evaluator: builtin.evaluator(),
    }))
});

/// A function implemented natively on `f64`.
///
/// The elementary functions are predefined functions tagged with a [`Builtin`]. Callers may add
/// their own with [`PredefinedFunction::new`]; those have no tag, and the differentiator rejects
/// them.
#[derive(Debug, Clone)]
pub struct PredefinedFunction {
    name: String,
    builtin: Option<Builtin>,
    evaluator: Evaluator,
}

impl PredefinedFunction {
    /// Creates an untagged native function. Fails if `name` is empty.
    pub fn new(name: impl Into<String>, evaluator: Evaluator) -> Result<Self, ConstructionError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConstructionError::EmptyName);
        }
        Ok(Self { name, builtin: None, evaluator })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn builtin(&self) -> Option<Builtin> {
        self.builtin
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn arity(&self) -> Arity {
        self.evaluator.arity()
    }

    /// Evaluates the function on floating-point arguments.
    #[cfg(feature = "numerical")]
    pub fn evaluate(&self, args: &[f64]) -> Result<f64, EvalError> {
        match (&self.evaluator, args) {
            (Evaluator::Unary(eval), [a]) => Ok(eval(*a)),
            (Evaluator::Binary(eval), [a, b]) => Ok(eval(*a, *b)),
            (Evaluator::Variadic { min, eval }, _) if args.len() >= *min => Ok(eval(args)),
            (Evaluator::Symbolic { .. }, _) => Err(EvalError::NotEvaluable(self.name.clone())),
            _ => Err(EvalError::ArgumentCount {
                function: self.name.clone(),
                expected: self.arity(),
                found: args.len(),
            }),
        }
    }
}
