//! The expression grammar.
//!
//! Expressions are parsed with this precedence ladder, tightest-binding first:
//!
//! 1. atoms: a decimal literal, a function call `name(arg, ...)`, a variable (`x` or `u[i, j]`),
//!    a constant (`pi`), or a parenthesized expression;
//! 2. an optional sign, `+` or `-`, in front of an atom. A `+` leaves the atom as it is, and a
//!    `-` directly in front of a literal produces a negative number;
//! 3. an optional power, `unary ^ unary`. Powers do not chain: `a ^ b ^ c` must be parenthesized;
//! 4. products and quotients, folded from the left;
//! 5. sums and differences, folded from the left.
//!
//! Names are resolved through a [`Registry`] while parsing. Function names may be written with a
//! leading `@`, which is how operators are called by id, as in `@add(a, b, c)`.
//!
//! ```
//! use sym_compute::{expr::Variable, grammar::parse_expression, registry::Registry};
//!
//! let mut registry = Registry::default();
//! registry.add_variable(Variable::new("x").unwrap());
//!
//! let expr = parse_expression("3*x^2 - sin(x)", &registry).unwrap();
//! assert_eq!(expr.to_string(), "3 * x ^ 2 - sin(x)");
//! ```

pub mod error;

use crate::{
    expr::{ConstructionError, Expr, Variable},
    rational::Rational,
    registry::{LookupError, Registry},
};
use error::{
    ArgumentCount,
    ExpectedEof,
    InvalidLiteral,
    InvalidSyntax,
    UnexpectedEof,
    UnknownFunction,
    UnknownVariable,
};
use log::{debug, trace};
use sym_error::Error;
use sym_parser::{
    input::{Input, StrInput},
    number::decimal_text,
    primitive::char,
    recursive,
    text::ident,
    Failure,
    Parser,
    ParserExt,
    Recursive,
};

/// A name or literal was matched but could not be turned into an expression.
#[derive(Debug, thiserror::Error)]
enum AtomError {
    #[error("`{0}` is not a valid number")]
    Literal(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("the function call `{0}(...)` cannot be indexed")]
    IndexedCall(String),
}

impl AtomError {
    /// Builds the user-facing error for an atom starting at `start`.
    fn to_error(&self, start: usize, length: usize) -> Error {
        let span = |text: &str| vec![start..(start + text.chars().count()).min(length)];
        match self {
            Self::Literal(literal) => Error::new(span(literal), InvalidLiteral { literal: literal.clone() }),
            Self::Lookup(LookupError::UnknownFunction { name, suggestions }) => Error::new(
                span(name),
                UnknownFunction { name: name.clone(), suggestions: suggestions.clone() },
            ),
            Self::Lookup(LookupError::UnknownVariable { name, suggestions } | LookupError::UnknownConstant { name, suggestions }) => Error::new(
                span(name),
                UnknownVariable { name: name.clone(), suggestions: suggestions.clone() },
            ),
            Self::Construction(ConstructionError::ArgumentCount { function, expected, found }) => Error::new(
                span(function),
                ArgumentCount { name: function.clone(), expected: expected.to_string(), found: *found },
            ),
            Self::Construction(ConstructionError::NonFinite(value)) => Error::new(
                vec![start..(start + 1).min(length)],
                InvalidLiteral { literal: value.to_string() },
            ),
            Self::Construction(error) => Error::new(
                vec![start..(start + 1).min(length)],
                InvalidSyntax { message: error.to_string() },
            ),
            Self::IndexedCall(name) => Error::new(span(name), InvalidSyntax { message: self.to_string() }),
        }
    }
}

/// An identifier, optionally prefixed with `@`.
fn name<I: Input<Item = char>>() -> impl Parser<I, String> {
    char('@').optional().and(ident()).as_text()
}

/// An unsigned decimal literal, converted exactly.
fn literal<I: Input<Item = char>>() -> impl Parser<I, Rational> {
    decimal_text().try_map(|text: String| text.parse::<Rational>().map_err(|_| AtomError::Literal(text)))
}

/// Resolves a name followed by an optional argument list and optional indexes.
fn resolve(
    registry: &Registry,
    name: String,
    args: Option<Vec<Expr>>,
    indexes: Option<Vec<Expr>>,
) -> Result<Expr, AtomError> {
    match (args, indexes) {
        (Some(_), Some(_)) => Err(AtomError::IndexedCall(name)),
        (Some(args), None) => Ok(registry.function(&name)?.apply(args)?),
        (None, Some(indexes)) => {
            let variable = Variable::indexed(name, indexes)?;
            Ok(Expr::Variable(registry.variable(variable.id())?.clone()))
        },
        (None, None) => match registry.variable(&name) {
            Ok(variable) => Ok(Expr::Variable(variable.clone())),
            Err(error) => registry.constant(&name)
                .map(Expr::Constant)
                .map_err(|_| AtomError::Lookup(error)),
        },
    }
}

/// Builds the expression grammar over the given registry.
fn expression<'a, I>(registry: &'a Registry) -> Recursive<'a, I, Expr>
where
    I: Input<Item = char> + 'a,
{
    recursive(move |expr: Recursive<'a, I, Expr>| {
        let parenthesized = expr.clone().enclosed(char('('), char(')').trim_left());

        // `f()` or `f(a, b, ...)`; an argument that fails to parse is reported as is
        let arguments = char(')').trim_left().to(Vec::new())
            .or(expr.clone().separated_at_least_once(char(',')).then_ignore(char(')').trim_left()));
        let call = arguments.required_if(char('(').trim_left());
        let index = expr
            .separated_at_least_once(char(','))
            .then_ignore(char(']').trim_left())
            .required_if(char('[').trim_left());
        let named = name()
            .and(call)
            .and(index)
            .try_map(move |((name, args), indexes)| resolve(registry, name, args, indexes));

        let number = literal().try_map(|value| Expr::number(value).map_err(AtomError::from));
        let atom = number.or(parenthesized).or(named).trim();

        let negative = char('-')
            .ignore_then(literal().trim())
            .try_map(|value: Rational| Expr::number(-value).map_err(AtomError::from));
        let signed = char('+').or(char('-')).trim().optional()
            .and(atom)
            .map(|(sign, atom)| match sign {
                Some('-') => -atom,
                _ => atom,
            });
        let unary = negative.trim().or(signed).boxed();

        let power = unary.clone()
            .and(unary.required_if(char('^').trim()))
            .map(|(base, exponent)| match exponent {
                Some(exponent) => base.pow(exponent),
                None => base,
            });

        let product = power.fold_left(char('*').or(char('/')).trim(), |lhs, op, rhs| match op {
            '*' => lhs * rhs,
            _ => lhs / rhs,
        });

        product.fold_left(char('+').or(char('-')).trim(), |lhs, op, rhs| match op {
            '+' => lhs + rhs,
            _ => lhs - rhs,
        })
    })
}

/// Converts a parse failure into a user-facing error.
fn to_error(failure: Failure<StrInput<'_>>, source: &str) -> Error {
    let length = source.chars().count();
    let error = failure.error;
    let position = error.position.min(length);

    let cause = error.cause
        .as_deref()
        .and_then(|cause| cause.downcast_ref::<AtomError>());
    if let Some(cause) = cause {
        return cause.to_error(position, length);
    }

    if position == length {
        Error::new(vec![length..length], UnexpectedEof)
    } else if error.producer == "end" {
        Error::new(vec![position..length], ExpectedEof)
    } else {
        Error::new(vec![position..position + 1], InvalidSyntax { message: error.message.to_string() })
    }
}

/// A parser for whole expressions, resolving names through a [`Registry`].
#[derive(Debug, Clone, Copy)]
pub struct ExpressionParser<'r> {
    registry: &'r Registry,
}

impl<'r> ExpressionParser<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Parses the whole of `source` as one expression. Trailing input is an error.
    pub fn parse(&self, source: &str) -> Result<Expr, Error> {
        debug!("parsing `{}`", source);
        let grammar = expression(self.registry).trim().end();
        match grammar.parse(StrInput::new(source)) {
            Ok(success) => Ok(success.value),
            Err(failure) => {
                trace!("parse failed: {}", failure.error);
                Err(to_error(failure, source))
            },
        }
    }
}

/// Parses `source` as an expression, resolving names through `registry`.
pub fn parse_expression(source: &str, registry: &Registry) -> Result<Expr, Error> {
    ExpressionParser::new(registry).parse(source)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{expr::Constant, function::Operator};

    use super::*;

    fn registry() -> Registry {
        let mut registry = Registry::default();
        for name in ["a", "b", "x", "y", "i", "j"] {
            registry.add_variable(Variable::new(name).unwrap());
        }
        registry
    }

    fn parse(source: &str) -> Expr {
        parse_expression(source, &registry()).unwrap()
    }

    fn parse_err(source: &str) -> Error {
        parse_expression(source, &registry()).unwrap_err()
    }

    fn var(name: &str) -> Expr {
        Expr::from(Variable::new(name).unwrap())
    }

    fn operator(expr: &Expr) -> Option<Operator> {
        expr.as_operator().map(|(operator, _)| operator)
    }

    #[test]
    fn precedence_and_associativity() {
        let expr = parse("a + b * 5 / 2 - a * b * 5/7");
        let (top, args) = expr.as_operator().unwrap();
        assert_eq!(top, Operator::Subtract);
        assert_eq!(operator(&args[0]), Some(Operator::Add));

        let (right, chain) = args[1].as_operator().unwrap();
        assert_eq!(right, Operator::Divide);
        let (inner, product) = chain[0].as_operator().unwrap();
        assert_eq!(inner, Operator::Multiply);
        assert_eq!(operator(&product[0]), Some(Operator::Multiply));

        assert_eq!(expr.to_string(), "a + b * 5 / 2 - a * b * 5 / 7");
    }

    #[test]
    fn signs_and_literals() {
        assert_eq!(parse("25.2"), Expr::Number(Rational::new(126, 5)));
        assert_eq!(parse("-3"), Expr::from(-3));
        assert_eq!(parse("-x"), -var("x"));
        assert_eq!(parse("+x"), var("x"));
        assert_eq!(parse("a * +(b - 1)"), var("a") * (var("b") - Expr::from(1)));
        assert_eq!(parse(&var("x").plus().to_string()), var("x"));
        assert_eq!(parse("a * -3"), var("a") * Expr::from(-3));
        assert_eq!(parse("-x^2"), (-var("x")).pow(Expr::from(2)));
        assert_eq!(parse("  a  *  b  "), var("a") * var("b"));
    }

    #[test]
    fn names() {
        assert_eq!(parse("2 * pi"), Expr::from(2) * Expr::from(Constant::Pi));
        assert_eq!(parse("SIN(a)").to_string(), "sin(a)");
        assert_eq!(parse("cosh(x)").to_string(), "cosh(x)");

        let sum = parse("@add(a, b, a * b)");
        let (operator, args) = sum.as_operator().unwrap();
        assert_eq!((operator, args.len()), (Operator::Add, 3));
    }

    #[test]
    fn indexed_variables() {
        let mut registry = registry();
        let u = Variable::indexed("u", vec![var("i"), var("j") + Expr::from(1)]).unwrap();
        registry.add_variable(u.clone());
        assert_eq!(parse_expression("u[i,j+1] * 2", &registry).unwrap(), Expr::from(u) * Expr::from(2));
    }

    #[test]
    fn rendering_reparses() {
        for source in [
            "a - (b - a)",
            "-(a - b) ^ 2",
            "-(x ^ 2)",
            "-(-x)",
            "sin(a) ^ (b + 1)",
            "a / (b * x) - log(x + 1, e)",
            "x * -3 + y",
        ] {
            let expr = parse(source);
            assert_eq!(expr.to_string(), source);
            assert_eq!(parse(&expr.to_string()), expr);
        }
    }

    #[test]
    fn end_of_input() {
        let error = parse_err("a+");
        assert!(error.is::<UnexpectedEof>());
        assert_eq!(error.spans, vec![2..2]);

        let error = parse_err("(a");
        assert!(error.is::<UnexpectedEof>());

        let error = parse_err("a b");
        assert!(error.is::<ExpectedEof>());
        assert_eq!(error.spans, vec![2..3]);

        let error = parse_err("a ^ b ^ x");
        assert!(error.is::<ExpectedEof>());
    }

    #[test]
    fn unknown_names() {
        let error = parse_err("1 + sinn(x)");
        assert_eq!(
            error.downcast_ref::<UnknownFunction>(),
            Some(&UnknownFunction {
                name: "sinn".to_string(),
                suggestions: vec!["sin".to_string(), "sinh".to_string()],
            }),
        );
        assert_eq!(error.spans, vec![4..8]);

        let error = parse_err("f(sinn(x))");
        assert!(error.is::<UnknownFunction>());
        assert_eq!(error.spans, vec![2..6]);

        let error = parse_err("2 * z");
        assert_eq!(
            error.downcast_ref::<UnknownVariable>().map(|kind| kind.name.as_str()),
            Some("z"),
        );
    }

    #[test]
    fn argument_counts() {
        let error = parse_err("sin(x, y)");
        assert_eq!(
            error.downcast_ref::<ArgumentCount>(),
            Some(&ArgumentCount {
                name: "sin".to_string(),
                expected: "exactly 1".to_string(),
                found: 2,
            }),
        );
        assert!(parse_err("sin()").is::<ArgumentCount>());
    }

    #[test]
    fn oversized_literals() {
        let error = parse_err("2 * 1e2000000000");
        assert_eq!(
            error.downcast_ref::<InvalidLiteral>(),
            Some(&InvalidLiteral { literal: "1e2000000000".to_string() }),
        );
        assert_eq!(error.spans, vec![4..16]);

        assert_eq!(parse("1e3 * x"), Expr::from(1000) * var("x"));
    }

    #[test]
    fn invalid_syntax() {
        let error = parse_err("a * )");
        assert!(error.is::<InvalidSyntax>());
        assert_eq!(error.spans, vec![4..5]);
    }
}
