//! Runs an expression through the whole engine: parsing, simplification, substitution, numeric
//! approximation and differentiation.
//!
//! The expression is taken from the first argument, or defaults to `a + b * 2.5 - a * b`. The
//! variables `a` and `b` are registered.

use ariadne::Source;
use log::info;
use std::process::ExitCode;
use sym_compute::{
    derivative::{differentiate, DerivativeError},
    expr::{ConstructionError, Expr, Variable},
    grammar::parse_expression,
    rational::Rational,
    registry::Registry,
    simplify::{simplify, SimplifyError},
    substitute::Substitution,
};

#[cfg(feature = "numerical")]
use sym_compute::approximate::{approximate, EvalError};

const DEFAULT_SOURCE: &str = "a + b * 2.5 - a * b";

/// Utility enum to package errors that can occur in the pipeline.
enum Error {
    Parse(sym_error::Error),
    Construction(ConstructionError),
    Simplify(SimplifyError),
    Derivative(DerivativeError),
    #[cfg(feature = "numerical")]
    Eval(EvalError),
}

impl Error {
    /// Report the error to stderr. Parse errors are rendered against the source.
    fn report_to_stderr(&self, input: &str) {
        match self {
            Self::Parse(err) => {
                let report = err.build_report("input");
                if let Err(io) = report.eprint(("input", Source::from(input))) {
                    eprintln!("{}", io);
                }
            },
            Self::Construction(err) => eprintln!("error: {}", err),
            Self::Simplify(err) => eprintln!("error: {}", err),
            Self::Derivative(err) => eprintln!("error: {}", err),
            #[cfg(feature = "numerical")]
            Self::Eval(err) => eprintln!("error: {}", err),
        }
    }
}

impl From<sym_error::Error> for Error {
    fn from(err: sym_error::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<ConstructionError> for Error {
    fn from(err: ConstructionError) -> Self {
        Self::Construction(err)
    }
}

impl From<SimplifyError> for Error {
    fn from(err: SimplifyError) -> Self {
        Self::Simplify(err)
    }
}

impl From<DerivativeError> for Error {
    fn from(err: DerivativeError) -> Self {
        Self::Derivative(err)
    }
}

#[cfg(feature = "numerical")]
impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        Self::Eval(err)
    }
}

fn run(source: &str) -> Result<(), Error> {
    let a = Variable::new("a")?;
    let b = Variable::new("b")?;
    let mut registry = Registry::default();
    registry.add_variable(a.clone());
    registry.add_variable(b.clone());

    let expr = parse_expression(source, &registry)?;
    println!("input:       {}", expr);

    let simplified = simplify(&expr)?;
    println!("simplified:  {}", simplified);

    let substitution = Substitution::new(vec![
        (a.clone(), Expr::number(Rational::new(126, 5))?),
        (b, Expr::number(Rational::new(111, 10))?),
    ])?;
    let value = simplify(&substitution.apply(&simplified)?)?;
    println!("at a = 126/5, b = 111/10: {}", value);

    #[cfg(feature = "numerical")]
    println!("approximate: {}", approximate(&value)?);

    let derivative = simplify(&differentiate(&simplified, &a)?)?;
    println!("d/da:        {}", derivative);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let source = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    info!("running the pipeline on `{}`", source);

    match run(&source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report_to_stderr(&source);
            ExitCode::FAILURE
        },
    }
}
