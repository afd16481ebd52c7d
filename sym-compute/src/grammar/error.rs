use ariadne::Fmt;
use sym_attrs::ErrorKind;
use sym_error::EXPR;

/// Formats a list of suggested names as a help message.
fn suggestion_help(kind: &str, suggestions: &[String]) -> String {
    match suggestions {
        [] => format!("no {} with a similar name is registered", kind),
        [only] => format!("did you mean `{}`?", only.fg(EXPR)),
        _ => format!(
            "did you mean one of these? {}",
            suggestions.iter().map(|name| format!("`{}`", name.fg(EXPR))).collect::<Vec<_>>().join(", ")
        ),
    }
}

/// The end of the input was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("an {} should follow", "operand".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the input was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of input",
    labels = [format!("this input is left over after a complete {}", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// The input does not match the grammar.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid syntax",
    labels = [self.message.to_lowercase()],
)]
pub struct InvalidSyntax {
    /// What the parser expected to find.
    pub message: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown function `{}`", name),
    labels = ["no function is registered under this name"],
    help = suggestion_help("function", suggestions),
)]
pub struct UnknownFunction {
    pub name: String,

    /// Similarly named registered functions, closest first.
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown name `{}`", name),
    labels = ["neither a registered variable nor a constant"],
    help = suggestion_help("variable", suggestions),
)]
pub struct UnknownVariable {
    pub name: String,

    /// Similarly named registered variables and constants, closest first.
    pub suggestions: Vec<String>,
}

/// A numeric literal could not be converted to an exact number.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid number", literal),
    labels = ["this literal"],
)]
pub struct InvalidLiteral {
    pub literal: String,
}

/// A function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("wrong number of arguments to `{}`", name),
    labels = ["called here"],
    help = format!("`{}` takes {} argument(s), but {} were given", name.fg(EXPR), expected, found),
)]
pub struct ArgumentCount {
    pub name: String,

    /// The accepted number of arguments, such as `exactly 2`.
    pub expected: String,

    pub found: usize,
}
