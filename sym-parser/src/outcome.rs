use std::borrow::Cow;
use super::{error::ParsingError, input::Input};

/// The result of running a parser.
pub type ParseResult<I, O> = Result<Success<I, O>, Failure<I>>;

/// A successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Success<I, O> {
    /// The parsed value.
    pub value: O,

    /// The cursor after the consumed input.
    pub rest: I,

    /// Non-fatal diagnostics accumulated while parsing, in the order they were produced.
    pub corrections: Vec<ParsingError>,
}

impl<I, O> Success<I, O> {
    /// Creates a success with no corrections.
    pub fn new(value: O, rest: I) -> Self {
        Self { value, rest, corrections: Vec::new() }
    }

    /// Transforms the parsed value, keeping the cursor and corrections.
    pub fn map<U>(self, f: impl FnOnce(O) -> U) -> Success<I, U> {
        Success {
            value: f(self.value),
            rest: self.rest,
            corrections: self.corrections,
        }
    }

    /// Prepends corrections produced by earlier parsers.
    pub fn after(mut self, mut earlier: Vec<ParsingError>) -> Self {
        earlier.append(&mut self.corrections);
        self.corrections = earlier;
        self
    }
}

/// A failed parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure<I> {
    /// The cursor at which the failing parser was invoked.
    pub rest: I,

    /// Non-fatal diagnostics accumulated before the failure.
    pub corrections: Vec<ParsingError>,

    /// The error that caused the failure.
    pub error: ParsingError,
}

impl<I: Input> Failure<I> {
    /// Creates a failure positioned at the given cursor.
    pub fn new(rest: I, message: impl Into<Cow<'static, str>>, producer: &'static str) -> Self {
        let error = ParsingError::new(rest.position(), message, producer);
        Self { rest, corrections: Vec::new(), error }
    }
}

impl<I> Failure<I> {
    /// Creates a failure from an existing error.
    pub fn from_error(rest: I, error: ParsingError) -> Self {
        Self { rest, corrections: Vec::new(), error }
    }

    /// Moves the failure back to the cursor at which an enclosing parser was invoked, keeping the
    /// error and prepending corrections produced by earlier parsers.
    pub fn rewind(self, rest: I, mut earlier: Vec<ParsingError>) -> Self {
        earlier.extend(self.corrections);
        Self { rest, corrections: earlier, error: self.error }
    }

    /// Prepends corrections produced before this failure, keeping the cursor.
    pub(crate) fn rewind_corrections(mut self, mut earlier: Vec<ParsingError>) -> Self {
        earlier.append(&mut self.corrections);
        self.corrections = earlier;
        self
    }
}
