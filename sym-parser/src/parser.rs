use std::{borrow::Cow, error::Error, rc::Rc};
use super::{
    error::ParsingError,
    input::Input,
    outcome::{Failure, ParseResult, Success},
    text::whitespace,
};

/// A parser: a function from an input cursor to a [`ParseResult`].
///
/// Any `Fn(I) -> ParseResult<I, O>` is a parser. The adapters in [`ParserExt`] build larger
/// parsers out of smaller ones.
pub trait Parser<I: Input, O> {
    /// Runs the parser at the given cursor.
    fn parse(&self, input: I) -> ParseResult<I, O>;
}

impl<I: Input, O, F> Parser<I, O> for F
where
    F: Fn(I) -> ParseResult<I, O>,
{
    fn parse(&self, input: I) -> ParseResult<I, O> {
        self(input)
    }
}

/// A type-erased, cheaply cloneable parser.
pub struct Boxed<'a, I: Input, O>(Rc<dyn Parser<I, O> + 'a>);

impl<I: Input, O> Clone for Boxed<'_, I, O> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<I: Input, O> Parser<I, O> for Boxed<'_, I, O> {
    fn parse(&self, input: I) -> ParseResult<I, O> {
        self.0.parse(input)
    }
}

/// Parses the first element of a separated list and then repeatedly a separator followed by an
/// element. Stops cleanly when the separator does not match; an element missing after a
/// matched separator is a failure.
fn separated_tail<I, O, S>(
    element: &impl Parser<I, O>,
    separator: &impl Parser<I, S>,
    start: I,
    first: Success<I, O>,
) -> ParseResult<I, Vec<O>>
where
    I: Input,
{
    let mut values = vec![first.value];
    let mut corrections = first.corrections;
    let mut rest = first.rest;

    loop {
        let Ok(divider) = separator.parse(rest.clone()) else {
            break;
        };
        match element.parse(divider.rest) {
            Ok(next) => {
                corrections.extend(divider.corrections);
                corrections.extend(next.corrections);
                values.push(next.value);
                rest = next.rest;
            },
            Err(failure) => return Err(failure.rewind(start, corrections)),
        }
    }

    Ok(Success { value: values, rest, corrections })
}

/// Greedily applies `element`, appending to `values`, until it fails or stops consuming input.
fn collect_many<I: Input, O>(
    element: &impl Parser<I, O>,
    mut values: Vec<O>,
    mut corrections: Vec<ParsingError>,
    mut rest: I,
) -> Success<I, Vec<O>> {
    while let Ok(next) = element.parse(rest.clone()) {
        if next.rest.position() == rest.position() {
            break;
        }
        values.push(next.value);
        corrections.extend(next.corrections);
        rest = next.rest;
    }

    Success { value: values, rest, corrections }
}

/// Adapters available on every [`Parser`].
pub trait ParserExt<I: Input, O>: Parser<I, O> + Sized {
    /// Transforms the parsed value (`Select`).
    fn map<U, F>(self, f: F) -> impl Parser<I, U>
    where
        F: Fn(O) -> U,
    {
        move |input: I| -> ParseResult<I, U> {
            self.parse(input).map(|success| success.map(&f))
        }
    }

    /// Replaces the parsed value with a clone of `value`.
    fn to<U: Clone>(self, value: U) -> impl Parser<I, U> {
        self.map(move |_| value.clone())
    }

    /// Feeds the parsed value to `f` and runs the parser it returns on the remaining input
    /// (`SelectMany`). A failure of either step fails the whole sequence at the original cursor.
    fn then<U, P, F>(self, f: F) -> impl Parser<I, U>
    where
        P: Parser<I, U>,
        F: Fn(O) -> P,
    {
        move |input: I| -> ParseResult<I, U> {
            let first = self.parse(input.clone())?;
            match f(first.value).parse(first.rest) {
                Ok(second) => Ok(second.after(first.corrections)),
                Err(failure) => Err(failure.rewind(input, first.corrections)),
            }
        }
    }

    /// Runs `other` after this parser and yields both values.
    fn and<U, P>(self, other: P) -> impl Parser<I, (O, U)>
    where
        P: Parser<I, U>,
    {
        move |input: I| -> ParseResult<I, (O, U)> {
            let first = self.parse(input.clone())?;
            match other.parse(first.rest) {
                Ok(second) => {
                    let joined = Success {
                        value: (first.value, second.value),
                        rest: second.rest,
                        corrections: second.corrections,
                    };
                    Ok(joined.after(first.corrections))
                },
                Err(failure) => Err(failure.rewind(input, first.corrections)),
            }
        }
    }

    /// Runs `other` after this parser, keeping only this parser's value.
    fn then_ignore<U, P>(self, other: P) -> impl Parser<I, O>
    where
        P: Parser<I, U>,
    {
        self.and(other).map(|(value, _)| value)
    }

    /// Runs `other` after this parser, keeping only the value of `other`.
    fn ignore_then<U, P>(self, other: P) -> impl Parser<I, U>
    where
        P: Parser<I, U>,
    {
        self.and(other).map(|(_, value)| value)
    }

    /// Tries this parser, then `other` at the same cursor.
    ///
    /// If both fail, the failure whose error lies furthest into the input is returned. On a tie,
    /// an error with a cause beats one without, since it comes from input that was matched but
    /// rejected. Otherwise the error of `other` wins.
    fn or<P>(self, other: P) -> impl Parser<I, O>
    where
        P: Parser<I, O>,
    {
        move |input: I| -> ParseResult<I, O> {
            let first = match self.parse(input.clone()) {
                Ok(success) => return Ok(success),
                Err(failure) => failure,
            };
            match other.parse(input) {
                Ok(success) => Ok(success),
                Err(second) if second.error.position > first.error.position => Err(second),
                Err(second) if second.error.position == first.error.position
                    && (second.error.cause.is_some() || first.error.cause.is_none()) => Err(second),
                Err(_) => Err(first),
            }
        }
    }

    /// Applies the parser zero or more times.
    ///
    /// Repetition ends at the first failure, or when the parser succeeds without consuming input.
    fn many(self) -> impl Parser<I, Vec<O>> {
        move |input: I| -> ParseResult<I, Vec<O>> {
            Ok(collect_many(&self, Vec::new(), Vec::new(), input))
        }
    }

    /// Applies the parser one or more times. Fails with the first attempt's error if it does not
    /// match at least once.
    fn at_least_once(self) -> impl Parser<I, Vec<O>> {
        move |input: I| -> ParseResult<I, Vec<O>> {
            let first = self.parse(input)?;
            Ok(collect_many(&self, vec![first.value], first.corrections, first.rest))
        }
    }

    /// Parses zero or more elements separated by `separator`.
    fn separated_by<S, P>(self, separator: P) -> impl Parser<I, Vec<O>>
    where
        P: Parser<I, S>,
    {
        move |input: I| -> ParseResult<I, Vec<O>> {
            match self.parse(input.clone()) {
                Ok(first) => separated_tail(&self, &separator, input, first),
                Err(_) => Ok(Success::new(Vec::new(), input)),
            }
        }
    }

    /// Parses one or more elements separated by `separator`.
    fn separated_at_least_once<S, P>(self, separator: P) -> impl Parser<I, Vec<O>>
    where
        P: Parser<I, S>,
    {
        move |input: I| -> ParseResult<I, Vec<O>> {
            let first = self.parse(input.clone())?;
            separated_tail(&self, &separator, input, first)
        }
    }

    /// Parses one or more elements separated by `operator`, folding them from the left with
    /// `combine(left, operator, right)`.
    fn fold_left<T, P, F>(self, operator: P, combine: F) -> impl Parser<I, O>
    where
        P: Parser<I, T>,
        F: Fn(O, T, O) -> O,
    {
        move |input: I| -> ParseResult<I, O> {
            let first = self.parse(input.clone())?;
            let mut value = first.value;
            let mut corrections = first.corrections;
            let mut rest = first.rest;

            loop {
                let Ok(op) = operator.parse(rest.clone()) else {
                    break;
                };
                match self.parse(op.rest) {
                    Ok(next) => {
                        corrections.extend(op.corrections);
                        corrections.extend(next.corrections);
                        value = combine(value, op.value, next.value);
                        rest = next.rest;
                    },
                    Err(failure) => return Err(failure.rewind(input, corrections)),
                }
            }

            Ok(Success { value, rest, corrections })
        }
    }

    /// Applies the parser repeatedly until `condition` matches. The match of `condition` is
    /// consumed but its value is discarded. Running out of input before `condition` matches is a
    /// failure.
    fn until<C, P>(self, condition: P) -> impl Parser<I, Vec<O>>
    where
        P: Parser<I, C>,
    {
        move |input: I| -> ParseResult<I, Vec<O>> {
            let mut values = Vec::new();
            let mut corrections = Vec::new();
            let mut rest = input.clone();

            loop {
                if let Ok(stop) = condition.parse(rest.clone()) {
                    corrections.extend(stop.corrections);
                    return Ok(Success { value: values, rest: stop.rest, corrections });
                }
                match self.parse(rest.clone()) {
                    Ok(next) if next.rest.position() == rest.position() => {
                        let error = ParsingError::new(rest.position(), "Parser made no progress", "until");
                        return Err(Failure::from_error(input, error).rewind_corrections(corrections));
                    },
                    Ok(next) => {
                        corrections.extend(next.corrections);
                        values.push(next.value);
                        rest = next.rest;
                    },
                    Err(failure) => return Err(failure.rewind(input, corrections)),
                }
            }
        }
    }

    /// Like [`ParserExt::until`], but consecutive elements must be separated by `divider`.
    ///
    /// The condition is checked before every element, at the cursor reached so far.
    fn until_separated<C, D, P, Q>(self, condition: P, divider: Q) -> impl Parser<I, Vec<O>>
    where
        P: Parser<I, C>,
        Q: Parser<I, D>,
    {
        move |input: I| -> ParseResult<I, Vec<O>> {
            let mut values = Vec::new();
            let mut corrections = Vec::new();
            let mut rest = input.clone();

            loop {
                if let Ok(stop) = condition.parse(rest.clone()) {
                    corrections.extend(stop.corrections);
                    return Ok(Success { value: values, rest: stop.rest, corrections });
                }

                let before = rest.position();
                if !values.is_empty() {
                    match divider.parse(rest.clone()) {
                        Ok(divided) => {
                            corrections.extend(divided.corrections);
                            rest = divided.rest;
                        },
                        Err(failure) => return Err(failure.rewind(input, corrections)),
                    }
                }
                match self.parse(rest.clone()) {
                    Ok(next) => {
                        corrections.extend(next.corrections);
                        values.push(next.value);
                        rest = next.rest;
                    },
                    Err(failure) => return Err(failure.rewind(input, corrections)),
                }

                if rest.position() == before {
                    let error = ParsingError::new(before, "Parser made no progress", "until_separated");
                    return Err(Failure::from_error(input, error).rewind_corrections(corrections));
                }
            }
        }
    }

    /// Applies the parser exactly `times` times in sequence.
    fn repeat(self, times: usize) -> impl Parser<I, Vec<O>> {
        move |input: I| -> ParseResult<I, Vec<O>> {
            let mut values = Vec::with_capacity(times);
            let mut corrections = Vec::new();
            let mut rest = input.clone();

            for _ in 0..times {
                match self.parse(rest) {
                    Ok(next) => {
                        corrections.extend(next.corrections);
                        values.push(next.value);
                        rest = next.rest;
                    },
                    Err(failure) => return Err(failure.rewind(input, corrections)),
                }
            }

            Ok(Success { value: values, rest, corrections })
        }
    }

    /// Makes the parser optional: a failure becomes [`None`] without consuming input.
    fn optional(self) -> impl Parser<I, Option<O>> {
        move |input: I| -> ParseResult<I, Option<O>> {
            match self.parse(input.clone()) {
                Ok(success) => Ok(success.map(Some)),
                Err(_) => Ok(Success::new(None, input)),
            }
        }
    }

    /// Makes the parser optional, yielding a clone of `default` when it fails.
    fn optional_or(self, default: O) -> impl Parser<I, O>
    where
        O: Clone,
    {
        self.optional().map(move |value| value.unwrap_or_else(|| default.clone()))
    }

    /// Runs the parser only if `prefix` matches first.
    ///
    /// If `prefix` does not match, succeeds with [`None`] without consuming input. If it does, the
    /// parser is mandatory and its failure fails the whole combinator.
    fn required_if<T, P>(self, prefix: P) -> impl Parser<I, Option<O>>
    where
        P: Parser<I, T>,
    {
        move |input: I| -> ParseResult<I, Option<O>> {
            match prefix.parse(input.clone()) {
                Err(_) => Ok(Success::new(None, input)),
                Ok(matched) => match self.parse(matched.rest) {
                    Ok(success) => Ok(success.map(Some).after(matched.corrections)),
                    Err(failure) => Err(failure.rewind(input, matched.corrections)),
                },
            }
        }
    }

    /// Transforms the parsed value with a fallible function.
    ///
    /// An [`Err`] returned by `f` becomes a parse failure positioned where this parser started,
    /// with the error's message and the error itself kept as the cause (`Catch`).
    fn try_map<U, E, F>(self, f: F) -> impl Parser<I, U>
    where
        E: Error + Send + Sync + 'static,
        F: Fn(O) -> Result<U, E>,
    {
        move |input: I| -> ParseResult<I, U> {
            let success = self.parse(input.clone())?;
            match f(success.value) {
                Ok(value) => Ok(Success {
                    value,
                    rest: success.rest,
                    corrections: success.corrections,
                }),
                Err(err) => {
                    let error = ParsingError::new(input.position(), err.to_string(), "try_map")
                        .with_cause(err);
                    Err(Failure { rest: input, corrections: success.corrections, error })
                },
            }
        }
    }

    /// Fails with `message` at the starting cursor if the parsed value does not satisfy
    /// `predicate` (`Where`).
    fn filter<F>(self, predicate: F, message: impl Into<Cow<'static, str>>) -> impl Parser<I, O>
    where
        F: Fn(&O) -> bool,
    {
        let message = message.into();
        move |input: I| -> ParseResult<I, O> {
            let success = self.parse(input.clone())?;
            if predicate(&success.value) {
                Ok(success)
            } else {
                Err(Failure::new(input, message.clone(), "filter"))
            }
        }
    }

    /// Replaces the message of any failure of this parser.
    fn with_message(self, message: impl Into<Cow<'static, str>>) -> impl Parser<I, O> {
        let message = message.into();
        move |input: I| -> ParseResult<I, O> {
            self.parse(input).map_err(|mut failure| {
                failure.error.message = message.clone();
                failure
            })
        }
    }

    /// Recovers from a failure by yielding a clone of `value` without consuming input. The error
    /// is kept as a correction.
    fn recover(self, value: O) -> impl Parser<I, O>
    where
        O: Clone,
    {
        move |input: I| -> ParseResult<I, O> {
            match self.parse(input.clone()) {
                Ok(success) => Ok(success),
                Err(failure) => {
                    let mut corrections = failure.corrections;
                    corrections.push(failure.error);
                    Ok(Success { value: value.clone(), rest: input, corrections })
                },
            }
        }
    }

    /// Surrounds the parser with `open` and `close`, keeping only the inner value.
    fn enclosed<A, B, P, Q>(self, open: P, close: Q) -> impl Parser<I, O>
    where
        P: Parser<I, A>,
        Q: Parser<I, B>,
    {
        open.ignore_then(self).then_ignore(close)
    }

    /// Requires the parser to consume the whole input (`Eof`).
    fn end(self) -> impl Parser<I, O> {
        move |input: I| -> ParseResult<I, O> {
            let success = self.parse(input.clone())?;
            if success.rest.is_eof() {
                Ok(success)
            } else {
                let error = ParsingError::new(success.rest.position(), "End of input expected", "end");
                Err(Failure { rest: input, corrections: success.corrections, error })
            }
        }
    }

    /// Yields the text consumed by the parser instead of its value.
    fn as_text(self) -> impl Parser<I, String>
    where
        I: Input<Item = char>,
    {
        move |input: I| -> ParseResult<I, String> {
            let success = self.parse(input.clone())?;
            let mut text = String::new();
            let mut cursor = input;
            while cursor.position() < success.rest.position() {
                let Some(c) = cursor.current() else {
                    break;
                };
                text.push(c);
                cursor = cursor.advance();
            }
            Ok(Success { value: text, rest: success.rest, corrections: success.corrections })
        }
    }

    /// Skips whitespace on both sides of the parser.
    fn trim(self) -> impl Parser<I, O>
    where
        I: Input<Item = char>,
    {
        whitespace().ignore_then(self).then_ignore(whitespace())
    }

    /// Skips whitespace before the parser.
    fn trim_left(self) -> impl Parser<I, O>
    where
        I: Input<Item = char>,
    {
        whitespace().ignore_then(self)
    }

    /// Skips whitespace after the parser.
    fn trim_right(self) -> impl Parser<I, O>
    where
        I: Input<Item = char>,
    {
        self.then_ignore(whitespace())
    }

    /// Erases the type of the parser.
    fn boxed<'a>(self) -> Boxed<'a, I, O>
    where
        Self: 'a,
    {
        Boxed(Rc::new(self))
    }
}

impl<I: Input, O, P: Parser<I, O>> ParserExt<I, O> for P {}
