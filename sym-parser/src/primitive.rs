//! Parsers that consume single items or fixed strings, plus a few that consume nothing.

use std::borrow::Cow;
use super::{
    error::ParsingError,
    input::Input,
    outcome::{Failure, ParseResult, Success},
    parser::{Boxed, Parser},
};

/// Compares two characters case-insensitively.
fn eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Consumes one item satisfying `predicate` (`Item`).
pub fn item<I, F>(predicate: F, message: impl Into<Cow<'static, str>>) -> impl Parser<I, I::Item>
where
    I: Input,
    F: Fn(&I::Item) -> bool,
{
    let message = message.into();
    move |input: I| -> ParseResult<I, I::Item> {
        match input.current() {
            Some(item) if predicate(&item) => Ok(Success::new(item, input.advance())),
            _ => Err(Failure::new(input, message.clone(), "item")),
        }
    }
}

/// Consumes any one item, failing only at the end of the input.
pub fn any<I: Input>() -> impl Parser<I, I::Item> {
    item(|_| true, "Unexpected end of input")
}

/// Consumes exactly the character `expected`.
pub fn char<I: Input<Item = char>>(expected: char) -> impl Parser<I, char> {
    move |input: I| -> ParseResult<I, char> {
        match input.current() {
            Some(c) if c == expected => Ok(Success::new(c, input.advance())),
            _ => Err(Failure::new(input, format!("'{}' expected", expected), "char")),
        }
    }
}

/// Consumes the character `expected`, ignoring case. Yields the character actually read.
pub fn char_ignore_case<I: Input<Item = char>>(expected: char) -> impl Parser<I, char> {
    move |input: I| -> ParseResult<I, char> {
        match input.current() {
            Some(c) if eq_ignore_case(c, expected) => Ok(Success::new(c, input.advance())),
            _ => Err(Failure::new(input, format!("'{}' expected", expected), "char_ignore_case")),
        }
    }
}

/// Consumes one character satisfying `predicate`.
pub fn char_if<I, F>(predicate: F, message: impl Into<Cow<'static, str>>) -> impl Parser<I, char>
where
    I: Input<Item = char>,
    F: Fn(&char) -> bool,
{
    let message = message.into();
    move |input: I| -> ParseResult<I, char> {
        match input.current() {
            Some(c) if predicate(&c) => Ok(Success::new(c, input.advance())),
            _ => Err(Failure::new(input, message.clone(), "char_if")),
        }
    }
}

/// Matches `expected` character by character, optionally ignoring case. The error is positioned
/// at the first mismatching character.
fn match_str<I: Input<Item = char>>(
    input: I,
    expected: &str,
    ignore_case: bool,
    producer: &'static str,
) -> Result<I, Failure<I>> {
    let mut cursor = input.clone();
    for c in expected.chars() {
        match cursor.current() {
            Some(found) if found == c || (ignore_case && eq_ignore_case(found, c)) => {
                cursor = cursor.advance();
            },
            _ => {
                let error = ParsingError::new(cursor.position(), format!("\"{}\" expected", expected), producer);
                return Err(Failure::from_error(input, error));
            },
        }
    }
    Ok(cursor)
}

/// Consumes exactly the string `expected`.
pub fn string<'a, I: Input<Item = char>>(expected: &'a str) -> impl Parser<I, &'a str> {
    move |input: I| -> ParseResult<I, &'a str> {
        let rest = match_str(input, expected, false, "string")?;
        Ok(Success::new(expected, rest))
    }
}

/// Consumes the string `expected`, ignoring case. Yields the text actually read.
pub fn string_ignore_case<'a, I: Input<Item = char>>(expected: &'a str) -> impl Parser<I, String> + 'a
where
    I: 'a,
{
    move |input: I| -> ParseResult<I, String> {
        let rest = match_str(input.clone(), expected, true, "string_ignore_case")?;
        let mut text = String::new();
        let mut cursor = input;
        while cursor.position() < rest.position() {
            text.extend(cursor.current());
            cursor = cursor.advance();
        }
        Ok(Success::new(text, rest))
    }
}

/// Succeeds with a clone of `value` without consuming input (`Value`).
pub fn value<I: Input, O: Clone>(value: O) -> impl Parser<I, O> {
    move |input: I| -> ParseResult<I, O> {
        Ok(Success::new(value.clone(), input))
    }
}

/// Always fails with `message` (`Error`).
pub fn fail<I: Input, O>(message: impl Into<Cow<'static, str>>) -> impl Parser<I, O> {
    let message = message.into();
    move |input: I| -> ParseResult<I, O> {
        Err(Failure::new(input, message.clone(), "fail"))
    }
}

/// Succeeds only at the end of the input.
pub fn eof<I: Input>() -> impl Parser<I, ()> {
    move |input: I| -> ParseResult<I, ()> {
        if input.is_eof() {
            Ok(Success::new((), input))
        } else {
            Err(Failure::new(input, "End of input expected", "eof"))
        }
    }
}

/// Builds the parser on every use (`Ref`). Useful for referring to a parser that is defined
/// later, at the cost of rebuilding it each time.
pub fn lazy<I, O, P, F>(make: F) -> impl Parser<I, O>
where
    I: Input,
    P: Parser<I, O>,
    F: Fn() -> P,
{
    move |input: I| -> ParseResult<I, O> {
        make().parse(input)
    }
}

/// Tries each alternative in order at the same cursor.
///
/// If all of them fail, the failure whose error lies furthest into the input is returned, with
/// later alternatives winning ties.
pub fn choice<'a, I, O>(alternatives: Vec<Boxed<'a, I, O>>) -> impl Parser<I, O> + 'a
where
    I: Input + 'a,
    O: 'a,
{
    move |input: I| -> ParseResult<I, O> {
        let mut best: Option<Failure<I>> = None;
        for alternative in &alternatives {
            match alternative.parse(input.clone()) {
                Ok(success) => return Ok(success),
                Err(failure) => {
                    if best.as_ref().map_or(true, |best| failure.error.position >= best.error.position) {
                        best = Some(failure);
                    }
                },
            }
        }
        Err(best.unwrap_or_else(|| Failure::new(input, "No alternatives to try", "choice")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use crate::{input::{SliceInput, StrInput}, parser::ParserExt};

    use super::*;

    #[test]
    fn char_and_string() {
        let success = char('a').parse(StrInput::new("ab")).unwrap();
        assert_eq!(success.value, 'a');
        assert_eq!(success.rest.position(), 1);

        let failure = string("let").parse(StrInput::new("lex")).unwrap_err();
        assert_eq!(failure.error.position, 2);
        assert_eq!(failure.rest.position(), 0);
        assert_eq!(failure.error.message, "\"let\" expected");
    }

    #[test]
    fn ignore_case() {
        assert_eq!(char_ignore_case('e').parse(StrInput::new("E")).unwrap().value, 'E');
        let success = string_ignore_case("inf").parse(StrInput::new("INF!")).unwrap();
        assert_eq!(success.value, "INF");
        assert_eq!(success.rest.current(), Some('!'));
    }

    #[test]
    fn item_over_slices() {
        let tokens = [3, 4, 5];
        let odd = item(|n: &i32| n % 2 == 1, "odd number expected");
        let success = odd.many().parse(SliceInput::new(&tokens)).unwrap();
        assert_eq!(success.value, vec![3]);
        assert_eq!(success.rest.position(), 1);
    }

    #[test]
    fn value_fail_eof() {
        assert_eq!(value::<_, i32>(7).parse(StrInput::new("x")).unwrap().value, 7);
        assert!(fail::<_, ()>("nope").parse(StrInput::new("")).is_err());
        assert!(eof().parse(StrInput::new("")).is_ok());
        assert!(eof().parse(StrInput::new("x")).is_err());
    }

    #[test]
    fn choice_reports_furthest() {
        let parser = choice(vec![
            string("abc").to(1).boxed(),
            string("abd").to(2).boxed(),
            char('x').to(3).boxed(),
        ]);
        assert_eq!(parser.parse(StrInput::new("abd")).unwrap().value, 2);
        let failure = parser.parse(StrInput::new("abz")).unwrap_err();
        assert_eq!(failure.error.position, 2);
        assert_eq!(failure.error.message, "\"abd\" expected");
    }
}
