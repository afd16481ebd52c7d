//! Character-level helpers: whitespace, identifiers, quoted strings and comments.

use super::{
    input::Input,
    outcome::{ParseResult, Success},
    parser::{Parser, ParserExt},
    primitive::{any, char, char_if, string},
};

/// Skips zero or more whitespace characters (`Whitespaces`).
pub fn whitespace<I: Input<Item = char>>() -> impl Parser<I, ()> {
    move |input: I| -> ParseResult<I, ()> {
        let mut cursor = input;
        while cursor.current().is_some_and(|c| c.is_whitespace()) {
            cursor = cursor.advance();
        }
        Ok(Success::new((), cursor))
    }
}

/// Consumes a line break: `\r\n`, `\n` or `\r`.
pub fn newline<I: Input<Item = char>>() -> impl Parser<I, &'static str> {
    string("\r\n").or(string("\n")).or(string("\r"))
}

/// Consumes one or more ASCII digits.
pub fn digits<I: Input<Item = char>>() -> impl Parser<I, String> {
    char_if(|c| c.is_ascii_digit(), "Digit expected")
        .at_least_once()
        .as_text()
}

/// Consumes an identifier: a letter or `_`, followed by letters, digits or `_`.
pub fn ident<I: Input<Item = char>>() -> impl Parser<I, String> {
    let head = char_if(|c| c.is_alphabetic() || *c == '_', "Identifier expected");
    let tail = char_if(|c| c.is_alphanumeric() || *c == '_', "Identifier expected");
    head.and(tail.many()).as_text()
}

/// Consumes a double-quoted string, yielding its contents. A backslash escapes the next
/// character.
pub fn quoted_string<I: Input<Item = char>>() -> impl Parser<I, String> {
    let escaped = char('\\').ignore_then(any());
    let plain = char_if(|c| *c != '"' && *c != '\\', "String character expected");
    escaped
        .or(plain)
        .many()
        .map(|chars| chars.into_iter().collect::<String>())
        .enclosed(char('"'), char('"').with_message("Closing quote expected"))
}

/// Consumes characters up to and including `token`, yielding the text before it (`TillToken`).
pub fn till<I: Input<Item = char>>(token: &'static str) -> impl Parser<I, String> {
    any()
        .until(string(token))
        .map(|chars| chars.into_iter().collect::<String>())
        .with_message(format!("\"{}\" expected", token))
}

/// Consumes a comment from `prefix` to the end of the line, yielding its text. The line break is
/// not consumed.
pub fn line_comment<I: Input<Item = char>>(prefix: &'static str) -> impl Parser<I, String> {
    let body = char_if(|c| *c != '\n' && *c != '\r', "").many().as_text();
    string(prefix).ignore_then(body)
}

/// Consumes a comment delimited by `open` and `close`, yielding its text.
pub fn block_comment<I: Input<Item = char>>(
    open: &'static str,
    close: &'static str,
) -> impl Parser<I, String> {
    string(open).ignore_then(till(close))
}
