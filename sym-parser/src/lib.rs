//! Backtracking parser combinators.
//!
//! A parser is a plain function from an input cursor to a [`ParseResult`]. Cursors
//! ([`input::Input`]) are persistent, so a parser that fails leaves nothing to undo: the caller
//! simply retries from the cursor it already holds. This makes alternation and optional grammar
//! trivial to express, at the cost of re-parsing on backtrack.
//!
//! Failures carry a [`ParsingError`] with the position at which parsing went wrong. When several
//! alternatives fail, [`ParserExt::or`] reports the one that got furthest into the input, which is
//! almost always the error the user wants to see.
//!
//! ```
//! use sym_parser::{input::StrInput, primitive::char, text::digits, Parser, ParserExt};
//!
//! let sum = digits()
//!     .map(|d: String| d.parse::<i64>().unwrap())
//!     .fold_left(char('+').trim(), |a: i64, _, b: i64| a + b)
//!     .end();
//!
//! assert_eq!(sum.parse(StrInput::new("1 + 2 + 39")).unwrap().value, 42);
//!
//! let failure = sum.parse(StrInput::new("1 + ")).unwrap_err();
//! assert_eq!(failure.error.position, 4);
//! ```

pub mod error;
pub mod input;
pub mod number;
pub mod outcome;
pub mod parser;
pub mod primitive;
pub mod recursive;
pub mod text;

pub use error::ParsingError;
pub use outcome::{Failure, ParseResult, Success};
pub use parser::{Boxed, Parser, ParserExt};
pub use recursive::{recursive, Recursive};
