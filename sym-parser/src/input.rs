//! Persistent input cursors.
//!
//! A cursor is a cheap, immutable view of "the rest of the input". Advancing a cursor returns a
//! new cursor and leaves the old one untouched, so backtracking is just holding on to an older
//! cursor.

/// A persistent cursor over a sequence of items.
pub trait Input: Clone {
    /// The type of item produced by the cursor.
    type Item: Clone;

    /// The position of the cursor, counted in items from the start of the input.
    fn position(&self) -> usize;

    /// The item under the cursor, or [`None`] at the end of the input.
    fn current(&self) -> Option<Self::Item>;

    /// Returns a cursor pointing at the next item. At the end of the input, returns an
    /// equivalent cursor.
    fn advance(&self) -> Self;

    /// Returns true if there are no more items to read.
    fn is_eof(&self) -> bool {
        self.current().is_none()
    }
}

/// A cursor over the [`char`]s of a string slice.
///
/// [`Input::position`] counts characters, not bytes, so positions can be used directly as
/// spans when reporting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrInput<'a> {
    /// The complete source text.
    source: &'a str,

    /// The byte offset of the cursor in `source`.
    offset: usize,

    /// The character index of the cursor in `source`.
    position: usize,
}

impl<'a> StrInput<'a> {
    /// Creates a cursor at the start of the given source.
    pub fn new(source: &'a str) -> Self {
        Self { source, offset: 0, position: 0 }
    }

    /// Returns the complete source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Returns the unread part of the source text.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Returns the byte offset of the cursor in the source text.
    pub fn byte_offset(&self) -> usize {
        self.offset
    }
}

impl Input for StrInput<'_> {
    type Item = char;

    fn position(&self) -> usize {
        self.position
    }

    fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&self) -> Self {
        match self.current() {
            Some(c) => Self {
                source: self.source,
                offset: self.offset + c.len_utf8(),
                position: self.position + 1,
            },
            None => *self,
        }
    }
}

/// A cursor over a slice of arbitrary items, such as a pre-tokenized stream.
#[derive(Debug)]
pub struct SliceInput<'a, T> {
    items: &'a [T],
    index: usize,
}

impl<'a, T> SliceInput<'a, T> {
    /// Creates a cursor at the start of the given slice.
    pub fn new(items: &'a [T]) -> Self {
        Self { items, index: 0 }
    }

    /// Returns the unread items.
    pub fn remaining(&self) -> &'a [T] {
        &self.items[self.index..]
    }
}

impl<T> Clone for SliceInput<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SliceInput<'_, T> {}

impl<T: Clone> Input for SliceInput<'_, T> {
    type Item = T;

    fn position(&self) -> usize {
        self.index
    }

    fn current(&self) -> Option<T> {
        self.items.get(self.index).cloned()
    }

    fn advance(&self) -> Self {
        Self {
            items: self.items,
            index: (self.index + 1).min(self.items.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn str_input_counts_chars() {
        let start = StrInput::new("πr²");
        let after = start.advance().advance();
        assert_eq!(start.current(), Some('π'));
        assert_eq!(after.current(), Some('²'));
        assert_eq!(after.position(), 2);
        assert_eq!(after.byte_offset(), 3);
        assert_eq!(after.remaining(), "²");
    }

    #[test]
    fn advancing_past_end_is_stable() {
        let end = StrInput::new("a").advance();
        assert!(end.is_eof());
        assert_eq!(end.advance(), end);
        assert_eq!(end.position(), 1);
    }

    #[test]
    fn slice_input() {
        let items = [1, 2, 3];
        let cursor = SliceInput::new(&items).advance();
        assert_eq!(cursor.current(), Some(2));
        assert_eq!(cursor.remaining(), &[2, 3]);
        assert!(cursor.advance().advance().advance().is_eof());
    }
}
