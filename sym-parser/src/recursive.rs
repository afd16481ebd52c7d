use once_cell::unsync::OnceCell;
use std::rc::{Rc, Weak};
use super::{
    input::Input,
    outcome::{Failure, ParseResult},
    parser::{Boxed, Parser, ParserExt},
};

type Slot<'a, I, O> = OnceCell<Boxed<'a, I, O>>;

enum Handle<T> {
    Owned(Rc<T>),
    Weak(Weak<T>),
}

/// A parser that can refer to itself.
///
/// Created with [`recursive`]. The handle passed to the definition only holds a weak reference, so
/// a recursive grammar does not form a reference cycle.
pub struct Recursive<'a, I: Input, O> {
    slot: Handle<Slot<'a, I, O>>,
}

impl<I: Input, O> Clone for Recursive<'_, I, O> {
    fn clone(&self) -> Self {
        let slot = match &self.slot {
            Handle::Owned(rc) => Handle::Owned(Rc::clone(rc)),
            Handle::Weak(weak) => Handle::Weak(Weak::clone(weak)),
        };
        Self { slot }
    }
}

impl<I: Input, O> Parser<I, O> for Recursive<'_, I, O> {
    fn parse(&self, input: I) -> ParseResult<I, O> {
        let slot = match &self.slot {
            Handle::Owned(rc) => Some(Rc::clone(rc)),
            Handle::Weak(weak) => weak.upgrade(),
        };
        match slot.as_deref().and_then(OnceCell::get) {
            Some(parser) => parser.parse(input),
            None => Err(Failure::new(input, "Recursive parser used outside of its definition", "recursive")),
        }
    }
}

/// Defines a parser in terms of itself.
///
/// `define` receives a handle to the parser being defined and returns its definition.
pub fn recursive<'a, I, O, P, F>(define: F) -> Recursive<'a, I, O>
where
    I: Input + 'a,
    O: 'a,
    P: Parser<I, O> + 'a,
    F: FnOnce(Recursive<'a, I, O>) -> P,
{
    let slot = Rc::new(OnceCell::new());
    let handle = Recursive { slot: Handle::Weak(Rc::downgrade(&slot)) };
    let parser = define(handle).boxed();
    // the slot is fresh, so this cannot fail
    let _ = slot.set(parser);
    Recursive { slot: Handle::Owned(slot) }
}
