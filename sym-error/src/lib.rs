//! Span-carrying errors for expressions read from source text.
//!
//! An [`Error`] pairs the character ranges of the source that caused it with an [`ErrorKind`]
//! describing what went wrong. Kinds are normally derived with `sym_attrs::ErrorKind`, which
//! renders an [`ariadne`] report with one label per span.

use ariadne::{Color, Report, Source};
use std::{any::Any, fmt, io, ops::Range};

/// The color used to highlight the offending part of an expression.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// A report over a source named by a `&str`, with spans given in characters.
pub type SourceReport<'a> = Report<'a, (&'a str, Range<usize>)>;

/// A kind of error found while reading an expression.
pub trait ErrorKind: fmt::Debug + Send + Sync {
    /// Returns the concrete kind as [`Any`], so that callers can downcast it.
    fn as_any(&self) -> &dyn Any;

    /// The one-line summary shown at the top of the report.
    fn message(&self) -> String;

    /// Builds the report, labelling each span in order.
    fn build_report<'a>(&self, src_id: &'a str, spans: &[Range<usize>]) -> SourceReport<'a>;
}

/// An error tied to regions of the source it was read from.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source that caused the error. The report is anchored at the first.
    pub spans: Vec<Range<usize>>,

    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// The span the report is anchored at.
    pub fn primary_span(&self) -> Option<Range<usize>> {
        self.spans.first().cloned()
    }

    /// Returns the kind as `K`, if that is the kind of this error.
    pub fn downcast_ref<K: ErrorKind + 'static>(&self) -> Option<&K> {
        self.kind.as_any().downcast_ref()
    }

    /// Returns true if the kind of this error is `K`.
    pub fn is<K: ErrorKind + 'static>(&self) -> bool {
        self.downcast_ref::<K>().is_some()
    }

    pub fn build_report<'a>(&self, src_id: &'a str) -> SourceReport<'a> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report against `source` into a string, including terminal colors.
    pub fn render(&self, src_id: &str, source: &str) -> io::Result<String> {
        let mut buf = Vec::new();
        self.build_report(src_id).write((src_id, Source::from(source)), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary_span() {
            Some(span) => write!(f, "{} at {}..{}", self.kind.message(), span.start, span.end),
            None => f.write_str(&self.kind.message()),
        }
    }
}

impl std::error::Error for Error {}
