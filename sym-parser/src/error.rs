use std::{borrow::Cow, error::Error, fmt, sync::Arc};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A failure produced while parsing.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ParsingError {
    /// The position in the input at which parsing went wrong.
    pub position: usize,

    /// A human-readable description of what was expected.
    pub message: Cow<'static, str>,

    /// The underlying error, if a fallible conversion inside the parser failed.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub cause: Option<Arc<dyn Error + Send + Sync>>,

    /// The name of the combinator that produced this error.
    pub producer: &'static str,
}

impl ParsingError {
    /// Creates a new error.
    pub fn new(position: usize, message: impl Into<Cow<'static, str>>, producer: &'static str) -> Self {
        Self {
            position,
            message: message.into(),
            cause: None,
            producer,
        }
    }

    /// Attaches the error that caused this parsing error.
    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }
}

/// Two errors are equal if they were produced by the same combinator at the same position with
/// the same message. The cause is not compared.
impl PartialEq for ParsingError {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
            && self.message == other.message
            && self.producer == other.producer
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.position)
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|cause| cause as &(dyn Error + 'static))
    }
}
