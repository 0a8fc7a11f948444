use crate::model::HttpMethod;
use thiserror::Error;

/// Result type alias for the comment parser
pub type Result<T> = std::result::Result<T, ParseError>;

/// Failures raised while parsing a single comment block.
///
/// A failure aborts the current block only; operations merged by earlier blocks stay
/// in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A prefix matched but the payload does not follow the directive grammar
    #[error("{0}")]
    MalformedDirective(String),

    /// A referenced type is neither a primitive nor present in the catalog
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A type (transitively) contains itself
    #[error("Cyclic type: {0}")]
    CyclicType(String),

    /// Payload starts with `{` but is neither a JSON literal nor an inline field list
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),

    /// Structural invariant violated by a parsed directive
    #[error("{0}")]
    ValidationFailure(String),

    /// The block declared at least one path but no response
    #[error("No @openapiResponse for: {method} {path}")]
    MissingResponse { method: HttpMethod, path: String },

    /// Any of the above, annotated with the directive line that caused it
    #[error("{source} ({line})")]
    Directive {
        line: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        ParseError::MalformedDirective(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ParseError::ValidationFailure(msg.into())
    }

    /// Attaches the offending directive line.
    pub fn at_line(self, line: &str) -> Self {
        ParseError::Directive {
            line: line.to_string(),
            source: Box::new(self),
        }
    }

    /// The underlying failure, without line annotations.
    pub fn cause(&self) -> &ParseError {
        match self {
            ParseError::Directive { source, .. } => source.cause(),
            other => other,
        }
    }

    /// The directive line this failure was raised for, if any.
    pub fn line(&self) -> Option<&str> {
        match self {
            ParseError::Directive { line, .. } => Some(line),
            _ => None,
        }
    }
}
