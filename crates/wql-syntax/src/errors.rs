use crate::lexer::error::LexerError;
use std::fmt;
use thiserror::Error;

/// A rejected query clause. Messages quote the offending token as written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Query key '{field}' not ok")]
    UnknownField { field: String },

    #[error("Query comparator for '{field}' not ok: '{comparator}'")]
    IllegalComparator { field: String, comparator: String },

    #[error("Query value for key '{field}' not ok: '{value}' is not a number")]
    NotANumber { field: String, value: String },

    #[error("Query value for key '{field}' not ok: empty list")]
    EmptySet { field: String },

    #[error("Query value for key 'top' not ok: '{value}' is not a positive integer")]
    InvalidTop { value: String },

    #[error("Invalid query part: '{part}'")]
    InvalidPart { part: String },

    #[error(transparent)]
    Lexer(#[from] LexerError),
}

/// Every error found in one query, in clause order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseErrors(pub Vec<ParseError>);

impl ParseErrors {
    pub fn errors(&self) -> &[ParseError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ParseErrors {}

impl From<Vec<ParseError>> for ParseErrors {
    fn from(errors: Vec<ParseError>) -> Self {
        ParseErrors(errors)
    }
}
