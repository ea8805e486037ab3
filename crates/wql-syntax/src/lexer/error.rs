use crate::parser::Rule;
use pest::error::Error as PestError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    #[error("Parse error at column {column}: {message}")]
    ParseError { message: String, column: usize },

    #[error("Unexpected rule '{rule}' at column {column}")]
    UnexpectedRule { rule: String, column: usize },
}

impl LexerError {
    pub fn from_pest_error(err: PestError<Rule>) -> Self {
        use pest::error::LineColLocation;

        let column = match err.line_col {
            LineColLocation::Pos((_, c)) => c,
            LineColLocation::Span((_, c), _) => c,
        };

        LexerError::ParseError {
            message: format!("{}", err.variant),
            column,
        }
    }
}
