use std::fmt;

/// One whitespace-delimited word of a query, with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub column: usize,
    pub span: (usize, usize),
}

/// The words between two `and` keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub tokens: Vec<Token>,
    /// Source text of the clause, trimmed.
    pub text: String,
    pub span: (usize, usize),
}

impl Clause {
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.lexeme.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
