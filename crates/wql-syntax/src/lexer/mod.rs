use crate::{
    lexer::{
        error::LexerError,
        token::{Clause, Token},
    },
    parser::{Rule, WqlParser},
};
use pest::{Parser, iterators::Pair};

pub mod error;
pub mod token;

/// Splits a query into clauses on the keyword `and`.
///
/// The keyword is matched case-insensitively and only as a whole word, so
/// values such as `android` or `standard` stay intact.
pub struct Lexer {
    clauses: Vec<Clause>,
}

impl Lexer {
    pub fn new() -> Self {
        Lexer {
            clauses: Vec::new(),
        }
    }

    pub fn tokenize(&mut self, input: &str) -> Result<Vec<Clause>, LexerError> {
        self.clauses.clear();

        let pairs = WqlParser::parse(Rule::query, input).map_err(LexerError::from_pest_error)?;

        for pair in pairs.flatten() {
            if pair.as_rule() == Rule::clause {
                let clause = self.process_clause(pair)?;
                self.clauses.push(clause);
            }
        }

        Ok(self.clauses.clone())
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    fn process_clause(&self, pair: Pair<Rule>) -> Result<Clause, LexerError> {
        let span = pair.as_span();
        let mut tokens = Vec::new();

        for inner in pair.into_inner() {
            let inner_span = inner.as_span();
            let (_, column) = inner_span.start_pos().line_col();
            match inner.as_rule() {
                Rule::word => tokens.push(Token {
                    lexeme: inner_span.as_str().to_string(),
                    column,
                    span: (inner_span.start(), inner_span.end()),
                }),
                other => {
                    return Err(LexerError::UnexpectedRule {
                        rule: format!("{other:?}"),
                        column,
                    });
                }
            }
        }

        Ok(Clause {
            tokens,
            text: span.as_str().trim().to_string(),
            span: (span.start(), span.end()),
        })
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}
