//! Defines the `Dialect` trait for database-specific SQL syntax.

pub trait Dialect: Send + Sync {
    /// Wraps an identifier (like a table or column name) in quotation marks
    /// when the dialect requires it.
    fn quote_identifier(&self, ident: &str) -> String;

    /// Returns the placeholder for a parameterized query.
    fn get_placeholder(&self, index: usize) -> String;

    /// Returns the name of the dialect (e.g., "SQLite").
    fn name(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn quote_identifier(&self, ident: &str) -> String {
        let plain = ident
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            ident.to_string()
        } else {
            format!(r#""{}""#, ident.replace('"', "\"\""))
        }
    }

    fn get_placeholder(&self, _index: usize) -> String {
        // SQLite uses positional ?
        "?".into()
    }

    fn name(&self) -> String {
        "SQLite".into()
    }
}

#[cfg(test)]
mod tests {
    use super::{Dialect, Sqlite};

    #[test]
    fn test_sqlite_quotes_only_when_needed() {
        assert_eq!(Sqlite.quote_identifier("revform"), "revform");
        assert_eq!(Sqlite.quote_identifier("Number[psor]"), r#""Number[psor]""#);
        assert_eq!(Sqlite.quote_identifier("1st"), r#""1st""#);
        assert_eq!(Sqlite.get_placeholder(4), "?");
    }
}
