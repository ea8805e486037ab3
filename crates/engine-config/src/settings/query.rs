use serde::Deserialize;
use std::fmt;

/// When the relational backend may force an index with `INDEXED BY`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IndexHintPolicy {
    /// Hint unless an unanchored pattern makes the index useless.
    #[default]
    Auto,
    Never,
    /// Hint whenever a candidate index exists.
    Always,
}

impl fmt::Display for IndexHintPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndexHintPolicy::Auto => "auto",
            IndexHintPolicy::Never => "never",
            IndexHintPolicy::Always => "always",
        };
        write!(f, "{s}")
    }
}

/// Per-query options shared by both backends.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QuerySettings {
    /// Maximum rows returned.
    pub row_limit: u64,
    pub order_by: String,
    pub ascending: bool,
    /// Left-join the n-gram frequency tables.
    pub grams: bool,
    /// Join the lemma aggregates.
    pub lemmas: bool,
    /// Use part-of-speech aware frequencies.
    pub posx: bool,
    /// Append relative frequency columns.
    pub relative: bool,
    pub index_hint: IndexHintPolicy,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            row_limit: 10_000,
            order_by: "frequency".to_string(),
            ascending: false,
            grams: true,
            lemmas: true,
            posx: true,
            relative: false,
            index_hint: IndexHintPolicy::Auto,
        }
    }
}
