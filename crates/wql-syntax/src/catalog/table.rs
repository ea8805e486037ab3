use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational tables a field can be backed by. The declaration order is the
/// order tables appear in a generated FROM clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableId {
    Facts,
    Features,
    Lemmas,
    Derivations,
    Clitics,
    NounCases,
    InitGrams,
    FinGrams,
    Bigrams,
}

impl TableId {
    pub const SATELLITES: [TableId; 3] = [TableId::Derivations, TableId::Clitics, TableId::NounCases];
    pub const NGRAMS: [TableId; 3] = [TableId::InitGrams, TableId::FinGrams, TableId::Bigrams];

    pub fn table_name(&self) -> &'static str {
        match self {
            TableId::Facts => "wordfreqs",
            TableId::Features => "features",
            TableId::Lemmas => "lemmas",
            TableId::Derivations => "derivations",
            TableId::Clitics => "clitics",
            TableId::NounCases => "nouncases",
            TableId::InitGrams => "initgramfreqs",
            TableId::FinGrams => "fingramfreqs",
            TableId::Bigrams => "wordbigramfreqs",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            TableId::Facts => "w",
            TableId::Features => "ft",
            TableId::Lemmas => "l",
            TableId::Derivations => "d",
            TableId::Clitics => "c",
            TableId::NounCases => "nc",
            TableId::InitGrams => "i",
            TableId::FinGrams => "e",
            TableId::Bigrams => "b",
        }
    }

    pub fn is_satellite(&self) -> bool {
        Self::SATELLITES.contains(self)
    }

    pub fn is_ngram(&self) -> bool {
        Self::NGRAMS.contains(self)
    }

    /// Satellite table holding the split values of a multi-valued feature
    /// column.
    pub fn satellite_for(column: &str) -> Option<TableId> {
        match column {
            "derivation" => Some(TableId::Derivations),
            "clitic" => Some(TableId::Clitics),
            "nouncase" => Some(TableId::NounCases),
            _ => None,
        }
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::TableId;

    #[test]
    fn test_table_priority_order() {
        let mut tables = vec![TableId::Bigrams, TableId::Clitics, TableId::Facts, TableId::Lemmas];
        tables.sort();
        assert_eq!(
            tables,
            vec![TableId::Facts, TableId::Lemmas, TableId::Clitics, TableId::Bigrams]
        );
        assert!(TableId::NounCases.is_satellite());
        assert!(!TableId::Features.is_satellite());
        assert_eq!(TableId::satellite_for("clitic"), Some(TableId::Clitics));
    }
}
