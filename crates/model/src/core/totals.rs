use serde::{Deserialize, Serialize};
use std::fmt;

/// Which corpus-wide sum a relative frequency is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TotalKind {
    Frequency,
    LemmaFrequency,
    InitGram,
    FinGram,
    Bigram,
}

impl TotalKind {
    pub const ALL: [TotalKind; 5] = [
        TotalKind::Frequency,
        TotalKind::LemmaFrequency,
        TotalKind::InitGram,
        TotalKind::FinGram,
        TotalKind::Bigram,
    ];

    /// Key of the total in the corpus `metadata` table.
    pub fn key(&self) -> &'static str {
        match self {
            TotalKind::Frequency => "frequency",
            TotalKind::LemmaFrequency => "lemmafreq",
            TotalKind::InitGram => "initgramfreq",
            TotalKind::FinGram => "fingramfreq",
            TotalKind::Bigram => "bigramfreq",
        }
    }

    /// Bigram-relative values are per thousand, all others per million.
    pub fn scale(&self) -> f64 {
        match self {
            TotalKind::Bigram => 1_000.0,
            _ => 1_000_000.0,
        }
    }
}

impl fmt::Display for TotalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Corpus-wide frequency sums. Loaded once per corpus handle and never
/// mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateTotals {
    pub frequency: f64,
    pub lemma_frequency: f64,
    pub init_gram: f64,
    pub fin_gram: f64,
    pub bigram: f64,
}

impl AggregateTotals {
    pub fn get(&self, kind: TotalKind) -> f64 {
        match kind {
            TotalKind::Frequency => self.frequency,
            TotalKind::LemmaFrequency => self.lemma_frequency,
            TotalKind::InitGram => self.init_gram,
            TotalKind::FinGram => self.fin_gram,
            TotalKind::Bigram => self.bigram,
        }
    }

    pub fn set(&mut self, kind: TotalKind, value: f64) {
        match kind {
            TotalKind::Frequency => self.frequency = value,
            TotalKind::LemmaFrequency => self.lemma_frequency = value,
            TotalKind::InitGram => self.init_gram = value,
            TotalKind::FinGram => self.fin_gram = value,
            TotalKind::Bigram => self.bigram = value,
        }
    }

    /// Converts a relative value (per million, or per thousand for bigrams)
    /// into an absolute frequency threshold.
    pub fn to_absolute(&self, kind: TotalKind, relative: f64) -> f64 {
        relative / kind.scale() * self.get(kind)
    }

    /// Inverse of [`AggregateTotals::to_absolute`]. A zero total yields zero.
    pub fn to_relative(&self, kind: TotalKind, absolute: f64) -> f64 {
        let total = self.get(kind);
        if total == 0.0 {
            return 0.0;
        }
        absolute / total * kind.scale()
    }
}

#[cfg(test)]
mod tests {
    use super::{AggregateTotals, TotalKind};

    #[test]
    fn test_relative_conversion_uses_kind_scale() {
        let totals = AggregateTotals {
            frequency: 2_000_000.0,
            bigram: 50_000.0,
            ..Default::default()
        };

        assert_eq!(totals.to_absolute(TotalKind::Frequency, 5.0), 10.0);
        assert_eq!(totals.to_absolute(TotalKind::Bigram, 2.0), 100.0);
        assert_eq!(totals.to_relative(TotalKind::Frequency, 10.0), 5.0);
        assert_eq!(totals.to_relative(TotalKind::InitGram, 10.0), 0.0);
    }
}
