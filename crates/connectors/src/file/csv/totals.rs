use crate::file::csv::{adapter::CsvAdapter, error::FileError};
use csv::StringRecord;
use model::core::totals::{AggregateTotals, TotalKind};
use std::collections::HashSet;
use tracing::debug;

/// Key under which a per-row aggregate is counted once.
enum KeyBy {
    Row,
    Columns(&'static [&'static str]),
    FormPrefix,
    FormSuffix,
}

fn spec(kind: TotalKind) -> (&'static str, KeyBy) {
    match kind {
        TotalKind::Frequency => ("frequency", KeyBy::Row),
        TotalKind::LemmaFrequency => ("lemmafreq", KeyBy::Columns(&["lemma", "pos"])),
        TotalKind::InitGram => ("initgramfreq", KeyBy::FormPrefix),
        TotalKind::FinGram => ("fingramfreq", KeyBy::FormSuffix),
        TotalKind::Bigram => ("bigramfreq", KeyBy::Columns(&["form"])),
    }
}

const GRAM_LEN: usize = 3;

/// Derives corpus totals from a flat export in one pass.
///
/// Token frequency is summed over every row. Lemma and n-gram frequencies
/// repeat on every row that shares their key, so each key is counted once.
pub fn scan_totals(adapter: &CsvAdapter) -> Result<AggregateTotals, FileError> {
    let metadata = &adapter.metadata;
    let col = |name: &str| metadata.column(name).map(|c| c.ordinal);
    let form = col("form");

    let mut sums = [0.0f64; 5];
    let mut seen: Vec<HashSet<String>> = vec![HashSet::new(); 5];

    let mut reader = adapter.reader()?;
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        for (slot, kind) in TotalKind::ALL.iter().enumerate() {
            let (column, key_by) = spec(*kind);
            let Some(idx) = col(column) else { continue };
            let Some(value) = record.get(idx).and_then(|c| c.trim().parse::<f64>().ok()) else {
                continue;
            };

            let key = match key_by {
                KeyBy::Row => None,
                KeyBy::Columns(names) => Some(
                    names
                        .iter()
                        .map(|n| col(n).and_then(|i| record.get(i)).unwrap_or(""))
                        .collect::<Vec<_>>()
                        .join("\u{1f}"),
                ),
                KeyBy::FormPrefix => form
                    .and_then(|i| record.get(i))
                    .map(|f| f.chars().take(GRAM_LEN).collect()),
                KeyBy::FormSuffix => form.and_then(|i| record.get(i)).map(|f| {
                    let n = f.chars().count();
                    f.chars().skip(n.saturating_sub(GRAM_LEN)).collect()
                }),
            };

            match key {
                None => sums[slot] += value,
                Some(key) => {
                    if seen[slot].insert(key) {
                        sums[slot] += value;
                    }
                }
            }
        }
    }

    let mut totals = AggregateTotals::default();
    for (slot, kind) in TotalKind::ALL.iter().enumerate() {
        totals.set(*kind, sums[slot]);
    }
    debug!("Derived export totals: {:?}", totals);
    Ok(totals)
}
