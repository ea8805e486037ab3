use super::pipeline::Transform;
use model::{
    core::{
        totals::{AggregateTotals, TotalKind},
        value::Value,
    },
    records::table::ResultTable,
};

/// Derived columns and the column each one follows.
const ANCHORS: [(&str, &[&str]); 3] = [
    ("lemma", &["amblemma", "ambform"]),
    ("frequency", &["initgramfreq", "fingramfreq", "bigramfreq"]),
    ("len", &["hood"]),
];

/// Relative column, its absolute column and the total it is measured
/// against.
pub const RELATIVE_COLUMNS: [(&str, &str, TotalKind); 5] = [
    ("relfrequency", "frequency", TotalKind::Frequency),
    ("rellemmafreq", "lemmafreq", TotalKind::LemmaFrequency),
    ("relinitgramfreq", "initgramfreq", TotalKind::InitGram),
    ("relfingramfreq", "fingramfreq", TotalKind::FinGram),
    ("relbigramfreq", "bigramfreq", TotalKind::Bigram),
];

/// Moves derived columns directly after their anchor column. A derived
/// column whose anchor is absent stays where it is.
pub struct AnchorColumns;

impl Transform for AnchorColumns {
    fn apply(&self, mut table: ResultTable) -> ResultTable {
        let present = |name: &str| table.has_column(name);
        let moved: Vec<&str> = ANCHORS
            .iter()
            .filter(|(anchor, _)| present(*anchor))
            .flat_map(|(_, derived)| derived.iter().copied())
            .collect();

        let mut order: Vec<String> = Vec::with_capacity(table.columns.len());
        for column in &table.columns {
            if moved.contains(&column.as_str()) {
                continue;
            }
            order.push(column.clone());
            if let Some((_, derived)) = ANCHORS.iter().find(|(anchor, _)| *anchor == column.as_str()) {
                order.extend(derived.iter().filter(|d| present(**d)).map(|d| d.to_string()));
            }
        }

        table.reorder_columns(&order);
        table
    }
}

/// Inserts `rel*` columns after their absolute columns.
pub struct RelativeColumns {
    totals: AggregateTotals,
}

impl RelativeColumns {
    pub fn new(totals: AggregateTotals) -> Self {
        Self { totals }
    }
}

impl Transform for RelativeColumns {
    fn apply(&self, mut table: ResultTable) -> ResultTable {
        for (relative, absolute, kind) in RELATIVE_COLUMNS {
            if table.has_column(relative) {
                continue;
            }
            let Some(idx) = table.column_index(absolute) else {
                continue;
            };
            let values = table
                .rows
                .iter()
                .map(|row| match row[idx].as_f64() {
                    Some(n) => Value::Float(self.totals.to_relative(kind, n)),
                    None => Value::Null,
                })
                .collect();
            table.insert_column(idx + 1, relative, values);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultTable {
        ResultTable::new(
            ["hood", "lemma", "form", "bigramfreq", "frequency", "len", "amblemma"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            vec![vec![
                Value::Int(2),
                "auto".into(),
                "auto".into(),
                Value::Int(20),
                Value::Int(50),
                Value::Int(4),
                Value::Float(0.5),
            ]],
        )
    }

    #[test]
    fn test_derived_columns_follow_anchors() {
        let table = AnchorColumns.apply(table());
        assert_eq!(
            table.columns,
            vec!["lemma", "amblemma", "form", "frequency", "bigramfreq", "len", "hood"]
        );
        assert_eq!(table.rows[0][1], Value::Float(0.5));
    }

    #[test]
    fn test_relative_columns() {
        let totals = AggregateTotals {
            frequency: 1_000_000.0,
            bigram: 1_000.0,
            ..Default::default()
        };
        let table = RelativeColumns::new(totals).apply(AnchorColumns.apply(table()));
        assert_eq!(
            table.columns,
            vec![
                "lemma",
                "amblemma",
                "form",
                "frequency",
                "relfrequency",
                "bigramfreq",
                "relbigramfreq",
                "len",
                "hood"
            ]
        );
        assert_eq!(table.value(0, "relfrequency"), Some(&Value::Float(50.0)));
        assert_eq!(table.value(0, "relbigramfreq"), Some(&Value::Float(20.0)));
    }
}
