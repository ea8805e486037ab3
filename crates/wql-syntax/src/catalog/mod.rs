use crate::catalog::{
    field::{FeatureMatch, FieldDescriptor, FieldKind, Position},
    table::TableId,
};
use lazy_static::lazy_static;
use model::core::{schema::RelationalSchema, totals::TotalKind};
use std::collections::{BTreeMap, HashMap};

pub mod field;
pub mod table;

lazy_static! {
    static ref ALIASES: HashMap<&'static str, &'static str> = HashMap::from([
        ("freq", "frequency"),
        ("relfreq", "relfrequency"),
        ("case", "nouncase"),
        ("number", "nnumber"),
        ("length", "len"),
    ]);
}

/// Morphological feature fields and the flat-export columns that may back
/// them, in order of preference.
const EXPORT_FEATURES: [(&str, &[&str]); 18] = [
    ("nnumber", &["nnumber", "number"]),
    ("nouncase", &["nouncase", "case"]),
    ("gender", &["gender"]),
    ("definite", &["definite"]),
    ("mood", &["mood"]),
    ("tense", &["tense"]),
    ("aspect", &["aspect"]),
    ("voice", &["voice"]),
    ("person", &["person"]),
    ("verbform", &["verbform"]),
    ("partform", &["partform"]),
    ("degree", &["degree"]),
    ("posspers", &["posspers"]),
    ("possnum", &["possnum"]),
    ("clitic", &["clitic"]),
    ("derivation", &["derivation"]),
    ("style", &["style"]),
    ("typo", &["typo"]),
];

/// Numeric fields outside the facts table: (field, table, column).
const AGGREGATE_NUMERICS: [(&str, TableId, &str); 7] = [
    ("lemmafreq", TableId::Lemmas, "lemmafreq"),
    ("lemmalen", TableId::Lemmas, "lemmalen"),
    ("amblemma", TableId::Lemmas, "amblemma"),
    ("comparts", TableId::Lemmas, "comparts"),
    ("initgramfreq", TableId::InitGrams, "frequency"),
    ("fingramfreq", TableId::FinGrams, "frequency"),
    ("bigramfreq", TableId::Bigrams, "frequency"),
];

const FACT_NUMERICS: [&str; 4] = ["frequency", "len", "hood", "ambform"];

/// Relative fields: (relative name, absolute name, total).
const RELATIVES: [(&str, &str, TotalKind); 5] = [
    ("relfrequency", "frequency", TotalKind::Frequency),
    ("rellemmafreq", "lemmafreq", TotalKind::LemmaFrequency),
    ("relinitgramfreq", "initgramfreq", TotalKind::InitGram),
    ("relfingramfreq", "fingramfreq", TotalKind::FinGram),
    ("relbigramfreq", "bigramfreq", TotalKind::Bigram),
];

/// Columns of the features table that are keys rather than features.
const FEATURE_KEYS: [&str; 3] = ["featid", "feats", "pos"];

/// Compound-part marker inside lemmas.
pub const COMPOUND_MARKER: char = '#';

/// Field registry for one opened corpus.
///
/// Built once per corpus handle from what the corpus actually contains and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl FieldCatalog {
    /// Catalog over the normalized relational layout described by `schema`.
    pub fn relational(schema: &RelationalSchema) -> Self {
        let facts = TableId::Facts.table_name();
        let mut catalog = FieldCatalog::default();

        for name in ["lemma", "form", "pos"] {
            catalog.insert(FieldDescriptor::new(
                name,
                FieldKind::Text,
                Some(TableId::Facts),
                name,
            ));
        }
        if schema.has_column(facts, "feats") {
            catalog.insert(FieldDescriptor::new(
                "feats",
                FieldKind::Text,
                Some(TableId::Facts),
                "feats",
            ));
        }

        let lemmac = if schema.has_column(TableId::Lemmas.table_name(), "lemmac") {
            FieldDescriptor::new("lemmac", FieldKind::Text, Some(TableId::Lemmas), "lemmac")
        } else if schema.has_column(facts, "lemmac") {
            FieldDescriptor::new("lemmac", FieldKind::Text, Some(TableId::Facts), "lemmac")
        } else {
            FieldDescriptor::new("lemmac", FieldKind::Text, Some(TableId::Facts), "lemma")
                .with_strip(COMPOUND_MARKER)
        };
        catalog.insert(lemmac);

        catalog.insert_positional(Some(TableId::Facts));
        catalog.insert(FieldDescriptor::new(
            "compound",
            FieldKind::Boolean,
            Some(TableId::Facts),
            "lemma",
        ));

        for name in FACT_NUMERICS {
            if matches!(name, "frequency" | "len") || schema.has_column(facts, name) {
                catalog.insert(FieldDescriptor::new(
                    name,
                    FieldKind::Numeric,
                    Some(TableId::Facts),
                    name,
                ));
            }
        }

        for (name, table, column) in AGGREGATE_NUMERICS {
            if schema.has_column(table.table_name(), column) {
                catalog.insert(FieldDescriptor::new(
                    name,
                    FieldKind::Numeric,
                    Some(table),
                    column,
                ));
            }
        }

        for column in schema.columns(TableId::Features.table_name()) {
            let column = column.to_ascii_lowercase();
            if FEATURE_KEYS.contains(&column.as_str()) {
                continue;
            }
            let satellite = TableId::satellite_for(&column)
                .filter(|t| schema.has_column(t.table_name(), &column));
            catalog.insert(
                FieldDescriptor::new(
                    &column,
                    FieldKind::Feature(feature_match(&column)),
                    Some(TableId::Features),
                    &column,
                )
                .with_satellite(satellite),
            );
        }

        catalog.insert_relatives();
        catalog
    }

    /// Catalog over the columns of a flat export or an already materialized
    /// result table.
    pub fn columnar(columns: &[String]) -> Self {
        let has = |c: &str| columns.iter().any(|col| col == c);
        let mut catalog = FieldCatalog::default();

        for name in ["lemma", "form", "pos", "feats"] {
            if has(name) {
                catalog.insert(FieldDescriptor::new(name, FieldKind::Text, None, name));
            }
        }

        if has("lemmac") {
            catalog.insert(FieldDescriptor::new("lemmac", FieldKind::Text, None, "lemmac"));
        } else if has("lemma") {
            catalog.insert(
                FieldDescriptor::new("lemmac", FieldKind::Text, None, "lemma")
                    .with_strip(COMPOUND_MARKER),
            );
        }

        if has("form") {
            catalog.insert_positional(None);
        }
        if has("lemma") {
            catalog.insert(FieldDescriptor::new("compound", FieldKind::Boolean, None, "lemma"));
        }

        let numerics = FACT_NUMERICS
            .iter()
            .copied()
            .chain(AGGREGATE_NUMERICS.iter().map(|(name, _, _)| *name));
        for name in numerics {
            if has(name) {
                catalog.insert(FieldDescriptor::new(name, FieldKind::Numeric, None, name));
            }
        }

        for (name, candidates) in EXPORT_FEATURES {
            if let Some(column) = candidates.iter().find(|c| has(c)) {
                catalog.insert(FieldDescriptor::new(
                    name,
                    FieldKind::Feature(feature_match(name)),
                    None,
                    column,
                ));
            }
        }

        catalog.insert_relatives();
        catalog
    }

    /// Resolves the spelling used in a query to a field name. Aliases and
    /// letter case are normalized; unknown names are returned as given.
    pub fn resolve_alias(name: &str) -> String {
        let lower = name.to_ascii_lowercase();
        match ALIASES.get(lower.as_str()) {
            Some(target) => target.to_string(),
            None => lower,
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Looks a field up by any accepted spelling.
    pub fn lookup(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(&Self::resolve_alias(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn feature_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .values()
            .filter(|d| matches!(d.kind, FieldKind::Feature(_)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn insert(&mut self, descriptor: FieldDescriptor) {
        self.fields.insert(descriptor.name.clone(), descriptor);
    }

    fn insert_positional(&mut self, table: Option<TableId>) {
        for (name, position) in [
            ("start", Position::Start),
            ("middle", Position::Middle),
            ("end", Position::End),
        ] {
            self.insert(FieldDescriptor::new(
                name,
                FieldKind::Positional(position),
                table,
                "form",
            ));
        }
    }

    fn insert_relatives(&mut self) {
        for (name, absolute, total) in RELATIVES {
            let Some(base) = self.fields.get(absolute) else {
                continue;
            };
            let mut descriptor = base.clone().with_relative(absolute, total);
            descriptor.name = name.to_string();
            self.insert(descriptor);
        }
    }
}

fn feature_match(field: &str) -> FeatureMatch {
    match field {
        "derivation" | "clitic" => FeatureMatch::MultiChoice,
        _ => FeatureMatch::Exact,
    }
}
