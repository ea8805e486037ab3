use crate::fixture::CorpusFixture;
use engine_config::QuerySettings;
use engine_runtime::{Corpus, FrameCorpus, QueryOutcome};
use model::records::table::ResultTable;
use std::collections::BTreeSet;

/// (lemma, form, pos, feats): the identity of one corpus row.
pub type RowKey = (String, String, String, String);

/// Either corpus handle, so one assertion can run against both.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, query: &str, settings: &QuerySettings) -> QueryOutcome;
}

impl Backend for Corpus {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn run(&self, query: &str, settings: &QuerySettings) -> QueryOutcome {
        self.query(query, settings)
    }
}

impl Backend for FrameCorpus {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn run(&self, query: &str, settings: &QuerySettings) -> QueryOutcome {
        self.query(query, settings)
    }
}

pub fn backends(fixture: &CorpusFixture) -> Vec<Box<dyn Backend>> {
    vec![Box::new(fixture.corpus()), Box::new(fixture.frame())]
}

/// Settings under which both backends return one row per facts row.
pub fn settings() -> QuerySettings {
    QuerySettings {
        posx: false,
        ..Default::default()
    }
}

/// Runs `query`, panicking with the backend message when it does not succeed.
pub fn rows(backend: &dyn Backend, query: &str) -> ResultTable {
    let outcome = backend.run(query, &settings());
    assert!(
        outcome.is_ok(),
        "{} rejected '{}': {}",
        backend.name(),
        query,
        outcome.message
    );
    outcome.table
}

pub fn count(backend: &dyn Backend, query: &str) -> usize {
    rows(backend, query).len()
}

pub fn keys(table: &ResultTable) -> BTreeSet<RowKey> {
    let text = |row: usize, column: &str| {
        table
            .value(row, column)
            .and_then(|v| v.as_string())
            .unwrap_or_default()
    };
    (0..table.len())
        .map(|i| (text(i, "lemma"), text(i, "form"), text(i, "pos"), text(i, "feats")))
        .collect()
}

pub fn forms(table: &ResultTable) -> BTreeSet<String> {
    keys(table).into_iter().map(|(_, form, _, _)| form).collect()
}

pub fn form_set(forms: &[&str]) -> BTreeSet<String> {
    forms.iter().map(|f| f.to_string()).collect()
}
