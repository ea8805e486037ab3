use connectors::file::csv::settings::CsvSettings;
use engine_runtime::{Corpus, FrameCorpus};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// One facts row of the test corpus.
pub struct Word {
    pub lemma: &'static str,
    pub form: &'static str,
    pub pos: &'static str,
    pub posx: &'static str,
    pub frequency: i64,
    pub frequencyx: i64,
    pub featid: i64,
}

/// (featid, feats, pos, nouncase, nnumber, derivation, clitic). `_` marks a
/// feature without a value; a comma joins the values of a multi-valued one.
pub type FeatureRow = (i64, &'static str, &'static str, &'static str, &'static str, &'static str, &'static str);

pub const FEATURES: [FeatureRow; 8] = [
    (1, "Case=Nom|Number=Sing", "NOUN", "Nom", "Sing", "_", "_"),
    (2, "Case=Ine|Number=Sing", "NOUN", "Ine", "Sing", "_", "_"),
    (3, "Case=Ade|Number=Sing", "NOUN", "Ade", "Sing", "_", "_"),
    (4, "Mood=Ind|Number=Sing|Person=3|VerbForm=Fin", "AUX", "_", "Sing", "_", "_"),
    (5, "Mood=Ind|Number=Sing|Person=3|VerbForm=Fin", "VERB", "_", "Sing", "_", "_"),
    (6, "Case=Ine|Clitic=Kin|Number=Sing", "NOUN", "Ine", "Sing", "_", "Kin"),
    (7, "Case=Nom|Derivation=Minen|Number=Sing", "NOUN", "Nom", "Sing", "Minen", "_"),
    (8, "Clitic=Han,Kin|PronType=Ind", "PRON", "_", "_", "_", "Han,Kin"),
];

const fn word(
    lemma: &'static str,
    form: &'static str,
    pos: &'static str,
    frequency: i64,
    featid: i64,
) -> Word {
    Word {
        lemma,
        form,
        pos,
        posx: pos,
        frequency,
        frequencyx: frequency,
        featid,
    }
}

pub const WORDS: [Word; 13] = [
    word("auto", "auto", "NOUN", 500, 1),
    word("auto#talli", "autotalli", "NOUN", 40, 1),
    word("talli", "talli", "NOUN", 60, 1),
    word("talli", "tallissa", "NOUN", 30, 2),
    word("auto", "autossa", "NOUN", 80, 2),
    word("kata", "katalla", "NOUN", 3, 3),
    Word {
        lemma: "olla",
        form: "on",
        pos: "AUX",
        posx: "VERB",
        frequency: 900,
        frequencyx: 1000,
        featid: 4,
    },
    Word {
        lemma: "olla",
        form: "on",
        pos: "VERB",
        posx: "VERB",
        frequency: 100,
        frequencyx: 1000,
        featid: 5,
    },
    word("talo", "talossakin", "NOUN", 12, 6),
    word("tekeminen", "tekeminen", "NOUN", 25, 7),
    word("tapa", "tapa", "NOUN", 70, 1),
    word("pata", "pata", "NOUN", 15, 1),
    word("kuka", "kukahankin", "PRON", 4, 8),
];

/// Token total recorded in the corpus metadata.
pub const TOTAL_FREQUENCY: f64 = 1_000_000.0;

const SCHEMA: &str = "
    CREATE TABLE wordfreqs (
        lemma TEXT, form TEXT, pos TEXT, posx TEXT, frequency INTEGER, frequencyx INTEGER,
        len INTEGER, revform TEXT, feats TEXT, featid INTEGER, hood INTEGER, ambform REAL
    );
    CREATE TABLE features (
        featid INTEGER PRIMARY KEY, feats TEXT, pos TEXT,
        nouncase TEXT, nnumber TEXT, derivation TEXT, clitic TEXT
    );
    CREATE TABLE lemmas (
        lemma TEXT, lemmac TEXT, pos TEXT, lemmafreq INTEGER, lemmalen INTEGER,
        amblemma REAL, comparts INTEGER
    );
    CREATE TABLE derivations (featid INTEGER, derivation TEXT);
    CREATE TABLE clitics (featid INTEGER, clitic TEXT);
    CREATE TABLE nouncases (featid INTEGER, nouncase TEXT);
    CREATE TABLE initgramfreqs (form TEXT PRIMARY KEY, frequency INTEGER);
    CREATE TABLE fingramfreqs (form TEXT PRIMARY KEY, frequency INTEGER);
    CREATE TABLE wordbigramfreqs (form TEXT PRIMARY KEY, frequency INTEGER);
    CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT);

    CREATE INDEX idx_wordfreqs_form_freq ON wordfreqs (form, frequency);
    CREATE INDEX idx_wordfreqs_revform_freq ON wordfreqs (revform, frequency);
    CREATE INDEX idx_wordfreqs_lemma_freq ON wordfreqs (lemma, frequency);
    CREATE INDEX idx_wordfreqs_freq ON wordfreqs (frequency);
    CREATE INDEX idx_wordfreqs_len_freq ON wordfreqs (len, frequency);
    CREATE INDEX idx_wordfreqs_pos_freq ON wordfreqs (pos, frequency);
    CREATE INDEX idx_wordfreqs_form_freqx ON wordfreqs (form, frequencyx);
    CREATE INDEX idx_wordfreqs_revform_freqx ON wordfreqs (revform, frequencyx);
    CREATE INDEX idx_wordfreqs_lemma_freqx ON wordfreqs (lemma, frequencyx);
    CREATE INDEX idx_wordfreqs_freqx ON wordfreqs (frequencyx);
    CREATE INDEX idx_wordfreqs_len_freqx ON wordfreqs (len, frequencyx);
    CREATE INDEX idx_wordfreqs_posx_freqx ON wordfreqs (posx, frequencyx);
";

/// Export columns, in file order.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "lemma",
    "form",
    "pos",
    "feats",
    "frequency",
    "len",
    "case",
    "number",
    "derivation",
    "clitic",
    "lemmafreq",
    "amblemma",
    "initgramfreq",
    "fingramfreq",
    "bigramfreq",
];

/// A temporary corpus: the SQLite database and its flat export, built from
/// the same rows.
pub struct CorpusFixture {
    dir: TempDir,
    pub database: PathBuf,
    pub export: PathBuf,
}

impl CorpusFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let database = dir.path().join("wm2database.db");
        let export = dir.path().join("wm2export.csv");

        build_database(&database).expect("build database");
        build_export(&export).expect("build export");

        Self {
            dir,
            database,
            export,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn corpus(&self) -> Corpus {
        Corpus::open(&self.database).expect("open corpus")
    }

    /// The export, measured against the database totals so relative values
    /// mean the same on both backends.
    pub fn frame(&self) -> FrameCorpus {
        let totals = *self.corpus().totals();
        FrameCorpus::with_totals(&self.export, CsvSettings::default(), totals).expect("open export")
    }
}

impl Default for CorpusFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn features(featid: i64) -> FeatureRow {
    FEATURES[(featid - 1) as usize]
}

fn lemma_frequency(lemma: &str, pos: &str) -> i64 {
    WORDS
        .iter()
        .filter(|w| w.lemma == lemma && w.pos == pos)
        .map(|w| w.frequency)
        .sum()
}

fn prefix(form: &str) -> String {
    form.chars().take(3).collect()
}

fn suffix(form: &str) -> String {
    let chars: Vec<char> = form.chars().collect();
    chars[chars.len().saturating_sub(3)..].iter().collect()
}

/// Sum of `frequency` over the words whose key matches `key(form)`.
fn gram_frequency(key: impl Fn(&str) -> String, value: &str) -> i64 {
    WORDS
        .iter()
        .filter(|w| key(w.form) == value)
        .map(|w| w.frequency)
        .sum()
}

fn build_database(path: &Path) -> rusqlite::Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;
    let tx = conn.transaction()?;

    for w in &WORDS {
        let (_, feats, ..) = features(w.featid);
        let len = w.form.chars().count() as i64;
        let revform: String = w.form.chars().rev().collect();
        let hood = WORDS.iter().filter(|o| o.lemma == w.lemma).count() as i64;
        tx.execute(
            "INSERT INTO wordfreqs VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                w.lemma,
                w.form,
                w.pos,
                w.posx,
                w.frequency,
                w.frequencyx,
                len,
                revform,
                feats,
                w.featid,
                hood,
                0.0
            ],
        )?;
    }

    for (featid, feats, pos, nouncase, nnumber, derivation, clitic) in FEATURES {
        tx.execute(
            "INSERT INTO features VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![featid, feats, pos, nouncase, nnumber, derivation, clitic],
        )?;
        for (table, value) in [
            ("nouncases", nouncase),
            ("derivations", derivation),
            ("clitics", clitic),
        ] {
            for value in value.split(',').filter(|v| *v != "_") {
                tx.execute(
                    &format!("INSERT INTO {table} VALUES (?1, ?2)"),
                    params![featid, value],
                )?;
            }
        }
    }

    let mut lemmas: Vec<(&str, &str)> = WORDS.iter().map(|w| (w.lemma, w.pos)).collect();
    lemmas.sort();
    lemmas.dedup();
    for (lemma, pos) in lemmas {
        let lemmac = lemma.replace('#', "");
        let comparts = lemma.matches('#').count() as i64 + 1;
        tx.execute(
            "INSERT INTO lemmas VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                lemma,
                lemmac,
                pos,
                lemma_frequency(lemma, pos),
                lemmac.chars().count() as i64,
                0.0,
                comparts
            ],
        )?;
    }

    let mut grams: Vec<(&str, String, i64)> = Vec::new();
    for w in &WORDS {
        grams.push(("initgramfreqs", prefix(w.form), gram_frequency(prefix, &prefix(w.form))));
        grams.push(("fingramfreqs", suffix(w.form), gram_frequency(suffix, &suffix(w.form))));
        grams.push((
            "wordbigramfreqs",
            w.form.to_string(),
            gram_frequency(|f| f.to_string(), w.form),
        ));
    }
    for (table, form, frequency) in grams {
        tx.execute(
            &format!("INSERT OR REPLACE INTO {table} VALUES (?1, ?2)"),
            params![form, frequency],
        )?;
    }

    tx.execute(
        "INSERT INTO metadata VALUES ('frequency', ?1)",
        params![TOTAL_FREQUENCY.to_string()],
    )?;
    tx.commit()
}

fn build_export(path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EXPORT_COLUMNS)?;

    for w in &WORDS {
        let (_, feats, _, nouncase, nnumber, derivation, clitic) = features(w.featid);
        writer.write_record([
            w.lemma.to_string(),
            w.form.to_string(),
            w.pos.to_string(),
            feats.to_string(),
            w.frequency.to_string(),
            w.form.chars().count().to_string(),
            nouncase.to_string(),
            nnumber.to_string(),
            derivation.to_string(),
            clitic.to_string(),
            lemma_frequency(w.lemma, w.pos).to_string(),
            "0.0".to_string(),
            gram_frequency(prefix, &prefix(w.form)).to_string(),
            gram_frequency(suffix, &suffix(w.form)).to_string(),
            gram_frequency(|f| f.to_string(), w.form).to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
