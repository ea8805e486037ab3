//! Properties that must hold on both the relational and the flat backend.

#[cfg(test)]
mod tests {
    use crate::{
        fixture::{CorpusFixture, WORDS},
        utils::{backends, count, form_set, forms, keys, rows, settings},
    };
    use std::collections::BTreeSet;
    use tracing_test::traced_test;

    // Scenario: prefix queries split by a middle predicate on the same value.
    // Expected Outcome: the positive and negated middle halves add up to the
    // prefix query on every backend.
    #[traced_test]
    #[test]
    fn start_is_partitioned_by_middle() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            for x in ["ta", "a", "au", "t"] {
                let all = count(backend.as_ref(), &format!("start = {x}"));
                let inner = count(backend.as_ref(), &format!("start = {x} and middle = {x}"));
                let outer = count(backend.as_ref(), &format!("start = {x} and middle != {x}"));
                assert!(all > 0, "{}: no form starts with '{x}'", backend.name());
                assert_eq!(all, inner + outer, "{}: start = {x}", backend.name());
            }
        }
    }

    // Scenario: every form of the corpus used as its own suffix.
    // Expected Outcome: `end = <form>` always returns that form.
    #[traced_test]
    #[test]
    fn end_includes_the_whole_form() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            for word in &WORDS {
                let found = forms(&rows(backend.as_ref(), &format!("end = {}", word.form)));
                assert!(found.contains(word.form), "{}: end = {}", backend.name(), word.form);
            }
            let found = forms(&rows(backend.as_ref(), "end = ssa"));
            assert_eq!(found, form_set(&["autossa", "tallissa"]), "{}", backend.name());
        }
    }

    // Scenario: base queries narrowed by `compound` and `not compound`.
    // Expected Outcome: the two results are disjoint and together equal the
    // base query.
    #[traced_test]
    #[test]
    fn compound_partitions_any_query() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            for base in ["pos = noun", "len > 3", "start = au", "frequency >= 40"] {
                let all = keys(&rows(backend.as_ref(), base));
                let yes = keys(&rows(backend.as_ref(), &format!("{base} and compound")));
                let no = keys(&rows(backend.as_ref(), &format!("{base} and not compound")));

                assert!(yes.is_disjoint(&no), "{}: {base}", backend.name());
                let union: BTreeSet<_> = yes.union(&no).cloned().collect();
                assert_eq!(union, all, "{}: {base}", backend.name());
            }
        }
    }

    // Scenario: set membership and its negation on an exact feature and on
    // the part of speech.
    // Expected Outcome: `in` and `notin` cover every row between them, and
    // `notin` never returns a row the equality would.
    #[traced_test]
    #[test]
    fn in_and_notin_cover_all_defined_rows() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            let everything = keys(&rows(backend.as_ref(), "len > 0"));
            assert_eq!(everything.len(), WORDS.len());

            for (yes, no) in [
                ("nouncase in nom,ine", "nouncase notin nom,ine"),
                ("pos in noun,verb", "pos notin noun,verb"),
                ("case in ade", "case not in ade"),
            ] {
                let yes = keys(&rows(backend.as_ref(), yes));
                let no = keys(&rows(backend.as_ref(), no));
                assert!(yes.is_disjoint(&no), "{}", backend.name());
                let union: BTreeSet<_> = yes.union(&no).cloned().collect();
                assert_eq!(union, everything, "{}", backend.name());
            }

            let nominative = keys(&rows(backend.as_ref(), "nouncase = nom"));
            let not_nominative = keys(&rows(backend.as_ref(), "nouncase notin nom"));
            assert_eq!(nominative.len(), 6);
            assert!(nominative.is_disjoint(&not_nominative), "{}", backend.name());
        }
    }

    // Scenario: a relative frequency threshold against the absolute one it
    // stands for. The corpus total is one million tokens.
    // Expected Outcome: both select the same rows.
    #[traced_test]
    #[test]
    fn relative_frequency_matches_absolute_threshold() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            for r in [10, 50, 100] {
                let relative = keys(&rows(backend.as_ref(), &format!("relfrequency > {r}")));
                let absolute = keys(&rows(backend.as_ref(), &format!("frequency > {r}")));
                assert_eq!(relative, absolute, "{}: relfrequency > {r}", backend.name());
            }
            assert_eq!(count(backend.as_ref(), "relfreq > 50"), 6);
        }
    }

    // Scenario: one query with an unknown field, a non-numeric value and a
    // malformed clause next to two valid clauses.
    // Expected Outcome: rejected before execution with one message naming
    // every bad clause.
    #[traced_test]
    #[test]
    fn all_parse_errors_are_reported_together() {
        let fixture = CorpusFixture::new();
        let query = "nouncase in Ill,Gen and pos in PROPN,NOUN and foo = 0 and len > a and len<10";
        for backend in backends(&fixture) {
            let outcome = backend.run(query, &settings());
            assert_eq!(outcome.code(), -1, "{}", backend.name());
            assert!(outcome.table.is_empty());
            assert_eq!(
                outcome.message,
                "Query key 'foo' not ok; \
                 Query value for key 'len' not ok: 'a' is not a number; \
                 Invalid query part: 'len<10'"
            );
        }
    }

    // Scenario: lemma, pattern and positional queries restricted to
    // auto, autotalli, talli and katalla.
    // Expected Outcome: identical forms on both backends, with the compound
    // lemma auto#talli matched by its marker-free spelling.
    #[traced_test]
    #[test]
    fn end_to_end_on_four_words() {
        let fixture = CorpusFixture::new();
        let scope = "form in auto,autotalli,talli,katalla";
        let cases: [(&str, &[&str]); 8] = [
            ("lemma = autotalli", &["autotalli"]),
            ("lemma = auto#talli", &["autotalli"]),
            ("lemma like auto%", &["auto", "autotalli"]),
            ("compound", &["autotalli"]),
            ("start = auto", &["auto", "autotalli"]),
            ("end = talli", &["autotalli", "talli"]),
            ("middle = tal", &["autotalli", "katalla"]),
            ("len > 4 and frequency < 50", &["autotalli", "katalla"]),
        ];

        for backend in backends(&fixture) {
            assert_eq!(count(backend.as_ref(), scope), 4);
            for (query, expected) in cases {
                let found = forms(&rows(backend.as_ref(), &format!("{scope} and {query}")));
                assert_eq!(found, form_set(expected), "{}: {query}", backend.name());
            }
        }
    }

    // Scenario: positive matches on multi-choice features, including a row
    // carrying two clitics.
    // Expected Outcome: both backends agree.
    #[traced_test]
    #[test]
    fn satellite_features_agree() {
        let fixture = CorpusFixture::new();
        for backend in backends(&fixture) {
            let clitic = forms(&rows(backend.as_ref(), "clitic = kin"));
            assert_eq!(clitic, form_set(&["talossakin", "kukahankin"]), "{}", backend.name());

            let clitic = forms(&rows(backend.as_ref(), "clitic in han"));
            assert_eq!(clitic, form_set(&["kukahankin"]), "{}", backend.name());

            let derivation = forms(&rows(backend.as_ref(), "derivation in minen,ja"));
            assert_eq!(derivation, form_set(&["tekeminen"]), "{}", backend.name());
        }
    }

    // Scenario: negating a multi-choice feature on the row whose clitics are
    // Han and Kin.
    // Expected Outcome: the relational backend compares the joined feature
    // value, so `Han,Kin` differs from `Kin` and the row survives the
    // negation as well as the positive match. The flat backend negates
    // `contains` and drops it. Single-valued rows agree.
    #[traced_test]
    #[test]
    fn multi_valued_negation_diverges() {
        let fixture = CorpusFixture::new();
        let corpus = fixture.corpus();
        let frame = fixture.frame();

        let single: BTreeSet<String> = WORDS
            .iter()
            .map(|w| w.form.to_string())
            .filter(|f| f != "talossakin" && f != "kukahankin")
            .collect();
        let mut with_multi = single.clone();
        with_multi.insert("kukahankin".to_string());

        for query in ["clitic != kin", "clitic notin kin"] {
            let relational = forms(&rows(&corpus, query));
            let flat = forms(&rows(&frame, query));
            assert_eq!(relational, with_multi, "sqlite: {query}");
            assert_eq!(flat, single, "frame: {query}");
        }

        let relational = keys(&rows(&corpus, "clitic = kin"));
        let negated = keys(&rows(&corpus, "clitic != kin"));
        let shared: Vec<_> = relational.intersection(&negated).map(|k| k.1.clone()).collect();
        assert_eq!(shared, vec!["kukahankin".to_string()]);

        let flat = keys(&rows(&frame, "clitic = kin"));
        let negated = keys(&rows(&frame, "clitic != kin"));
        assert!(flat.is_disjoint(&negated));
    }

    // Scenario: a backend-agnostic ordering and row cap.
    // Expected Outcome: the most frequent rows come first on both backends.
    #[traced_test]
    #[test]
    fn ordering_and_row_limit_agree() {
        let fixture = CorpusFixture::new();
        let capped = engine_config::QuerySettings {
            row_limit: 3,
            ..settings()
        };
        for backend in backends(&fixture) {
            let outcome = backend.run("pos = noun", &capped);
            let found: Vec<_> = outcome
                .table
                .column_values("form")
                .unwrap()
                .into_iter()
                .filter_map(|v| v.as_string())
                .collect();
            assert_eq!(found, vec!["auto", "autossa", "tapa"], "{}", backend.name());
        }
    }
}
