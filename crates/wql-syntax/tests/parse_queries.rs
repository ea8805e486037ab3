use model::core::{schema::RelationalSchema, totals::AggregateTotals, value::Value};
use wql_syntax::{
    FieldCatalog, Operator, ParseError, PredicateValue, QueryBuilder, parse,
};

fn corpus_schema() -> RelationalSchema {
    RelationalSchema::new()
        .with_table(
            "wordfreqs",
            &[
                "lemma", "form", "pos", "posx", "frequency", "frequencyx", "len", "revform",
                "feats", "featid", "hood", "ambform",
            ],
        )
        .with_table(
            "features",
            &[
                "featid", "feats", "pos", "nouncase", "nnumber", "derivation", "clitic", "tense",
            ],
        )
        .with_table(
            "lemmas",
            &["lemma", "lemmac", "pos", "lemmafreq", "lemmalen", "amblemma", "comparts"],
        )
        .with_table("derivations", &["featid", "derivation"])
        .with_table("clitics", &["featid", "clitic"])
        .with_table("nouncases", &["featid", "nouncase"])
        .with_table("initgramfreqs", &["form", "frequency"])
        .with_table("fingramfreqs", &["form", "frequency"])
        .with_table("wordbigramfreqs", &["form", "frequency"])
}

fn totals() -> AggregateTotals {
    AggregateTotals {
        frequency: 2_000_000.0,
        lemma_frequency: 2_000_000.0,
        init_gram: 500_000.0,
        fin_gram: 500_000.0,
        bigram: 10_000.0,
    }
}

#[test]
fn test_full_query_is_normalized() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let query = parse(
        "pos = noun and end in ssa,ssä and freq > 100 and compound",
        &catalog,
        &totals(),
    )
    .unwrap();

    assert_eq!(query.predicates.len(), 4);

    let pos = &query.predicates[0];
    assert_eq!(pos.field, "pos");
    assert_eq!(pos.value, PredicateValue::Text("NOUN".into()));

    let end = &query.predicates[1];
    assert_eq!(end.field, "form");
    assert_eq!(end.operator, Operator::EndsWith);
    assert_eq!(
        end.value,
        PredicateValue::TextSet(vec!["ssa".into(), "ssä".into()])
    );

    let freq = &query.predicates[2];
    assert_eq!(freq.field, "frequency");
    assert_eq!(freq.operator, Operator::GreaterThan);
    assert_eq!(freq.value, PredicateValue::Number(Value::Int(100)));

    let compound = &query.predicates[3];
    assert_eq!(compound.operator, Operator::Like);
    assert!(!compound.negate);
}

#[test]
fn test_all_clause_errors_are_reported_together() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let err = parse(
        "nouncase in Ill,Gen and pos in PROPN,NOUN and foo = 0 and len > a and len<10",
        &catalog,
        &totals(),
    )
    .unwrap_err();

    assert_eq!(
        err.errors(),
        &[
            ParseError::UnknownField {
                field: "foo".into()
            },
            ParseError::NotANumber {
                field: "len".into(),
                value: "a".into()
            },
            ParseError::InvalidPart {
                part: "len<10".into()
            },
        ]
    );
    let message = err.to_string();
    assert!(message.contains("Query key 'foo' not ok"));
    assert!(message.contains("Query value for key 'len' not ok: 'a' is not a number"));
    assert!(message.contains("Invalid query part: 'len<10'"));
}

#[test]
fn test_partial_parse_keeps_valid_predicates() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let totals = totals();
    let builder = QueryBuilder::new(&catalog, &totals);
    let (query, errors) = builder.parse_partial("pos = NOUN and len ~= 3");

    assert_eq!(query.predicates.len(), 1);
    assert_eq!(
        errors[0].to_string(),
        "Query comparator for 'len' not ok: '~='"
    );
}

#[test]
fn test_relative_values_become_absolute_thresholds() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let query = parse(
        "relfreq > 5 and relbigramfreq >= 2.5",
        &catalog,
        &totals(),
    )
    .unwrap();

    assert_eq!(query.predicates[0].field, "frequency");
    assert_eq!(query.predicates[0].value.as_number(), Some(10.0));
    assert_eq!(query.predicates[1].field, "bigramfreq");
    assert_eq!(query.predicates[1].value.as_number(), Some(25.0));
}

#[test]
fn test_two_word_operators() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let query = parse(
        "case not in ine,ela and lemma not like %talli",
        &catalog,
        &totals(),
    )
    .unwrap();

    let case = &query.predicates[0];
    assert_eq!(case.field, "nouncase");
    assert_eq!(case.operator, Operator::In);
    assert!(case.negate);
    assert_eq!(
        case.value,
        PredicateValue::TextSet(vec!["Ine".into(), "Ela".into()])
    );

    let lemma = &query.predicates[1];
    assert_eq!(lemma.field, "lemma");
    assert_eq!(lemma.operator, Operator::Like);
    assert!(lemma.negate);
}

#[test]
fn test_operator_legality_per_kind() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let totals = totals();

    let err = parse("start like ab%", &catalog, &totals).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Query comparator for 'start' not ok: 'like'"
    );

    let err = parse("form > 3", &catalog, &totals).unwrap_err();
    assert_eq!(err.to_string(), "Query comparator for 'form' not ok: '>'");

    let err = parse("len in 1,2", &catalog, &totals).unwrap_err();
    assert_eq!(err.to_string(), "Query comparator for 'len' not ok: 'in'");
}

#[test]
fn test_top_is_extracted_and_never_a_predicate() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let query = parse("pos = NOUN and top 3", &catalog, &totals()).unwrap();
    assert_eq!(query.top, Some(3));
    assert_eq!(query.predicates.len(), 1);

    let err = parse("top many", &catalog, &totals()).unwrap_err();
    assert_eq!(
        err.errors(),
        &[ParseError::InvalidTop {
            value: "many".into()
        }]
    );
}

#[test]
fn test_placeholder_feature_value_is_kept() {
    let catalog = FieldCatalog::relational(&corpus_schema());
    let query = parse("clitic in _,kin", &catalog, &totals()).unwrap();
    assert_eq!(
        query.predicates[0].value,
        PredicateValue::TextSet(vec!["_".into(), "Kin".into()])
    );
    assert!(query.predicates[0].value.has_placeholder());
}

#[test]
fn test_feature_fields_follow_the_schema() {
    let schema = RelationalSchema::new()
        .with_table("wordfreqs", &["lemma", "form", "pos", "frequency", "len"])
        .with_table("features", &["featid", "mood"]);
    let catalog = FieldCatalog::relational(&schema);

    assert!(parse("mood = ind", &catalog, &totals()).is_ok());
    let err = parse("tense = pres", &catalog, &totals()).unwrap_err();
    assert_eq!(err.to_string(), "Query key 'tense' not ok");
}
