use crate::{
    ast::{
        operator::{Comparator, Operator},
        predicate::{Predicate, PredicateValue},
        query::Query,
    },
    catalog::{
        COMPOUND_MARKER, FieldCatalog,
        field::{FieldDescriptor, FieldKind, Position},
    },
    errors::{ParseError, ParseErrors},
    lexer::{Lexer, token::Clause},
};
use model::core::{totals::AggregateTotals, value::Value};
use tracing::debug;

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses `input` against `catalog`, rescaling relative-frequency values
/// with `totals`.
pub fn parse(
    input: &str,
    catalog: &FieldCatalog,
    totals: &AggregateTotals,
) -> Result<Query, ParseErrors> {
    QueryBuilder::new(catalog, totals).parse(input)
}

enum ClauseOutcome {
    Predicate(Predicate),
    Top(u32),
}

/// Turns query text into a validated [`Query`].
pub struct QueryBuilder<'a> {
    catalog: &'a FieldCatalog,
    totals: &'a AggregateTotals,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(catalog: &'a FieldCatalog, totals: &'a AggregateTotals) -> Self {
        Self { catalog, totals }
    }

    /// Fails with every clause error when any clause is invalid.
    pub fn parse(&self, input: &str) -> Result<Query, ParseErrors> {
        let (query, errors) = self.parse_partial(input);
        if errors.is_empty() {
            debug!("Parsed query: {}", query);
            Ok(query)
        } else {
            Err(ParseErrors(errors))
        }
    }

    /// Returns the valid predicates together with the errors of the
    /// rejected clauses.
    pub fn parse_partial(&self, input: &str) -> (Query, Vec<ParseError>) {
        let mut lexer = Lexer::new();
        let clauses = match lexer.tokenize(input) {
            Ok(clauses) => clauses,
            Err(err) => return (Query::default(), vec![err.into()]),
        };

        let mut query = Query::default();
        let mut errors = Vec::new();

        if clauses.iter().all(|c| c.is_empty()) && clauses.len() == 1 {
            return (query, errors);
        }

        for clause in &clauses {
            match self.build_clause(clause) {
                Ok(ClauseOutcome::Predicate(p)) => query.predicates.push(p),
                Ok(ClauseOutcome::Top(n)) => query.top = Some(n),
                Err(err) => errors.push(err),
            }
        }

        (query, errors)
    }

    fn build_clause(&self, clause: &Clause) -> ParseResult<ClauseOutcome> {
        let words = clause.words();
        let invalid = || ParseError::InvalidPart {
            part: clause.text.clone(),
        };

        match words.as_slice() {
            [] => Err(invalid()),
            [first, count] if first.eq_ignore_ascii_case("top") => {
                match count.parse::<u32>() {
                    Ok(n) if n > 0 => Ok(ClauseOutcome::Top(n)),
                    _ => Err(ParseError::InvalidTop {
                        value: count.to_string(),
                    }),
                }
            }
            [w] if w.eq_ignore_ascii_case("compound") => self.build_compound(false),
            [not, w] if not.eq_ignore_ascii_case("not") && w.eq_ignore_ascii_case("compound") => {
                self.build_compound(true)
            }
            [field, comparator, value] => {
                let descriptor = self.lookup(field)?;
                let comparator = Comparator::parse(comparator)
                    .filter(|c| descriptor.allows(*c))
                    .ok_or_else(|| ParseError::IllegalComparator {
                        field: field.to_string(),
                        comparator: comparator.to_string(),
                    })?;
                self.build_predicate(field, descriptor, comparator, value)
                    .map(ClauseOutcome::Predicate)
            }
            [field, not, op, value] => {
                let comparator = Comparator::parse_pair(not, op).ok_or_else(invalid)?;
                let descriptor = self.lookup(field)?;
                if !descriptor.allows(comparator) {
                    return Err(ParseError::IllegalComparator {
                        field: field.to_string(),
                        comparator: format!("{not} {op}"),
                    });
                }
                self.build_predicate(field, descriptor, comparator, value)
                    .map(ClauseOutcome::Predicate)
            }
            _ => Err(invalid()),
        }
    }

    /// `compound` and `not compound`: a lemma carrying the compound marker.
    fn build_compound(&self, negate: bool) -> ParseResult<ClauseOutcome> {
        if self.catalog.get("compound").is_none() {
            return Err(ParseError::UnknownField {
                field: "compound".to_string(),
            });
        }

        Ok(ClauseOutcome::Predicate(Predicate::new(
            "lemma",
            Operator::Like,
            PredicateValue::Text(format!("%{COMPOUND_MARKER}%")),
            negate,
        )))
    }

    fn lookup(&self, field: &str) -> ParseResult<&'a FieldDescriptor> {
        self.catalog
            .lookup(field)
            .ok_or_else(|| ParseError::UnknownField {
                field: field.to_string(),
            })
    }

    fn build_predicate(
        &self,
        token: &str,
        descriptor: &FieldDescriptor,
        comparator: Comparator,
        raw: &str,
    ) -> ParseResult<Predicate> {
        let (operator, negate) = comparator.normalize();

        match descriptor.kind {
            FieldKind::Numeric => {
                let text = strip_quotes(raw);
                let number = text.parse::<f64>().ok().filter(|n| n.is_finite()).ok_or_else(|| {
                    ParseError::NotANumber {
                        field: token.to_string(),
                        value: text.to_string(),
                    }
                })?;

                let (field, number) = match descriptor.relative {
                    Some(rel) => (rel.field, self.totals.to_absolute(rel.total, number)),
                    None => (descriptor.name.as_str(), number),
                };

                Ok(Predicate::new(
                    field,
                    operator,
                    PredicateValue::Number(Value::from_number(number)),
                    negate,
                ))
            }
            FieldKind::Positional(position) => {
                let operator = match position {
                    Position::Start => Operator::StartsWith,
                    Position::Middle => Operator::Middle,
                    Position::End => Operator::EndsWith,
                };
                let value = text_value(token, comparator, raw)?;
                Ok(Predicate::new("form", operator, value, negate))
            }
            FieldKind::Text | FieldKind::Feature(_) => {
                let mut value = text_value(token, comparator, raw)?;
                let mut field = descriptor.name.as_str();

                if field == "pos" {
                    value = map_texts(value, |t| t.to_uppercase());
                } else if matches!(descriptor.kind, FieldKind::Feature(_))
                    && operator != Operator::Like
                {
                    value = map_texts(value, title_case);
                } else if field == "lemma" && operator != Operator::Like {
                    field = "lemmac";
                    value = map_texts(value, |t| t.replace(COMPOUND_MARKER, ""));
                }

                Ok(Predicate::new(field, operator, value, negate))
            }
            FieldKind::Boolean => Err(ParseError::IllegalComparator {
                field: token.to_string(),
                comparator: comparator.to_string(),
            }),
        }
    }
}

fn strip_quotes(raw: &str) -> &str {
    raw.trim_matches(|c| c == '\'' || c == '"')
}

fn text_value(field: &str, comparator: Comparator, raw: &str) -> ParseResult<PredicateValue> {
    if !comparator.is_set() {
        return Ok(PredicateValue::Text(strip_quotes(raw).to_string()));
    }

    let items: Vec<String> = raw
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(ParseError::EmptySet {
            field: field.to_string(),
        });
    }
    Ok(PredicateValue::TextSet(items))
}

fn map_texts(value: PredicateValue, f: impl Fn(&str) -> String) -> PredicateValue {
    match value {
        PredicateValue::Text(t) => PredicateValue::Text(f(&t)),
        PredicateValue::TextSet(items) => {
            PredicateValue::TextSet(items.iter().map(|i| f(i)).collect())
        }
        other => other,
    }
}

/// `ill` -> `Ill`. The `_` placeholder is left alone.
pub fn title_case(value: &str) -> String {
    if value == "_" {
        return value.to_string();
    }
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::core::schema::RelationalSchema;

    fn catalog() -> FieldCatalog {
        let schema = RelationalSchema::new()
            .with_table(
                "wordfreqs",
                &["lemma", "form", "pos", "frequency", "len", "feats", "featid"],
            )
            .with_table("features", &["featid", "nouncase", "nnumber", "derivation"]);
        FieldCatalog::relational(&schema)
    }

    fn parse_ok(input: &str) -> Query {
        let totals = AggregateTotals {
            frequency: 1_000_000.0,
            ..Default::default()
        };
        parse(input, &catalog(), &totals).unwrap()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ill"), "Ill");
        assert_eq!(title_case("SING"), "Sing");
        assert_eq!(title_case("_"), "_");
        assert_eq!(title_case("ässä"), "Ässä");
    }

    #[test]
    fn test_lemma_equality_redirects_to_stripped_lemma() {
        let q = parse_ok("lemma = auto#talli");
        assert_eq!(q.predicates[0].field, "lemmac");
        assert_eq!(q.predicates[0].value, PredicateValue::Text("autotalli".into()));

        let q = parse_ok("lemma like auto%");
        assert_eq!(q.predicates[0].field, "lemma");
    }

    #[test]
    fn test_not_compound_is_negated_like() {
        let q = parse_ok("not compound");
        let p = &q.predicates[0];
        assert_eq!(p.field, "lemma");
        assert_eq!(p.operator, Operator::Like);
        assert!(p.negate);
        assert_eq!(p.value, PredicateValue::Text("%#%".into()));
    }

    #[test]
    fn test_malformed_compound_clause() {
        let totals = AggregateTotals::default();
        let err = parse("naat compound", &catalog(), &totals).unwrap_err();
        assert_eq!(err.to_string(), "Invalid query part: 'naat compound'");
    }

    #[test]
    fn test_compound_as_a_value_is_a_plain_predicate() {
        let q = parse_ok("lemma = compound");
        assert_eq!(q.predicates[0].field, "lemmac");
        assert_eq!(q.predicates[0].value, PredicateValue::Text("compound".into()));
        assert!(!q.predicates[0].negate);

        let q = parse_ok("form != compound");
        assert_eq!(q.predicates[0].field, "form");
        assert_eq!(q.predicates[0].operator, Operator::Equal);
        assert!(q.predicates[0].negate);

        let q = parse_ok("form not like compound%");
        assert_eq!(q.predicates[0].operator, Operator::Like);
        assert!(q.predicates[0].negate);
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let totals = AggregateTotals::default();
        let err = parse("pos in ,", &catalog(), &totals).unwrap_err();
        assert_eq!(err.errors(), &[ParseError::EmptySet { field: "pos".into() }]);
    }

    #[test]
    fn test_empty_input_is_empty_query() {
        let q = parse_ok("   ");
        assert!(q.is_empty());
        assert_eq!(q.top, None);
    }
}
