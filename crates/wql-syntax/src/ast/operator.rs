use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparator as written in a query clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Like,
    NotLike,
    In,
    NotIn,
}

impl Comparator {
    pub fn parse(token: &str) -> Option<Self> {
        let c = match token.to_ascii_lowercase().as_str() {
            "=" | "==" => Comparator::Equal,
            "!=" | "<>" => Comparator::NotEqual,
            "<" => Comparator::LessThan,
            ">" => Comparator::GreaterThan,
            "<=" => Comparator::LessOrEqual,
            ">=" => Comparator::GreaterOrEqual,
            "like" => Comparator::Like,
            "in" => Comparator::In,
            "notin" => Comparator::NotIn,
            _ => return None,
        };
        Some(c)
    }

    /// Two-word spellings `not in` and `not like`.
    pub fn parse_pair(first: &str, second: &str) -> Option<Self> {
        if !first.eq_ignore_ascii_case("not") {
            return None;
        }
        match second.to_ascii_lowercase().as_str() {
            "in" => Some(Comparator::NotIn),
            "like" => Some(Comparator::NotLike),
            _ => None,
        }
    }

    /// Normalized operator and negation flag.
    pub fn normalize(&self) -> (Operator, bool) {
        match self {
            Comparator::Equal => (Operator::Equal, false),
            Comparator::NotEqual => (Operator::Equal, true),
            Comparator::LessThan => (Operator::LessThan, false),
            Comparator::GreaterThan => (Operator::GreaterThan, false),
            Comparator::LessOrEqual => (Operator::LessOrEqual, false),
            Comparator::GreaterOrEqual => (Operator::GreaterOrEqual, false),
            Comparator::Like => (Operator::Like, false),
            Comparator::NotLike => (Operator::Like, true),
            Comparator::In => (Operator::In, false),
            Comparator::NotIn => (Operator::In, true),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Comparator::In | Comparator::NotIn)
    }

    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Comparator::LessThan
                | Comparator::GreaterThan
                | Comparator::LessOrEqual
                | Comparator::GreaterOrEqual
        )
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparator::Equal => write!(f, "="),
            Comparator::NotEqual => write!(f, "!="),
            Comparator::LessThan => write!(f, "<"),
            Comparator::GreaterThan => write!(f, ">"),
            Comparator::LessOrEqual => write!(f, "<="),
            Comparator::GreaterOrEqual => write!(f, ">="),
            Comparator::Like => write!(f, "like"),
            Comparator::NotLike => write!(f, "not like"),
            Comparator::In => write!(f, "in"),
            Comparator::NotIn => write!(f, "notin"),
        }
    }
}

/// Normalized predicate operator. Negation is carried separately on the
/// predicate, so `!=` is `Equal` negated and `notin` is `In` negated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Equal,
    LessThan,
    GreaterThan,
    LessOrEqual,
    GreaterOrEqual,
    Like,
    In,
    StartsWith,
    Middle,
    EndsWith,
}

impl Operator {
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Operator::LessThan
                | Operator::GreaterThan
                | Operator::LessOrEqual
                | Operator::GreaterOrEqual
        )
    }

    pub fn is_positional(&self) -> bool {
        matches!(
            self,
            Operator::StartsWith | Operator::Middle | Operator::EndsWith
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equal => write!(f, "="),
            Operator::LessThan => write!(f, "<"),
            Operator::GreaterThan => write!(f, ">"),
            Operator::LessOrEqual => write!(f, "<="),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::Like => write!(f, "like"),
            Operator::In => write!(f, "in"),
            Operator::StartsWith => write!(f, "start"),
            Operator::Middle => write!(f, "middle"),
            Operator::EndsWith => write!(f, "end"),
        }
    }
}
