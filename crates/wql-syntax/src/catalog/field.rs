use crate::{ast::operator::Comparator, catalog::table::TableId};
use model::core::totals::TotalKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Start,
    Middle,
    End,
}

/// How a morphological feature value is matched against a flat column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureMatch {
    /// One value per row.
    Exact,
    /// Comma-joined values; a row matches when any of them does.
    MultiChoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Numeric,
    Text,
    Positional(Position),
    Feature(FeatureMatch),
    Boolean,
}

impl FieldKind {
    pub fn operators(&self) -> &'static [Comparator] {
        use Comparator::*;
        match self {
            FieldKind::Numeric => &[
                Equal,
                NotEqual,
                LessThan,
                GreaterThan,
                LessOrEqual,
                GreaterOrEqual,
            ],
            FieldKind::Positional(_) => &[Equal, NotEqual, In, NotIn],
            FieldKind::Text | FieldKind::Feature(_) => {
                &[Equal, NotEqual, Like, NotLike, In, NotIn]
            }
            FieldKind::Boolean => &[],
        }
    }
}

/// A relative-frequency field and the absolute field it rescales to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelativeOf {
    pub field: &'static str,
    pub total: TotalKind,
}

/// Everything the parser and the compilers need to know about one query
/// field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// `None` for flat-table catalogs, which have no relational layout.
    pub backing_table: Option<TableId>,
    pub backing_column: String,
    pub operators_allowed: Vec<Comparator>,
    /// Character removed from the backing column before comparing.
    pub strip: Option<char>,
    /// Satellite table that holds split values of this feature.
    pub satellite: Option<TableId>,
    pub relative: Option<RelativeOf>,
}

impl FieldDescriptor {
    pub fn new(name: &str, kind: FieldKind, table: Option<TableId>, column: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            backing_table: table,
            backing_column: column.to_string(),
            operators_allowed: kind.operators().to_vec(),
            strip: None,
            satellite: None,
            relative: None,
        }
    }

    pub fn with_strip(mut self, ch: char) -> Self {
        self.strip = Some(ch);
        self
    }

    pub fn with_satellite(mut self, table: Option<TableId>) -> Self {
        self.satellite = table;
        self
    }

    pub fn with_relative(mut self, field: &'static str, total: TotalKind) -> Self {
        self.relative = Some(RelativeOf { field, total });
        self
    }

    pub fn allows(&self, comparator: Comparator) -> bool {
        self.operators_allowed.contains(&comparator)
    }
}
