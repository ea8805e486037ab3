pub mod ast;
pub mod builder;
pub mod catalog;
pub mod errors;
pub mod lexer;
pub mod parser;

pub use ast::{
    operator::{Comparator, Operator},
    predicate::{Predicate, PredicateValue},
    query::Query,
};
pub use builder::{QueryBuilder, parse};
pub use catalog::{
    FieldCatalog,
    field::{FeatureMatch, FieldDescriptor, FieldKind, Position},
    table::TableId,
};
pub use errors::{ParseError, ParseErrors};
