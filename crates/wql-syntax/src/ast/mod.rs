pub mod operator;
pub mod predicate;
pub mod query;
