pub mod fixture;
pub mod utils;

mod conformance;
mod relational;
