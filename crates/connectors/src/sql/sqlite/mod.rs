pub mod adapter;
pub mod error;
pub mod probe;
pub mod row;
pub mod totals;
