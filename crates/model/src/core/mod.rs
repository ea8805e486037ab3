pub mod data_type;
pub mod schema;
pub mod totals;
pub mod value;
