pub mod adapter;
pub mod error;
pub mod frame;
pub mod metadata;
pub mod settings;
pub mod totals;
