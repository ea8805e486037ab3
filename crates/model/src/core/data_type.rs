use crate::core::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column type of a delimited export, inferred from sampled cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataType {
    Int,
    Float,
    String,
    Null,
}

impl DataType {
    /// Infers the narrowest type that can hold `cell`. Empty cells carry no
    /// type information and infer as `Null`.
    pub fn infer(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() {
            DataType::Null
        } else if cell.parse::<i64>().is_ok() {
            DataType::Int
        } else if cell.parse::<f64>().is_ok() {
            DataType::Float
        } else {
            DataType::String
        }
    }

    /// Widens two observations of the same column into one type.
    pub fn merge(self, other: DataType) -> DataType {
        use DataType::*;
        match (self, other) {
            (Null, t) | (t, Null) => t,
            (Int, Int) => Int,
            (Int, Float) | (Float, Int) | (Float, Float) => Float,
            _ => String,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Converts a raw cell into a typed value. Cells that do not parse as the
    /// column type are kept as text rather than dropped.
    pub fn get_value(&self, cell: &str) -> Value {
        match self {
            DataType::Int => {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    return Value::Null;
                }
                trimmed
                    .parse::<i64>()
                    .map(Value::Int)
                    .unwrap_or_else(|_| Value::String(cell.to_string()))
            }
            DataType::Float => {
                let trimmed = cell.trim();
                if trimmed.is_empty() {
                    return Value::Null;
                }
                trimmed
                    .parse::<f64>()
                    .map(Value::Float)
                    .unwrap_or_else(|_| Value::String(cell.to_string()))
            }
            DataType::String | DataType::Null => Value::String(cell.to_string()),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INTEGER"),
            DataType::Float => write!(f, "REAL"),
            DataType::String => write!(f, "TEXT"),
            DataType::Null => write!(f, "NULL"),
        }
    }
}
