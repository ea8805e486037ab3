use crate::ast::predicate::Predicate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A conjunction of predicates plus the per-form row cap requested with
/// `top <n>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub predicates: Vec<Predicate>,
    pub top: Option<u32>,
}

impl Query {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self {
            predicates,
            top: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(|p| p.field.as_str())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.predicates.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join(" and "))?;
        if let Some(top) = self.top {
            write!(f, " top {top}")?;
        }
        Ok(())
    }
}
