use crate::error::CompileError;
use wql_syntax::Query;

/// Compiles a parsed query into a backend-specific filter.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter;

    fn compile(&self, query: &Query) -> Result<Self::Filter, CompileError>;
}
