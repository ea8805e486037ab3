pub mod error;
pub mod filter;
pub mod transform;

pub use error::CompileError;
pub use filter::{
    compiler::FilterCompiler,
    frame::{CompiledFrameFilter, FilterStep, FrameCompiler},
    post::PostMaterializationFilter,
    sql::{CompiledSql, RelationalCompiler},
};
