pub mod columns;
pub mod dedup;
pub mod pipeline;
pub mod top;

pub use columns::{AnchorColumns, RelativeColumns};
pub use dedup::{DedupLast, RowCap};
pub use pipeline::{Transform, TransformPipeline, TransformPipelineExt};
pub use top::top_per_form;
