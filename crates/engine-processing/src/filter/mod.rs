pub mod compiler;
pub mod frame;
pub mod post;
pub mod sql;
