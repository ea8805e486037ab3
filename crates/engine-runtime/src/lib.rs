pub mod corpus;
pub mod error;
pub mod frame;
pub mod logging;
pub mod outcome;

pub use corpus::Corpus;
pub use error::RuntimeError;
pub use frame::FrameCorpus;
pub use outcome::{QueryOutcome, QueryStatus};
