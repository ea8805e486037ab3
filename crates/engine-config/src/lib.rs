pub mod error;
pub mod settings;

pub use error::SettingsError;
pub use settings::{
    EngineSettings,
    corpus::CorpusSettings,
    query::{IndexHintPolicy, QuerySettings},
};
