use crate::error::SettingsError;
use corpus::CorpusSettings;
use query::QuerySettings;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub mod corpus;
pub mod query;
pub mod validator;

/// Complete engine configuration. Every key is optional in the TOML source.
///
/// ```toml
/// [corpus]
/// datadir = "~/corpora"
/// database = "wm2database.db"
///
/// [query]
/// row_limit = 500
/// index_hint = "never"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub corpus: CorpusSettings,
    pub query: QuerySettings,
}

impl EngineSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let settings: EngineSettings = toml::from_str(contents)?;
        validator::validate(&settings)?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loading settings from {}", path.display());
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::query::IndexHintPolicy;
    use std::io::Write;

    #[test]
    fn test_empty_source_gives_defaults() {
        let settings = EngineSettings::from_toml_str("").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.query.row_limit, 10_000);
        assert_eq!(settings.query.order_by, "frequency");
        assert!(settings.query.posx);
        assert!(!settings.query.relative);
        assert_eq!(settings.corpus.delimiter, ',');
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let settings = EngineSettings::from_toml_str(
            "[query]\nrow_limit = 25\nindex_hint = \"always\"\n\n[corpus]\ndelimiter = \"\\t\"\n",
        )
        .unwrap();
        assert_eq!(settings.query.row_limit, 25);
        assert_eq!(settings.query.index_hint, IndexHintPolicy::Always);
        assert!(settings.query.grams);
        assert_eq!(settings.corpus.delimiter, '\t');
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineSettings::from_toml_str("[query]\nrow_limit = 0\n").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "row_limit", .. }));

        let err = EngineSettings::from_toml_str("[query]\nindex_hint = \"sometimes\"\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[corpus]\ndatadir = \"/data\"\ndatabase = \"c.db\"").unwrap();
        let settings = EngineSettings::from_file(file.path()).unwrap();
        assert_eq!(
            settings.corpus.database_path().unwrap(),
            std::path::PathBuf::from("/data/c.db")
        );

        let err = EngineSettings::from_file("/nonexistent/settings.toml").unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
