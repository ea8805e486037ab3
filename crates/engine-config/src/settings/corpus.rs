use crate::error::SettingsError;
use serde::Deserialize;
use std::path::PathBuf;

/// Where the corpus lives on disk.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusSettings {
    pub datadir: String,
    /// Relational database file, relative to `datadir` unless absolute.
    pub database: String,
    /// Flat export file, relative to `datadir` unless absolute.
    pub export: String,
    pub delimiter: char,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            datadir: ".".to_string(),
            database: "wm2database.db".to_string(),
            export: "wm2export.csv".to_string(),
            delimiter: ',',
        }
    }
}

impl CorpusSettings {
    pub fn database_path(&self) -> Result<PathBuf, SettingsError> {
        self.resolve(&self.database)
    }

    pub fn export_path(&self) -> Result<PathBuf, SettingsError> {
        self.resolve(&self.export)
    }

    fn resolve(&self, file: &str) -> Result<PathBuf, SettingsError> {
        let file = expand_home(file)?;
        if file.is_absolute() {
            return Ok(file);
        }
        Ok(expand_home(&self.datadir)?.join(file))
    }
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> Result<PathBuf, SettingsError> {
    if path == "~" {
        return dirs::home_dir().ok_or(SettingsError::NoHomeDir);
    }
    match path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(SettingsError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_files_resolve_against_datadir() {
        let corpus = CorpusSettings {
            datadir: "/srv/corpora".into(),
            ..Default::default()
        };
        assert_eq!(
            corpus.database_path().unwrap(),
            PathBuf::from("/srv/corpora/wm2database.db")
        );

        let absolute = CorpusSettings {
            export: "/tmp/export.csv".into(),
            ..corpus
        };
        assert_eq!(absolute.export_path().unwrap(), PathBuf::from("/tmp/export.csv"));
    }

    #[test]
    fn test_expand_home() {
        let Some(home) = dirs::home_dir() else { return };
        assert_eq!(expand_home("~/corpora").unwrap(), home.join("corpora"));
        assert_eq!(expand_home("data/~x").unwrap(), PathBuf::from("data/~x"));
    }
}
