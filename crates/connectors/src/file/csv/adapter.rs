use crate::file::csv::{
    error::FileError,
    frame::LazyFrame,
    metadata::{CsvColumnMetadata, CsvMetadata, normalize_col_name},
    settings::CsvSettings,
};
use csv::{Reader, ReaderBuilder, StringRecord};
use model::core::data_type::DataType;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use tracing::debug;

/// A delimited export on disk together with its inferred column metadata.
///
/// The adapter never keeps a reader open; every scan reopens the file.
#[derive(Debug, Clone)]
pub struct CsvAdapter {
    pub path: PathBuf,
    pub settings: CsvSettings,
    pub metadata: CsvMetadata,
}

impl CsvAdapter {
    pub fn open(path: impl AsRef<Path>, settings: CsvSettings) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(FileError::NotFound(path.display().to_string()));
        }

        let metadata = infer_metadata(&path, &settings)?;
        debug!(
            "Opened export {} with columns {:?}",
            path.display(),
            metadata
                .columns
                .iter()
                .map(|c| format!("{}:{}", c.name, c.data_type))
                .collect::<Vec<_>>()
        );

        Ok(Self {
            path,
            settings,
            metadata,
        })
    }

    pub fn reader(&self) -> Result<Reader<File>, FileError> {
        let reader = ReaderBuilder::new()
            .delimiter(self.settings.delimiter)
            .has_headers(self.settings.has_header)
            .from_path(&self.path)?;
        Ok(reader)
    }

    /// A fresh lazy scan over the whole file.
    pub fn lazy(&self) -> LazyFrame<'_> {
        LazyFrame::new(self)
    }

    pub fn columns(&self) -> Vec<String> {
        self.metadata.column_names()
    }
}

fn infer_metadata(path: &Path, settings: &CsvSettings) -> Result<CsvMetadata, FileError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(settings.delimiter)
        .has_headers(settings.has_header)
        .from_path(path)?;

    let headers: Vec<String> = if settings.has_header {
        reader.headers()?.iter().map(normalize_col_name).collect()
    } else {
        let width = reader.headers()?.len();
        (0..width).map(|i| format!("column_{i}")).collect()
    };
    if headers.is_empty() {
        return Err(FileError::InvalidFormat(format!(
            "{} has no columns",
            path.display()
        )));
    }

    let mut types = vec![DataType::Null; headers.len()];
    let mut record = StringRecord::new();
    let mut sampled = 0;
    while sampled < settings.sample_size && reader.read_record(&mut record)? {
        for (idx, cell) in record.iter().enumerate().take(types.len()) {
            types[idx] = types[idx].merge(DataType::infer(cell));
        }
        sampled += 1;
    }

    let columns = headers
        .into_iter()
        .zip(types)
        .enumerate()
        .map(|(ordinal, (name, data_type))| CsvColumnMetadata {
            name,
            // A column with no sampled value is read as text.
            data_type: match data_type {
                DataType::Null => DataType::String,
                t => t,
            },
            ordinal,
        })
        .collect();

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(CsvMetadata {
        name,
        columns,
        delimiter: settings.delimiter as char,
    })
}
