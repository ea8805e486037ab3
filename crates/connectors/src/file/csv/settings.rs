#[derive(Debug, Clone)]
pub struct CsvSettings {
    pub delimiter: u8,
    pub has_header: bool,
    /// Rows read to infer column types when the file is opened.
    pub sample_size: usize,
}

impl CsvSettings {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Default::default()
        }
    }
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            sample_size: 1000,
        }
    }
}
