use crate::{error::SettingsError, settings::EngineSettings};

pub fn validate(settings: &EngineSettings) -> Result<(), SettingsError> {
    let query = &settings.query;
    if query.row_limit == 0 {
        return Err(SettingsError::Invalid {
            key: "row_limit",
            reason: "must be greater than zero".to_string(),
        });
    }
    if query.order_by.trim().is_empty() {
        return Err(SettingsError::Invalid {
            key: "order_by",
            reason: "must name a column".to_string(),
        });
    }

    let corpus = &settings.corpus;
    if !corpus.delimiter.is_ascii() {
        return Err(SettingsError::Invalid {
            key: "delimiter",
            reason: format!("'{}' is not a single-byte character", corpus.delimiter),
        });
    }
    Ok(())
}
