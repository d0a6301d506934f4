use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unsupported source '{0}': expected a .xlsx, .xls, .csv or .json file")]
    UnsupportedSource(String),

    #[error("Spreadsheet contains no sheets")]
    EmptyWorkbook,

    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    #[error("JSON payload must be an array of records")]
    NotAnArray,

    #[error("No valid records found ({skipped} row(s) skipped)")]
    NoValidRecords { skipped: usize },

    #[error("Invalid entry: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("No record at index {index} (dataset holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("JSON parsing error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Spreadsheet decoding error: {source}")]
    SpreadsheetError {
        #[from]
        source: calamine::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),
}

impl EngineError {
    /// True for failures that abort a whole ingestion call, as opposed to
    /// manual-entry rejections.
    pub fn is_structural(&self) -> bool {
        !matches!(
            self,
            EngineError::Validation(_) | EngineError::IndexOutOfRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_human_readable() {
        let err = EngineError::MissingHeaders(vec!["date".into(), "sales".into()]);
        assert_eq!(err.to_string(), "Missing required column(s): date, sales");

        let err = EngineError::Validation(vec!["Date is required".into(), "Sales amount is required".into()]);
        assert_eq!(
            err.to_string(),
            "Invalid entry: Date is required; Sales amount is required"
        );
        assert!(!err.is_structural());
        assert!(EngineError::NotAnArray.is_structural());
    }
}
