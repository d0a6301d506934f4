// Format adapters: one per supported source kind, all producing raw rows.
pub mod delimited;
pub mod json;
pub mod spreadsheet;

use crate::data::normalizer::SkipLog;
use crate::error::EngineError;
use shared::models::{normalize_field_name, RawRow, SOURCE_FIELDS};
use std::fmt;
use std::path::Path;

pub use delimited::DelimitedAdapter;
pub use json::JsonAdapter;
pub use spreadsheet::SpreadsheetAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Spreadsheet,
    Delimited,
    Json,
}

impl SourceKind {
    /// Detects the source kind from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "xlsx" | "xls" => Ok(SourceKind::Spreadsheet),
            "csv" => Ok(SourceKind::Delimited),
            "json" => Ok(SourceKind::Json),
            _ => Err(EngineError::UnsupportedSource(path.display().to_string())),
        }
    }

    pub fn adapter(self) -> &'static dyn SourceAdapter {
        match self {
            SourceKind::Spreadsheet => &SpreadsheetAdapter,
            SourceKind::Delimited => &DelimitedAdapter,
            SourceKind::Json => &JsonAdapter,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Spreadsheet => "spreadsheet",
            SourceKind::Delimited => "csv",
            SourceKind::Json => "json",
        };
        f.write_str(name)
    }
}

// Common trait for all source formats
pub trait SourceAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    /// Decodes the full input and returns its candidate rows.
    ///
    /// Rows that cannot even be read are recorded in `skips`; only structural
    /// problems (wrong shape, missing columns, undecodable input) are errors.
    fn parse(&self, input: &[u8], skips: &mut SkipLog) -> Result<Vec<RawRow>, EngineError>;
}

/// Maps header cells to the known source fields by position.
///
/// Returns `(column, field)` pairs; headers that are not source fields are ignored.
/// When a field appears twice the first column wins.
pub(crate) fn map_headers<'a, I>(headers: I) -> Vec<(usize, &'static str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mapping: Vec<(usize, &'static str)> = Vec::new();
    for (column, header) in headers.into_iter().enumerate() {
        let name = normalize_field_name(header);
        if let Some(field) = SOURCE_FIELDS.iter().copied().find(|f| *f == name) {
            if !mapping.iter().any(|(_, mapped)| *mapped == field) {
                mapping.push((column, field));
            }
        }
    }
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("sales.xlsx")).unwrap(), SourceKind::Spreadsheet);
        assert_eq!(SourceKind::from_path(Path::new("OLD.XLS")).unwrap(), SourceKind::Spreadsheet);
        assert_eq!(SourceKind::from_path(Path::new("a/b/sales.Csv")).unwrap(), SourceKind::Delimited);
        assert_eq!(SourceKind::from_path(Path::new("sales.json")).unwrap(), SourceKind::Json);
    }

    #[test]
    fn rejects_unknown_extensions() {
        for name in ["sales.txt", "sales", "sales.xlsx.bak"] {
            assert!(matches!(
                SourceKind::from_path(Path::new(name)),
                Err(EngineError::UnsupportedSource(_))
            ));
        }
    }

    #[test]
    fn adapter_matches_kind() {
        for kind in [SourceKind::Spreadsheet, SourceKind::Delimited, SourceKind::Json] {
            assert_eq!(kind.adapter().kind(), kind);
        }
    }

    #[test]
    fn header_mapping_is_case_insensitive() {
        let mapping = map_headers(vec![" DATE", "Notes", "Branch", "SALES", "Transactions", "date"]);
        assert_eq!(
            mapping,
            vec![(0, "date"), (2, "branch"), (3, "sales"), (4, "transactions")]
        );
    }
}
