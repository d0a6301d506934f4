// Comma-separated text with a header row.
use super::{map_headers, SourceAdapter, SourceKind};
use crate::data::normalizer::{SkipLog, SkipReason};
use crate::error::EngineError;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{FieldValue, RawRow, FIELD_BRANCH, FIELD_DATE, FIELD_SALES, FIELD_TRANSACTIONS};

/// Columns a CSV file must carry. `channel` is optional and defaults later.
pub const REQUIRED_HEADERS: [&str; 4] = [FIELD_DATE, FIELD_BRANCH, FIELD_TRANSACTIONS, FIELD_SALES];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct DelimitedAdapter;

impl DelimitedAdapter {
    /// Builds raw rows from already-split records. Row numbers are the 1-based
    /// file line a record starts on; records without a position fall back to
    /// their order after the header.
    pub fn rows_from_records<I>(
        headers: &StringRecord,
        records: I,
        skips: &mut SkipLog,
    ) -> Result<Vec<RawRow>, EngineError>
    where
        I: IntoIterator<Item = Result<StringRecord, csv::Error>>,
    {
        let mapping = map_headers(headers.iter());
        let missing: Vec<String> = REQUIRED_HEADERS
            .iter()
            .filter(|required| !mapping.iter().any(|(_, field)| field == *required))
            .map(|required| required.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::MissingHeaders(missing));
        }

        let mut rows = Vec::new();
        for (idx, result) in records.into_iter().enumerate() {
            let fallback = idx + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(fallback, |p| p.line() as usize);
                    skips.record(line, SkipReason::UnreadableRow(e.to_string()));
                    continue;
                }
            };
            let line = record.position().map_or(fallback, |p| p.line() as usize);

            let mut row = RawRow::new(line);
            for (column, field) in &mapping {
                // Short rows are tolerated; absent cells read as blank.
                row.insert(field, FieldValue::from(record.get(*column).unwrap_or("")));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl SourceAdapter for DelimitedAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Delimited
    }

    fn parse(&self, input: &[u8], skips: &mut SkipLog) -> Result<Vec<RawRow>, EngineError> {
        let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(input);

        let headers = rdr.headers()?.clone();
        tracing::debug!(headers = ?headers, "Read CSV header row");
        Self::rows_from_records(&headers, rdr.records(), skips)
    }
}
