// Excel workbooks (.xlsx / .xls), decoded with calamine.
use super::{map_headers, SourceAdapter, SourceKind};
use crate::data::dates::convert_serial_date;
use crate::data::normalizer::SkipLog;
use crate::error::EngineError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use shared::models::{FieldValue, RawRow, FIELD_DATE};
use std::io::Cursor;

/// A decoded workbook: sheets in file order, each a grid of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// 1-based sheet row of `rows[0]`; leading blank rows are not decoded.
    pub first_row: usize,
    /// First row holds the headers.
    pub rows: Vec<Vec<FieldValue>>,
}

impl Workbook {
    pub fn decode(input: &[u8]) -> Result<Self, EngineError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(input))?;
        let sheets = workbook
            .worksheets()
            .into_iter()
            .map(|(name, range)| Sheet {
                name,
                first_row: range.start().map_or(1, |(row, _)| row as usize + 1),
                rows: range.rows().map(|row| row.iter().map(cell_value).collect()).collect(),
            })
            .collect();
        Ok(Workbook { sheets })
    }
}

fn cell_value(cell: &Data) -> FieldValue {
    match cell {
        Data::String(s) => FieldValue::from(s.as_str()),
        Data::Float(f) => FieldValue::Number(*f),
        Data::Int(i) => FieldValue::Number(*i as f64),
        Data::DateTime(dt) => FieldValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => FieldValue::from(s.as_str()),
        Data::Bool(b) => FieldValue::Text(b.to_string()),
        Data::Error(_) | Data::Empty => FieldValue::Empty,
    }
}

pub struct SpreadsheetAdapter;

impl SpreadsheetAdapter {
    /// Builds raw rows from the first sheet of a decoded workbook.
    ///
    /// Numeric date cells are converted from serial day numbers first. Row
    /// numbers match the sheet: the first data row sits just below the headers.
    pub fn rows_from_workbook(workbook: &Workbook) -> Result<Vec<RawRow>, EngineError> {
        let sheet = workbook.sheets.first().ok_or(EngineError::EmptyWorkbook)?;
        tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "Reading first worksheet");

        let Some((header_row, data_rows)) = sheet.rows.split_first() else {
            return Ok(Vec::new());
        };
        let header_text: Vec<String> = header_row.iter().map(FieldValue::as_text).collect();
        let mapping = map_headers(header_text.iter().map(String::as_str));

        let rows = data_rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| {
                let mut row = RawRow::new(sheet.first_row + 1 + idx);
                for (column, field) in &mapping {
                    let cell = cells.get(*column).cloned().unwrap_or_default();
                    let value = if *field == FIELD_DATE {
                        convert_serial_date(&cell)
                    } else {
                        cell
                    };
                    row.insert(field, value);
                }
                row
            })
            .collect();
        Ok(rows)
    }
}

impl SourceAdapter for SpreadsheetAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Spreadsheet
    }

    fn parse(&self, input: &[u8], _skips: &mut SkipLog) -> Result<Vec<RawRow>, EngineError> {
        let workbook = Workbook::decode(input)?;
        Self::rows_from_workbook(&workbook)
    }
}
