// JSON arrays of flat record objects.
use super::{SourceAdapter, SourceKind};
use crate::data::normalizer::{SkipLog, SkipReason};
use crate::error::EngineError;
use serde_json::Value;
use shared::models::{FieldValue, RawRow, SOURCE_FIELDS};

pub struct JsonAdapter;

impl JsonAdapter {
    /// Builds raw rows from a decoded JSON document.
    ///
    /// An entry only becomes a row when it carries every source field as a key,
    /// `channel` included. Entries are numbered from 1.
    pub fn rows_from_value(value: &Value, skips: &mut SkipLog) -> Result<Vec<RawRow>, EngineError> {
        let entries = value.as_array().ok_or(EngineError::NotAnArray)?;

        let mut rows = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let position = idx + 1;
            let Some(object) = entry.as_object() else {
                skips.record(position, SkipReason::NotAnObject);
                continue;
            };

            let mut row = RawRow::new(position);
            for (key, value) in object {
                row.insert(key, field_value(value));
            }

            if let Some(missing) = SOURCE_FIELDS.iter().find(|field| !row.contains(field)) {
                skips.record(position, SkipReason::MissingField(*missing));
                continue;
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

fn field_value(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Empty,
        Value::String(s) => FieldValue::from(s.as_str()),
        Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or_default(),
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        nested => FieldValue::Text(nested.to_string()),
    }
}

impl SourceAdapter for JsonAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Json
    }

    fn parse(&self, input: &[u8], skips: &mut SkipLog) -> Result<Vec<RawRow>, EngineError> {
        let value: Value = serde_json::from_slice(input)?;
        Self::rows_from_value(&value, skips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_entries_become_rows() {
        let value = json!([
            { " Date ": "01/05/2024", "BRANCH": "Main", "Channel": "Online", "Transactions": 5, "Sales": 50.5, "extra": true },
            { "date": "01/06/2024", "branch": "North", "channel": null, "transactions": "3", "sales": "30" }
        ]);
        let mut skips = SkipLog::new();
        let rows = JsonAdapter::rows_from_value(&value, &mut skips).unwrap();
        assert!(skips.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("date"), &FieldValue::Text("01/05/2024".into()));
        assert_eq!(rows[0].get("transactions"), &FieldValue::Number(5.0));
        assert_eq!(rows[0].get("sales"), &FieldValue::Number(50.5));
        assert_eq!(rows[1].get("channel"), &FieldValue::Empty);
        assert_eq!(rows[1].index, 2);
    }

    #[test]
    fn test_entry_without_channel_key_is_skipped() {
        let value = json!([{ "date": "01/05/2024", "branch": "Main", "transactions": 5, "sales": 50 }]);
        let mut skips = SkipLog::new();
        let rows = JsonAdapter::rows_from_value(&value, &mut skips).unwrap();
        assert!(rows.is_empty());
        assert_eq!(skips.into_vec()[0].reason, SkipReason::MissingField("channel"));
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let value = json!([1, "text", null]);
        let mut skips = SkipLog::new();
        let rows = JsonAdapter::rows_from_value(&value, &mut skips).unwrap();
        assert!(rows.is_empty());
        assert_eq!(skips.len(), 3);
    }

    #[test]
    fn test_non_array_payload_is_structural() {
        let mut skips = SkipLog::new();
        let result = JsonAdapter.parse(br#"{"date":"01/05/2024"}"#, &mut skips);
        assert!(matches!(result, Err(EngineError::NotAnArray)));
    }

    #[test]
    fn test_malformed_json_is_structural() {
        let mut skips = SkipLog::new();
        let result = JsonAdapter.parse(b"[{\"date\":", &mut skips);
        assert!(matches!(result, Err(EngineError::JsonError { .. })));
    }
}
