use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Textual date layout used by every stored record.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

// Canonical field names a source row is looked up by (already lower-cased).
pub const FIELD_DATE: &str = "date";
pub const FIELD_BRANCH: &str = "branch";
pub const FIELD_CHANNEL: &str = "channel";
pub const FIELD_TRANSACTIONS: &str = "transactions";
pub const FIELD_SALES: &str = "sales";

/// The five fields a source may provide for one sales observation.
pub const SOURCE_FIELDS: [&str; 5] = [
    FIELD_DATE,
    FIELD_BRANCH,
    FIELD_CHANNEL,
    FIELD_TRANSACTIONS,
    FIELD_SALES,
];

/// One normalized sales observation, identical in shape whatever source it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: Uuid,
    pub date: String,
    pub branch: String,
    pub channel: String,
    pub transaction_count: u64,
    pub sales_amount: f64,
    pub average_sale: f64,
    pub product: String,
    pub sales_rep: String,
}

/// A single untyped cell value as produced by a format decoder.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Blank means absent, empty, or whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Renders the value as trimmed text. Whole numbers print without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{:.0}", n),
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            FieldValue::Empty
        } else {
            FieldValue::Text(s.to_string())
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// Field name -> value mapping for one source row, before normalization.
///
/// Names are trimmed and lower-cased on insert and on lookup, so `" Sales "`
/// and `"SALES"` address the same field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// Position of the row in its source, used in skip diagnostics.
    pub index: usize,
    fields: HashMap<String, FieldValue>,
}

impl RawRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(normalize_field_name(name), value);
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Missing fields read as `FieldValue::Empty`.
    pub fn get(&self, name: &str) -> &FieldValue {
        static EMPTY: FieldValue = FieldValue::Empty;
        self.fields.get(&normalize_field_name(name)).unwrap_or(&EMPTY)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&normalize_field_name(name))
    }
}

pub fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_lookup_ignores_case_and_padding() {
        let row = RawRow::new(0).with(" Sales ", 10.0).with("BRANCH", "Main");
        assert_eq!(row.get("sales"), &FieldValue::Number(10.0));
        assert_eq!(row.get("Branch"), &FieldValue::Text("Main".to_string()));
        assert!(row.contains("SALES"));
        assert_eq!(row.get("channel"), &FieldValue::Empty);
    }

    #[test]
    fn blank_detection() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::Text("   ".into()).is_blank());
        assert!(!FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::from("x").is_blank());
    }

    #[test]
    fn number_text_rendering() {
        assert_eq!(FieldValue::Number(45000.0).as_text(), "45000");
        assert_eq!(FieldValue::Number(12.5).as_text(), "12.5");
        assert_eq!(FieldValue::Text("  a ".into()).as_text(), "a");
    }

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = SalesRecord {
            id: Uuid::now_v7(),
            date: "01/05/2024".to_string(),
            branch: "Main".to_string(),
            channel: "Delivery".to_string(),
            transaction_count: 5,
            sales_amount: 50.0,
            average_sale: 10.0,
            product: "General".to_string(),
            sales_rep: "Unassigned".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["transactionCount"], 5);
        assert_eq!(json["averageSale"], 10.0);
        assert_eq!(json["salesRep"], "Unassigned");
    }
}
