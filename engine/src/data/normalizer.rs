// Turns loosely-typed source rows into canonical sales records.
use crate::config::settings::EngineSettings;
use crate::data::dates;
use shared::models::{
    FieldValue, RawRow, SalesRecord, FIELD_BRANCH, FIELD_CHANNEL, FIELD_DATE, FIELD_SALES,
    FIELD_TRANSACTIONS,
};
use shared::utils::round2;
use std::fmt;
use uuid::Uuid;

/// Why a row did not make it into the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    MissingField(&'static str),
    InvalidDate(String),
    NonPositiveTransactions(String),
    NonPositiveSales(String),
    NotAnObject,
    UnreadableRow(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField(field) => write!(f, "missing '{}'", field),
            SkipReason::InvalidDate(raw) => write!(f, "invalid date '{}'", raw),
            SkipReason::NonPositiveTransactions(raw) => {
                write!(f, "transactions must be a positive integer (got '{}')", raw)
            }
            SkipReason::NonPositiveSales(raw) => {
                write!(f, "sales must be a positive amount (got '{}')", raw)
            }
            SkipReason::NotAnObject => write!(f, "entry is not an object"),
            SkipReason::UnreadableRow(detail) => write!(f, "unreadable row: {}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowSkip {
    pub row: usize,
    pub reason: SkipReason,
}

/// Collects skipped rows for one ingestion call. Every skip is also logged.
#[derive(Debug, Default, Clone)]
pub struct SkipLog {
    skips: Vec<RowSkip>,
}

impl SkipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, row: usize, reason: SkipReason) {
        tracing::warn!(row, reason = %reason, "Skipping row");
        self.skips.push(RowSkip { row, reason });
    }

    pub fn len(&self) -> usize {
        self.skips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skips.is_empty()
    }

    pub fn into_vec(self) -> Vec<RowSkip> {
        self.skips
    }
}

/// Validated field values ready to become a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub date: String,
    pub branch: String,
    pub channel: String,
    pub transaction_count: u64,
    pub sales_amount: f64,
    pub product: Option<String>,
    pub sales_rep: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    default_channel: String,
    default_product: String,
    default_sales_rep: String,
}

impl RecordNormalizer {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            default_channel: settings.default_channel.clone(),
            default_product: settings.default_product.clone(),
            default_sales_rep: settings.default_sales_rep.clone(),
        }
    }

    /// Normalizes one raw row. Returns `None` and records the reason when the row is unusable.
    pub fn normalize(&self, row: &RawRow, skips: &mut SkipLog) -> Option<SalesRecord> {
        match self.draft(row) {
            Ok(draft) => Some(self.build(draft)),
            Err(reason) => {
                skips.record(row.index, reason);
                None
            }
        }
    }

    pub fn normalize_all(&self, rows: &[RawRow], skips: &mut SkipLog) -> Vec<SalesRecord> {
        rows.iter().filter_map(|row| self.normalize(row, skips)).collect()
    }

    fn draft(&self, row: &RawRow) -> Result<RecordDraft, SkipReason> {
        let date_value = row.get(FIELD_DATE);
        let branch_value = row.get(FIELD_BRANCH);
        if date_value.is_blank() {
            return Err(SkipReason::MissingField(FIELD_DATE));
        }
        if branch_value.is_blank() {
            return Err(SkipReason::MissingField(FIELD_BRANCH));
        }

        let raw_date = date_value.as_text();
        let date = dates::canonical_date(&raw_date).ok_or(SkipReason::InvalidDate(raw_date))?;

        let channel_value = row.get(FIELD_CHANNEL);
        let channel = if channel_value.is_blank() {
            self.default_channel.clone()
        } else {
            channel_value.as_text()
        };

        let transactions_value = row.get(FIELD_TRANSACTIONS);
        let transaction_count = coerce_count(transactions_value);
        if transaction_count <= 0 {
            return Err(SkipReason::NonPositiveTransactions(transactions_value.as_text()));
        }

        let sales_value = row.get(FIELD_SALES);
        let sales_amount = coerce_amount(sales_value);
        if sales_amount <= 0.0 {
            return Err(SkipReason::NonPositiveSales(sales_value.as_text()));
        }

        Ok(RecordDraft {
            date,
            branch: branch_value.as_text(),
            channel,
            transaction_count: transaction_count as u64,
            sales_amount,
            product: None,
            sales_rep: None,
        })
    }

    /// Builds the final record: trims text, derives the average, applies defaults and assigns an id.
    pub fn build(&self, draft: RecordDraft) -> SalesRecord {
        let product = non_blank(draft.product).unwrap_or_else(|| self.default_product.clone());
        let sales_rep = non_blank(draft.sales_rep).unwrap_or_else(|| self.default_sales_rep.clone());

        SalesRecord {
            id: Uuid::now_v7(),
            date: draft.date,
            branch: draft.branch.trim().to_string(),
            channel: draft.channel.trim().to_string(),
            transaction_count: draft.transaction_count,
            sales_amount: draft.sales_amount,
            average_sale: round2(draft.sales_amount / draft.transaction_count as f64),
            product,
            sales_rep,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Integer coercion: numbers truncate, text uses its leading integer, anything else is 0.
pub fn coerce_count(value: &FieldValue) -> i64 {
    match value {
        FieldValue::Number(n) if n.is_finite() => n.trunc() as i64,
        FieldValue::Text(s) => leading_integer(s).unwrap_or(0),
        _ => 0,
    }
}

/// Real-number coercion: text uses its leading decimal number, anything else is 0.
pub fn coerce_amount(value: &FieldValue) -> f64 {
    match value {
        FieldValue::Number(n) if n.is_finite() => *n,
        FieldValue::Text(s) => leading_decimal(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

// Length of an optional sign followed by digits at the start of `s`.
fn signed_digits_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        0
    } else {
        end + digits
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let end = signed_digits_len(s);
    if end == 0 {
        return None;
    }
    s[..end].parse().ok()
}

fn leading_decimal(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_digits > 0 || int_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    // Optional exponent, only taken when followed by digits.
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let exp_len = signed_digits_len(&s[end + 1..]);
        if exp_len > 0 {
            end += 1 + exp_len;
        }
    }
    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}
