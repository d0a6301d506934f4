// Handler for a single manually entered record (create or edit).
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::dataset::SalesDataset;
use crate::data::dates::canonical_date;
use crate::data::normalizer::{coerce_amount, coerce_count, RecordDraft, RecordNormalizer};
use crate::error::EngineError;
use shared::models::{FieldValue, SalesRecord};

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default)]
pub struct EntryFields {
    pub date: String,
    pub branch: String,
    pub channel: String,
    pub transaction_count: String,
    pub sales_amount: String,
    pub product: Option<String>,
    pub sales_rep: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryAction {
    Created { index: usize },
    Updated { index: usize },
}

#[derive(Debug, Clone)]
pub struct EntryOutcome {
    pub record: SalesRecord,
    pub action: EntryAction,
}

/// Checks every field and reports all violations together, one per field.
pub fn validate_entry(fields: &EntryFields) -> Result<RecordDraft, EngineError> {
    let mut violations: Vec<String> = Vec::new();

    let date = fields.date.trim();
    let canonical = if date.is_empty() {
        violations.push("Date is required".to_string());
        None
    } else {
        let parsed = canonical_date(date);
        if parsed.is_none() {
            violations.push(format!("Date '{}' must be a valid MM/DD/YYYY date", date));
        }
        parsed
    };

    if fields.branch.trim().is_empty() {
        violations.push("Branch is required".to_string());
    }
    if fields.channel.trim().is_empty() {
        violations.push("Channel is required".to_string());
    }

    let count_text = fields.transaction_count.trim();
    let transaction_count = coerce_count(&FieldValue::from(count_text));
    if count_text.is_empty() {
        violations.push("Transaction count is required".to_string());
    } else if transaction_count <= 0 {
        violations.push("Transaction count must be a positive whole number".to_string());
    }

    let amount_text = fields.sales_amount.trim();
    let sales_amount = coerce_amount(&FieldValue::from(amount_text));
    if amount_text.is_empty() {
        violations.push("Sales amount is required".to_string());
    } else if sales_amount <= 0.0 {
        violations.push("Sales amount must be greater than zero".to_string());
    }

    match canonical {
        Some(date) if violations.is_empty() => Ok(RecordDraft {
            date,
            branch: fields.branch.clone(),
            channel: fields.channel.clone(),
            transaction_count: transaction_count as u64,
            sales_amount,
            product: fields.product.clone(),
            sales_rep: fields.sales_rep.clone(),
        }),
        _ => Err(EngineError::Validation(violations)),
    }
}

pub async fn handle_submit_entry(
    fields: EntryFields,
    editing_index: Option<usize>,
    normalizer: &RecordNormalizer,
    dataset: Arc<RwLock<SalesDataset>>,
) -> Result<EntryOutcome, EngineError> {
    let draft = match validate_entry(&fields) {
        Ok(draft) => draft,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected manual entry");
            return Err(e);
        }
    };
    let record = normalizer.build(draft);

    let mut store = dataset.write().await;
    let action = match editing_index {
        Some(index) => {
            store.replace(index, record.clone())?;
            EntryAction::Updated { index }
        }
        None => EntryAction::Created {
            index: store.push(record.clone()),
        },
    };
    tracing::info!(action = ?action, id = %record.id, "Stored manual entry");

    Ok(EntryOutcome { record, action })
}
