// Handler for batch ingestion of a whole source file.
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::data::adapters::SourceKind;
use crate::data::dataset::SalesDataset;
use crate::data::normalizer::{RecordNormalizer, RowSkip, SkipLog};
use crate::error::EngineError;
use shared::models::SalesRecord;
use shared::utils::format_amount;

/// Outcome of one successful ingestion call.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub kind: SourceKind,
    pub added: usize,
    /// The records appended, in source order.
    pub records: Vec<SalesRecord>,
    pub skipped: Vec<RowSkip>,
}

impl IngestReport {
    pub fn total_sales(&self) -> f64 {
        self.records.iter().map(|r| r.sales_amount).sum()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Imported {} record(s) from {}, total sales {}",
            self.added,
            self.kind,
            format_amount(self.total_sales())
        );
        if !self.skipped.is_empty() {
            summary.push_str(&format!(" ({} row(s) skipped)", self.skipped.len()));
        }
        summary
    }
}

/// Decodes and normalizes a source without touching the dataset.
///
/// Fails on structural problems and when no row survives normalization.
pub fn parse_source(
    input: &[u8],
    kind: SourceKind,
    normalizer: &RecordNormalizer,
) -> Result<(Vec<SalesRecord>, SkipLog), EngineError> {
    let mut skips = SkipLog::new();
    let rows = kind.adapter().parse(input, &mut skips)?;
    tracing::debug!(source = %kind, rows = rows.len(), "Decoded candidate rows");

    let records = normalizer.normalize_all(&rows, &mut skips);
    if records.is_empty() {
        return Err(EngineError::NoValidRecords {
            skipped: skips.len(),
        });
    }
    Ok((records, skips))
}

pub async fn handle_ingest(
    input: &[u8],
    kind: SourceKind,
    normalizer: &RecordNormalizer,
    dataset: Arc<RwLock<SalesDataset>>,
) -> Result<IngestReport, EngineError> {
    let (records, skips) = match parse_source(input, kind, normalizer) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::error!(source = %kind, error = %e, "Ingestion failed");
            return Err(e);
        }
    };

    let added = records.len();
    {
        let mut store = dataset.write().await;
        store.append(records.clone());
        tracing::info!(source = %kind, added, skipped = skips.len(), total = store.len(), "Appended records to dataset");
    }

    Ok(IngestReport {
        kind,
        added,
        records,
        skipped: skips.into_vec(),
    })
}
