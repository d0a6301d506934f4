// engine/src/services/sales_service/mod.rs
// Owns the shared dataset and routes each front-end action to its handler.

use crate::config::settings::EngineSettings;
use crate::data::adapters::SourceKind;
use crate::data::dataset::SalesDataset;
use crate::data::normalizer::RecordNormalizer;
use crate::error::EngineError;
use shared::models::SalesRecord;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod ingest;
pub mod submit_entry;

pub use ingest::IngestReport;
pub use submit_entry::{EntryAction, EntryFields, EntryOutcome};

pub struct SalesService {
    dataset: Arc<RwLock<SalesDataset>>,
    normalizer: RecordNormalizer,
}

impl SalesService {
    pub fn new(dataset: Arc<RwLock<SalesDataset>>, settings: &EngineSettings) -> Self {
        SalesService {
            dataset,
            normalizer: RecordNormalizer::new(settings),
        }
    }

    /// Ingests an in-memory source of a known kind and appends its valid records.
    pub async fn ingest(&self, input: &[u8], kind: SourceKind) -> Result<IngestReport, EngineError> {
        tracing::info!(source = %kind, bytes = input.len(), "Received ingestion request");
        ingest::handle_ingest(input, kind, &self.normalizer, self.dataset.clone()).await
    }

    /// Detects the kind from the file extension, reads the whole file, then ingests it.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport, EngineError> {
        let kind = SourceKind::from_path(path)?;
        let input = tokio::fs::read(path).await?;
        tracing::info!(path = %path.display(), "Read source file");
        self.ingest(&input, kind).await
    }

    /// Creates a record, or replaces the one at `editing_index` when given.
    pub async fn submit_entry(
        &self,
        fields: EntryFields,
        editing_index: Option<usize>,
    ) -> Result<EntryOutcome, EngineError> {
        tracing::info!(editing_index = ?editing_index, "Received manual entry");
        submit_entry::handle_submit_entry(fields, editing_index, &self.normalizer, self.dataset.clone()).await
    }

    /// A copy of the current records, in dataset order.
    pub async fn snapshot(&self) -> Vec<SalesRecord> {
        self.dataset.read().await.records().to_vec()
    }

    pub fn dataset(&self) -> Arc<RwLock<SalesDataset>> {
        self.dataset.clone()
    }

    pub async fn clear(&self) {
        let mut store = self.dataset.write().await;
        tracing::info!(removed = store.len(), "Clearing dataset");
        store.clear();
    }
}
