// The in-memory sales dataset: an ordered sequence of canonical records.
use crate::error::EngineError;
use shared::models::SalesRecord;

#[derive(Debug, Clone, Default)]
pub struct SalesDataset {
    records: Vec<SalesRecord>,
}

impl SalesDataset {
    pub fn new() -> Self {
        SalesDataset {
            records: Vec::new(),
        }
    }

    /// Appends records after the existing ones, keeping their order.
    pub fn append(&mut self, new_records: Vec<SalesRecord>) {
        self.records.extend(new_records);
    }

    pub fn push(&mut self, record: SalesRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Overwrites the record at `index`. The dataset is untouched when the index is out of range.
    pub fn replace(&mut self, index: usize, record: SalesRecord) -> Result<(), EngineError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(EngineError::IndexOutOfRange { index, len })?;
        *slot = record;
        Ok(())
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record. Only used for the explicit "clear all" action.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
