// Service layer: the entry points the front end calls into.
pub mod sales_service;

pub use sales_service::{EntryAction, EntryFields, EntryOutcome, IngestReport, SalesService};
