// Canonical sales data model shared by the ingestion engine and its consumers.
pub mod models;
pub mod utils;
