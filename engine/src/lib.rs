// Engine library root: sales data ingestion and normalization.

pub mod config;
pub mod data;
pub mod error;
pub mod services;

pub use data::adapters::SourceKind;
pub use error::EngineError;
pub use services::SalesService;
