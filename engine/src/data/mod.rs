pub mod adapters;
pub mod dataset;
pub mod dates;
pub mod normalizer;
