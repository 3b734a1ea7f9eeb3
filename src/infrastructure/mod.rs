//! Infrastructure layer
//!
//! Raw record shapes, the record sources that deliver them, and the entity
//! store that indexes one data load for graph construction.

pub mod entity_store;
pub mod record_source;
pub mod records;

#[cfg(test)]
pub(crate) mod fixtures;

pub use entity_store::{Category, EntityStore, LoadReport, Provider, Resource, Standard};
pub use record_source::{parse_payload, InMemoryRecordSource, JsonRecordSource, RecordSource};
pub use records::{CategoryRecord, ProviderRecord, RawScalar, RecordBatch, ResourceRecord, StandardRecord};
