//! Error taxonomy for loading, building and laying out standards graphs
//!
//! Data-load and graph-construction errors are non-fatal: the offending
//! record, reference or node is skipped and the error is kept as a warning.
//! Build parameter errors and layout errors are fatal to the one request.

use serde::Serialize;
use thiserror::Error;

/// Problems found while indexing raw records
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum DataLoadError {
    #[error("Record has no Id ({collection})")]
    MissingId { collection: &'static str },

    #[error("Standard {id} has an invalid grade: {reason}")]
    InvalidGrade { id: String, reason: String },

    #[error("Duplicate {collection} record {id}")]
    DuplicateRecord { collection: &'static str, id: String },

    #[error("Standard {from} references unknown connection {to}")]
    UnknownConnection { from: String, to: String },

    #[error("Category {category} references unknown standard {standard}")]
    UnknownCategoryMember { category: String, standard: String },

    #[error("Category {id} has unknown type '{kind}'")]
    UnknownCategoryType { id: String, kind: String },
}

/// More providers than palette and shape combinations
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("Provider {provider} cannot be styled: only {capacity} color/shape combinations exist")]
pub struct ProviderStyleExhaustionError {
    pub provider: String,
    pub capacity: usize,
}

/// Problems hit while materializing nodes and edges
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum GraphConstructionError {
    #[error("Node {id} of type '{kind}' cannot be labeled")]
    Unlabelable { id: String, kind: String },

    #[error("Standard {0} is referenced but not loaded")]
    MissingStandard(String),

    #[error("Edge {source_id} - {target_id} has an endpoint missing from the graph")]
    DanglingEdge { source_id: String, target_id: String },

    #[error("Resource {resource} collides with existing {kind} node")]
    ResourceIdCollision { resource: String, kind: String },
}

/// Warnings reported by a data load
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum LoadWarning {
    #[error(transparent)]
    Data(#[from] DataLoadError),

    #[error(transparent)]
    ProviderStyle(#[from] ProviderStyleExhaustionError),
}

/// Fatal problems with a build command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("Standard not found: {0}")]
    StandardNotFound(String),

    #[error("Category not found: {kind} {id}")]
    CategoryNotFound { kind: String, id: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Failures of one layout computation
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
pub enum LayoutError {
    #[error("Layout serialization failed: {0}")]
    Serialization(String),

    #[error("Layout engine failed to initialize: {0}")]
    EngineInit(String),

    #[error("Layout engine evaluation failed: {0}")]
    EngineFailure(String),

    #[error("Layout engine returned {returned} coordinates for {expected} nodes")]
    CoordinateCount { expected: usize, returned: usize },

    #[error("Layout engine returned an invalid rId tag: {0}")]
    InvalidTag(u32),

    #[error("Layout computation timed out after {0} ms")]
    Timeout(u64),

    #[error("Layout worker is not running")]
    WorkerUnavailable,
}

/// Errors from a record source
#[derive(Debug, Error)]
pub enum RecordSourceError {
    #[error("Failed to read records: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures of a graph service render
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("Render task failed: {0}")]
    Task(String),
}
