//! Curriculum standards graph
//!
//! Turns a loaded network of curriculum standards, categories and provider
//! resources into view-specific graphs and lays them out with a
//! force-directed engine. A build command selects how the graph is grown
//! from the entity store; resources of selected providers are overlaid; the
//! layout bridge then computes coordinates on a single serialized engine.

pub mod aggregate;
pub mod bridge;
pub mod commands;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod layout;
pub mod projections;
pub mod value_objects;

// Re-export main types
pub use aggregate::{DisplayedResource, GraphEdge, GraphNode, NodeDetail, WorkingGraph};
pub use bridge::{BridgeConfig, GraphService, LayoutBridge, RenderOutcome};
pub use commands::BuildCommand;
pub use errors::{
    BuildError, DataLoadError, GraphConstructionError, LayoutError, ProviderStyleExhaustionError,
    RecordSourceError, RenderError,
};
pub use handlers::{attach_resources, GraphBuilder, OverlayReport};
pub use infrastructure::{EntityStore, JsonRecordSource, LoadReport, RecordBatch, RecordSource};
pub use layout::{LayoutAlgorithm, LayoutConfig, LayoutEngine, LayoutMap, LayoutPoint, LayoutRequest};
pub use projections::{GraphSummary, StandardsTable};

// Re-export value objects
pub use value_objects::{
    Depth, Dimension, Grade, GradeBucket, GradeRange, LabelMode, NodeKind, Position2D, StandardType,
};
