//! Graph aggregate
//!
//! The working graph and the labeling rule applied to its standard nodes.

pub mod labels;
pub mod working_graph;

pub use labels::standard_label;
pub use working_graph::{
    DisplayedResource, EdgeKey, GraphEdge, GraphNode, GraphSnapshot, NodeDetail, WorkingGraph,
};
