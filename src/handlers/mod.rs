//! Graph construction handlers
//!
//! The graph builder turns a build command into a working graph, and the
//! resource overlay decorates that graph with provider resources. Both are
//! pure single-threaded transforms over a borrowed entity store.

mod graph_builder;
mod resource_overlay;

pub use graph_builder::{remap_grade_bounds, GraphBuilder};
pub use resource_overlay::{attach_resources, OverlayReport};
