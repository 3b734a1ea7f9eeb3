//! Graph projections
//!
//! Read views over a finished working graph.

pub mod graph_summary;
pub mod standards_table;

pub use graph_summary::GraphSummary;
pub use standards_table::{split_description, StandardsRow, StandardsTable};
