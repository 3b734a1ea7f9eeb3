//! Graph summary projection
//!
//! Provides a summary view of a working graph: counts per node kind, edges,
//! build warnings and layout state.

use indexmap::IndexMap;
use serde::Serialize;

use crate::aggregate::WorkingGraph;
use crate::value_objects::LabelMode;

/// Summary information about a graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub label_mode: LabelMode,
    /// Current number of nodes in the graph
    pub node_count: usize,
    /// Current number of edges in the graph
    pub edge_count: usize,
    /// Nodes per kind, in order of first appearance
    pub nodes_by_kind: IndexMap<String, usize>,
    /// Displayable resources per provider
    pub resource_counts: IndexMap<String, usize>,
    pub warning_count: usize,
    /// Whether every node has coordinates
    pub positioned: bool,
    pub layout_error: Option<String>,
}

impl GraphSummary {
    pub fn from_graph(graph: &WorkingGraph) -> Self {
        let mut nodes_by_kind: IndexMap<String, usize> = IndexMap::new();
        for node in graph.nodes() {
            *nodes_by_kind.entry(node.kind.to_string()).or_default() += 1;
        }

        Self {
            label_mode: graph.label_mode(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            nodes_by_kind,
            resource_counts: graph.resource_counts().clone(),
            warning_count: graph.warnings().len(),
            positioned: graph.is_positioned(),
            layout_error: graph.layout_error().map(ToString::to_string),
        }
    }

    /// Nodes of one kind, by its display name
    pub fn count_of(&self, kind: &str) -> usize {
        self.nodes_by_kind.get(kind).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::BuildCommand;
    use crate::errors::LayoutError;
    use crate::handlers::{attach_resources, GraphBuilder};
    use crate::infrastructure::fixtures::sample_store;
    use crate::value_objects::{Depth, Dimension};

    #[test]
    fn test_summary_of_3d_graph() {
        let (store, _) = sample_store();
        let mut graph = GraphBuilder::new(&store)
            .build(&BuildCommand::Category3D {
                view: Dimension::Dci,
                category_id: "DCI_PS3".to_string(),
                depth: Depth::new(2).unwrap(),
            })
            .unwrap();
        attach_resources(&mut graph, &store);
        graph.set_layout_error(Some(LayoutError::Timeout(10)));

        let summary = GraphSummary::from_graph(&graph);
        assert_eq!(summary.node_count, 13);
        assert_eq!(summary.edge_count, 13);
        assert_eq!(summary.count_of("dci_category"), 8);
        assert_eq!(summary.count_of("DCI"), 2);
        assert_eq!(summary.count_of("PE"), 3);
        assert_eq!(summary.count_of("resource"), 0);
        assert_eq!(summary.resource_counts["prov-a"], 1);
        assert!(!summary.positioned);
        assert_eq!(
            summary.layout_error.as_deref(),
            Some("Layout computation timed out after 10 ms")
        );
    }
}
