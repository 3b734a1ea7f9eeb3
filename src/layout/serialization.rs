//! Layout wire format
//!
//! A working graph crosses into the layout engine as a node count plus an
//! edge list over the dense 1-based rId space, and comes back as an ordered
//! list of points. Points carrying an rId tag are mapped by tag; untagged
//! points map by position, index i to rId i + 1.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::aggregate::WorkingGraph;
use crate::errors::LayoutError;
use crate::value_objects::Position2D;

/// Computed coordinates by node Id, in rId order
pub type LayoutMap = IndexMap<String, Position2D>;

/// What the layout engine sees of a graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub node_count: usize,
    /// Undirected edges as rId pairs
    pub edges: Vec<(u32, u32)>,
}

impl LayoutRequest {
    /// Serialize a graph, checking the rId and endpoint invariants on the way
    pub fn from_graph(graph: &WorkingGraph) -> Result<Self, LayoutError> {
        for (index, node) in graph.nodes().enumerate() {
            if node.r_id as usize != index + 1 {
                return Err(LayoutError::Serialization(format!(
                    "node {} has rId {} at position {}",
                    node.id,
                    node.r_id,
                    index + 1
                )));
            }
        }

        let mut edges = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges() {
            let endpoints = graph.r_id(&edge.source).zip(graph.r_id(&edge.target));
            let Some(pair) = endpoints else {
                return Err(LayoutError::Serialization(format!(
                    "edge {} - {} has an endpoint outside the graph",
                    edge.source, edge.target
                )));
            };
            edges.push(pair);
        }

        Ok(Self {
            node_count: graph.node_count(),
            edges,
        })
    }

    /// GML text of the request: `graph[node[id 1]...edge[source 1 target 2]...]`
    pub fn to_gml(&self) -> String {
        let mut gml = String::from("graph[");
        for r_id in 1..=self.node_count {
            let _ = write!(gml, "node[id {r_id}]");
        }
        for (source, target) in &self.edges {
            let _ = write!(gml, "edge[source {source} target {target}]");
        }
        gml.push(']');
        gml
    }
}

/// One coordinate pair returned by an engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub r_id: Option<u32>,
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { r_id: None, x, y }
    }

    pub fn tagged(r_id: u32, x: f64, y: f64) -> Self {
        Self {
            r_id: Some(r_id),
            x,
            y,
        }
    }
}

/// Map engine points back onto node Ids, multiplied by `scale`
pub fn map_points(
    graph: &WorkingGraph,
    points: &[LayoutPoint],
    scale: f64,
) -> Result<LayoutMap, LayoutError> {
    let expected = graph.node_count();
    if points.len() != expected {
        return Err(LayoutError::CoordinateCount {
            expected,
            returned: points.len(),
        });
    }

    let mut slots: Vec<Option<Position2D>> = vec![None; expected];
    for (index, point) in points.iter().enumerate() {
        let r_id = point.r_id.unwrap_or(index as u32 + 1);
        let slot = (r_id as usize)
            .checked_sub(1)
            .and_then(|i| slots.get_mut(i))
            .ok_or(LayoutError::InvalidTag(r_id))?;
        if slot.is_some() {
            return Err(LayoutError::InvalidTag(r_id));
        }
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(LayoutError::EngineFailure(format!(
                "non-finite coordinate for rId {r_id}"
            )));
        }
        *slot = Some(Position2D::new(point.x, point.y).scaled(scale));
    }

    let mut layout = LayoutMap::with_capacity(expected);
    for (node, slot) in graph.nodes().zip(slots) {
        let position = slot.ok_or(LayoutError::InvalidTag(node.r_id))?;
        layout.insert(node.id.clone(), position);
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GraphNode, NodeDetail};
    use crate::value_objects::{LabelMode, NodeKind};

    fn path_graph(ids: &[&str]) -> WorkingGraph {
        let mut graph = WorkingGraph::new(LabelMode::Asn);
        for id in ids {
            graph.add_node(GraphNode::new(
                *id,
                NodeKind::TopicBundle,
                *id,
                NodeDetail::TopicBundle {
                    gradeband: id.to_string(),
                    members: Vec::new(),
                },
            ));
        }
        for pair in ids.windows(2) {
            graph.add_edge(pair[1], pair[0]).unwrap();
        }
        graph
    }

    #[test]
    fn test_request_uses_rids() {
        let graph = path_graph(&["a", "b", "c"]);
        let request = LayoutRequest::from_graph(&graph).unwrap();
        assert_eq!(request.node_count, 3);
        assert_eq!(request.edges, vec![(2, 1), (3, 2)]);
        assert_eq!(
            request.to_gml(),
            "graph[node[id 1]node[id 2]node[id 3]edge[source 2 target 1]edge[source 3 target 2]]"
        );
    }

    #[test]
    fn test_untagged_points_map_by_position_and_scale() {
        let graph = path_graph(&["a", "b"]);
        let points = [LayoutPoint::new(0.1, -0.2), LayoutPoint::new(1.0, 0.0)];
        let layout = map_points(&graph, &points, 100.0).unwrap();

        let a = layout["a"];
        assert!((a.x - 10.0).abs() < 1e-9);
        assert!((a.y + 20.0).abs() < 1e-9);
        assert_eq!(layout["b"], Position2D::new(100.0, 0.0));
    }

    #[test]
    fn test_tagged_points_map_by_tag() {
        let graph = path_graph(&["a", "b"]);
        let points = [LayoutPoint::tagged(2, 5.0, 5.0), LayoutPoint::tagged(1, -1.0, 0.0)];
        let layout = map_points(&graph, &points, 1.0).unwrap();
        assert_eq!(layout["a"], Position2D::new(-1.0, 0.0));
        assert_eq!(layout["b"], Position2D::new(5.0, 5.0));
    }

    #[test]
    fn test_bad_responses() {
        let graph = path_graph(&["a", "b"]);
        assert_eq!(
            map_points(&graph, &[LayoutPoint::new(0.0, 0.0)], 1.0),
            Err(LayoutError::CoordinateCount { expected: 2, returned: 1 })
        );
        assert_eq!(
            map_points(
                &graph,
                &[LayoutPoint::tagged(1, 0.0, 0.0), LayoutPoint::tagged(1, 1.0, 1.0)],
                1.0
            ),
            Err(LayoutError::InvalidTag(1))
        );
        assert_eq!(
            map_points(
                &graph,
                &[LayoutPoint::tagged(3, 0.0, 0.0), LayoutPoint::new(1.0, 1.0)],
                1.0
            ),
            Err(LayoutError::InvalidTag(3))
        );
        assert!(matches!(
            map_points(&graph, &[LayoutPoint::new(f64::NAN, 0.0), LayoutPoint::new(1.0, 1.0)], 1.0),
            Err(LayoutError::EngineFailure(_))
        ));
    }
}
