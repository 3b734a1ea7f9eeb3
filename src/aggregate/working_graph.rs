//! The working graph
//!
//! A per-request node/edge structure. Nodes are keyed by Id and keep their
//! insertion order; a node's rId is its 1-based insertion index. Edges are
//! undirected and keyed by the canonical (ordered) endpoint pair, so an edge
//! and its reverse are the same edge.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use super::labels::standard_label;
use crate::errors::{GraphConstructionError, LayoutError};
use crate::value_objects::{
    GradeBucket, GradeRange, LabelMode, NodeKind, NodeStyle, Position2D, ProviderStyle,
};

/// Identity of an undirected edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeKey(String, String);

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }
}

/// An edge, with endpoints in the order it was first added
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

/// A resource shown next to a standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedResource {
    pub resource_id: String,
    pub provider_id: String,
}

/// Kind-specific node payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum NodeDetail {
    Standard {
        ngss_code: Option<String>,
        description: String,
        url: String,
        grades: GradeRange,
        displayed_resources: Vec<DisplayedResource>,
    },
    TopicBundle {
        gradeband: String,
        members: Vec<String>,
    },
    CategoryBundle {
        bucket: GradeBucket,
        comprising: Vec<String>,
    },
    Resource {
        title: String,
        summary: String,
        url: String,
        resource_type: Option<String>,
        provider_id: String,
    },
}

/// A node of the working graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub kind: NodeKind,
    /// 1-based insertion index, the layout engine's node identifier
    pub r_id: u32,
    pub label: String,
    /// Set only after a successful layout
    pub position: Option<Position2D>,
    pub style: NodeStyle,
    pub detail: NodeDetail,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>, detail: NodeDetail) -> Self {
        let style = NodeStyle::for_kind(&kind, None);
        Self {
            id: id.into(),
            kind,
            r_id: 0,
            label: label.into(),
            position: None,
            style,
            detail,
        }
    }

    /// Take colors and shape from the owning provider
    pub fn with_provider_style(mut self, provider: Option<&ProviderStyle>) -> Self {
        self.style = NodeStyle::for_kind(&self.kind, provider);
        self
    }

    pub fn ngss_code(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Standard { ngss_code, .. } => ngss_code.as_deref(),
            _ => None,
        }
    }
}

/// Serializable view of a working graph
#[derive(Debug, Serialize)]
pub struct GraphSnapshot<'a> {
    pub label_mode: LabelMode,
    pub nodes: Vec<&'a GraphNode>,
    pub edges: Vec<&'a GraphEdge>,
    pub resource_counts: &'a IndexMap<String, usize>,
    pub warnings: &'a [GraphConstructionError],
    pub layout_error: Option<&'a LayoutError>,
}

/// Nodes and deduplicated undirected edges built for one request
#[derive(Debug, Clone, Default)]
pub struct WorkingGraph {
    nodes: IndexMap<String, GraphNode>,
    edges: IndexMap<EdgeKey, GraphEdge>,
    label_mode: LabelMode,
    warnings: Vec<GraphConstructionError>,
    resource_counts: IndexMap<String, usize>,
    layout_error: Option<LayoutError>,
}

impl WorkingGraph {
    pub fn new(label_mode: LabelMode) -> Self {
        Self {
            label_mode,
            ..Self::default()
        }
    }

    pub fn label_mode(&self) -> LabelMode {
        self.label_mode
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion (rId) order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn r_id(&self, id: &str) -> Option<u32> {
        self.nodes.get(id).map(|node| node.r_id)
    }

    /// Node holding a given rId
    pub fn node_by_r_id(&self, r_id: u32) -> Option<&GraphNode> {
        let index = usize::try_from(r_id).ok()?.checked_sub(1)?;
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Insert a node unless one with the same Id exists; returns whether it was added
    pub fn add_node(&mut self, mut node: GraphNode) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        node.r_id = self.nodes.len() as u32 + 1;
        debug!("Added node {} ({}) as rId {}", node.id, node.kind, node.r_id);
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Whether an edge joins `a` and `b`, in either direction
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edges.contains_key(&EdgeKey::new(a, b))
    }

    /// Add an undirected edge unless it already exists; returns whether it was added
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<bool, GraphConstructionError> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return Err(GraphConstructionError::DanglingEdge {
                source_id: source.to_string(),
                target_id: target.to_string(),
            });
        }
        if source == target {
            return Ok(false);
        }
        let key = EdgeKey::new(source, target);
        if self.edges.contains_key(&key) {
            return Ok(false);
        }
        self.edges.insert(
            key,
            GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
            },
        );
        Ok(true)
    }

    /// Add an edge, keeping a dangling endpoint as a warning
    pub(crate) fn connect(&mut self, source: &str, target: &str) {
        if let Err(err) = self.add_edge(source, target) {
            self.record_warning(err);
        }
    }

    pub(crate) fn record_warning(&mut self, warning: GraphConstructionError) {
        warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Non-fatal problems hit while building this graph
    pub fn warnings(&self) -> &[GraphConstructionError] {
        &self.warnings
    }

    pub(crate) fn add_displayed_resource(&mut self, standard_id: &str, resource: DisplayedResource) {
        if let Some(NodeDetail::Standard { displayed_resources, .. }) =
            self.nodes.get_mut(standard_id).map(|node| &mut node.detail)
        {
            if !displayed_resources.contains(&resource) {
                displayed_resources.push(resource);
            }
        }
    }

    /// Per-provider displayable resource counts from the last overlay
    pub fn resource_counts(&self) -> &IndexMap<String, usize> {
        &self.resource_counts
    }

    pub(crate) fn set_resource_counts(&mut self, counts: IndexMap<String, usize>) {
        self.resource_counts = counts;
    }

    /// Error of the last layout attempt, if it failed
    pub fn layout_error(&self) -> Option<&LayoutError> {
        self.layout_error.as_ref()
    }

    pub fn set_layout_error(&mut self, error: Option<LayoutError>) {
        self.layout_error = error;
    }

    /// Whether every node has coordinates
    pub fn is_positioned(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.values().all(|node| node.position.is_some())
    }

    /// Apply computed coordinates by node Id
    pub fn apply_positions<'a>(&mut self, positions: impl IntoIterator<Item = (&'a String, &'a Position2D)>) {
        for (id, position) in positions {
            if let Some(node) = self.nodes.get_mut(id) {
                node.position = Some(*position);
            }
        }
    }

    pub fn clear_positions(&mut self) {
        for node in self.nodes.values_mut() {
            node.position = None;
        }
    }

    /// Re-label standard nodes without rebuilding the graph
    pub fn relabel(&mut self, mode: LabelMode) {
        self.label_mode = mode;
        for node in self.nodes.values_mut() {
            if !node.kind.is_standard() {
                continue;
            }
            let code = node.ngss_code().map(str::to_string);
            match standard_label(&node.id, &node.kind, code.as_deref(), mode) {
                Ok(label) => node.label = label,
                Err(err) => warn!("{err}"),
            }
        }
    }

    /// Standard nodes stably sorted by their render order
    pub fn sorted_by_render_order(&self) -> Vec<&GraphNode> {
        let mut ordered: Vec<&GraphNode> = self
            .nodes
            .values()
            .filter(|node| node.style.order.is_some())
            .collect();
        ordered.sort_by_key(|node| node.style.order);
        ordered
    }

    pub fn snapshot(&self) -> GraphSnapshot<'_> {
        GraphSnapshot {
            label_mode: self.label_mode,
            nodes: self.nodes.values().collect(),
            edges: self.edges.values().collect(),
            resource_counts: &self.resource_counts,
            warnings: &self.warnings,
            layout_error: self.layout_error.as_ref(),
        }
    }
}
