//! Graph builder
//!
//! Runs the traversal or bundling algorithm selected by a [`BuildCommand`]
//! over the entity store. Every standard that lands in the graph is labeled
//! and styled on insertion; standards that cannot be labeled are skipped
//! together with every edge that would touch them.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::aggregate::{standard_label, GraphNode, NodeDetail, WorkingGraph};
use crate::commands::BuildCommand;
use crate::errors::{BuildError, GraphConstructionError};
use crate::infrastructure::EntityStore;
use crate::value_objects::{
    CategoryKind, Depth, Dimension, Grade, GradeBucket, LabelMode, NodeKind, StandardType,
};

/// Builds working graphs from one entity store
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<'a> {
    store: &'a EntityStore,
    label_mode: LabelMode,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a EntityStore) -> Self {
        Self {
            store,
            label_mode: LabelMode::default(),
        }
    }

    /// Label standards by ASN Id or NGSS code
    pub fn with_labels(mut self, label_mode: LabelMode) -> Self {
        self.label_mode = label_mode;
        self
    }

    /// Build the graph a command describes
    pub fn build(&self, command: &BuildCommand) -> Result<WorkingGraph, BuildError> {
        let mut construction = Construction::new(self.store, self.label_mode);

        match command {
            BuildCommand::StandardsNeighborhood { root_id, depth } => {
                construction.standards_neighborhood(root_id, *depth)?
            }
            BuildCommand::TopicCategory { category_id, .. } => {
                construction.topic_category(category_id)?
            }
            BuildCommand::Category3D {
                view,
                category_id,
                depth,
            } => construction.category_3d(*view, category_id, *depth)?,
            BuildCommand::Gradeband {
                low_grade,
                high_grade,
                depth,
            } => construction.gradeband(*low_grade, *high_grade, *depth)?,
        }

        let graph = construction.graph;
        info!(
            mode = command.mode(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            warnings = graph.warnings().len(),
            "Built working graph"
        );
        Ok(graph)
    }
}

/// Validate the requested grade range and apply the gradeband remap table.
///
/// The remap can invert a valid range, e.g. 7-8 becomes 9-8; such a range
/// selects no topics rather than failing the build.
pub fn remap_grade_bounds(low: u8, high: u8) -> Result<(Grade, Grade), BuildError> {
    let low = Grade::new(low).map_err(BuildError::InvalidParameter)?;
    let high = Grade::new(high).map_err(BuildError::InvalidParameter)?;
    if low > high {
        return Err(BuildError::InvalidParameter(format!(
            "low grade {low} is above high grade {high}"
        )));
    }

    let high = match high.value() {
        6 => Grade::new(8),
        7 => Grade::new(12),
        _ => Ok(high),
    }
    .map_err(BuildError::InvalidParameter)?;
    let low = match low.value() {
        7 => Grade::new(9),
        _ => Ok(low),
    }
    .map_err(BuildError::InvalidParameter)?;

    Ok((low, high))
}

/// Outcome of placing a standard in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Added,
    Present,
    Skipped,
}

impl Placement {
    fn is_placed(self) -> bool {
        self != Placement::Skipped
    }
}

/// State of one build
struct Construction<'a> {
    store: &'a EntityStore,
    graph: WorkingGraph,
    skipped: HashSet<String>,
}

impl<'a> Construction<'a> {
    fn new(store: &'a EntityStore, label_mode: LabelMode) -> Self {
        Self {
            store,
            graph: WorkingGraph::new(label_mode),
            skipped: HashSet::new(),
        }
    }

    fn place_standard(&mut self, id: &str) -> Placement {
        if self.graph.contains_node(id) {
            return Placement::Present;
        }
        if self.skipped.contains(id) {
            return Placement::Skipped;
        }

        let store = self.store;
        let Some(standard) = store.standard(id) else {
            self.skip(id, GraphConstructionError::MissingStandard(id.to_string()));
            return Placement::Skipped;
        };
        let kind = NodeKind::Standard(standard.standard_type.clone());
        let label = match standard_label(
            &standard.id,
            &kind,
            standard.ngss_code.as_deref(),
            self.graph.label_mode(),
        ) {
            Ok(label) => label,
            Err(err) => {
                self.skip(id, err);
                return Placement::Skipped;
            }
        };

        self.graph.add_node(GraphNode::new(
            standard.id.clone(),
            kind,
            label,
            NodeDetail::Standard {
                ngss_code: standard.ngss_code.clone(),
                description: standard.description.clone(),
                url: standard.url.clone(),
                grades: standard.grades,
                displayed_resources: Vec::new(),
            },
        ));
        Placement::Added
    }

    fn skip(&mut self, id: &str, reason: GraphConstructionError) {
        self.skipped.insert(id.to_string());
        self.graph.record_warning(reason);
    }

    fn link(&mut self, a: &str, b: &str) {
        if self.graph.contains_node(a) && self.graph.contains_node(b) {
            self.graph.connect(a, b);
        }
    }

    fn connections(&self, id: &str) -> Vec<String> {
        self.store
            .standard(id)
            .map(|standard| standard.connections.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Level-synchronous BFS; each node is expanded once, on its first visit
    fn standards_neighborhood(&mut self, root_query: &str, depth: Depth) -> Result<(), BuildError> {
        let root = self
            .store
            .resolve_standard(root_query)
            .ok_or_else(|| BuildError::StandardNotFound(root_query.to_string()))?;
        let root_id = root.id.clone();
        if !self.place_standard(&root_id).is_placed() {
            return Ok(());
        }

        let mut frontier = vec![root_id];
        for level in 1..=depth.value() {
            let mut next = Vec::new();
            for id in &frontier {
                for neighbor in self.connections(id) {
                    match self.place_standard(&neighbor) {
                        Placement::Added => next.push(neighbor.clone()),
                        Placement::Present => {}
                        Placement::Skipped => continue,
                    }
                    self.link(id, &neighbor);
                }
            }
            debug!("Neighborhood level {level} reached {} new standards", next.len());
            frontier = next;
        }
        Ok(())
    }

    /// Gradeband bundle chain; PEs attach to bundles and expand one more hop
    fn topic_category(&mut self, category_id: &str) -> Result<(), BuildError> {
        let bundle = self
            .store
            .topic_gradeband_bundle(category_id)
            .ok_or_else(|| BuildError::CategoryNotFound {
                kind: CategoryKind::Topic.to_string(),
                id: category_id.to_string(),
            })?;

        let mut bundle_ids = Vec::with_capacity(bundle.len());
        // Member topics are drawn as their bundle
        let mut bundle_of: HashMap<String, String> = HashMap::new();
        let mut previous: Option<String> = None;
        for (gradeband, members) in &bundle {
            let bundle_id = format!("topic-bundle:{category_id}:{gradeband}");
            self.graph.add_node(GraphNode::new(
                bundle_id.clone(),
                NodeKind::TopicBundle,
                gradeband.clone(),
                NodeDetail::TopicBundle {
                    gradeband: gradeband.clone(),
                    members: members.clone(),
                },
            ));
            if let Some(previous) = &previous {
                self.link(&bundle_id, previous);
            }
            previous = Some(bundle_id.clone());
            for member in members {
                bundle_of.insert(member.clone(), bundle_id.clone());
            }
            bundle_ids.push((bundle_id, members.clone()));
        }

        for (bundle_id, members) in bundle_ids {
            for topic in members {
                for pe in self.connections(&topic) {
                    if let Some(other) = bundle_of.get(&pe) {
                        self.link(other, &bundle_id);
                        continue;
                    }
                    match self.place_standard(&pe) {
                        Placement::Added => {
                            for neighbor in self.connections(&pe) {
                                if let Some(member_bundle) = bundle_of.get(&neighbor) {
                                    self.link(&pe, member_bundle);
                                } else if self.place_standard(&neighbor).is_placed() {
                                    self.link(&neighbor, &pe);
                                }
                            }
                        }
                        Placement::Present => {}
                        Placement::Skipped => continue,
                    }
                    self.link(&pe, &bundle_id);
                }
            }
        }
        Ok(())
    }

    /// Grade bucket chain; category standards attach to every bucket they overlap
    fn category_3d(&mut self, view: Dimension, category_id: &str, depth: Depth) -> Result<(), BuildError> {
        let members = self
            .store
            .category_bundle(view, category_id)
            .ok_or_else(|| BuildError::CategoryNotFound {
                kind: view.to_string(),
                id: category_id.to_string(),
            })?
            .to_vec();

        let mut previous: Option<String> = None;
        for bucket in GradeBucket::ALL {
            let bucket_id = format!("grade-bucket:{}", bucket.label());
            let comprising: Vec<String> = members
                .iter()
                .filter(|id| {
                    self.store.standard(id).is_some_and(|standard| {
                        self.store
                            .is_in_grade_range(standard.grades.high, standard.grades.low, bucket)
                    })
                })
                .cloned()
                .collect();

            self.graph.add_node(GraphNode::new(
                bucket_id.clone(),
                NodeKind::CategoryBundle(view),
                bucket.label(),
                NodeDetail::CategoryBundle {
                    bucket,
                    comprising: comprising.clone(),
                },
            ));
            if let Some(previous) = &previous {
                self.link(previous, &bucket_id);
            }
            previous = Some(bucket_id.clone());

            for standard in comprising {
                match self.place_standard(&standard) {
                    Placement::Added if depth.value() >= 2 => self.expand_3d(&standard, depth),
                    Placement::Skipped => continue,
                    _ => {}
                }
                self.link(&standard, &bucket_id);
            }
        }
        Ok(())
    }

    fn expand_3d(&mut self, standard: &str, depth: Depth) {
        for neighbor in self.connections(standard) {
            match self.place_standard(&neighbor) {
                Placement::Added if depth.value() >= 3 => {
                    for outer in self.connections(&neighbor) {
                        if self.place_standard(&outer).is_placed() {
                            self.link(&outer, &neighbor);
                        }
                    }
                }
                Placement::Skipped => continue,
                _ => {}
            }
            self.link(&neighbor, standard);
        }
    }

    /// Topics inside the remapped grade range with their PEs
    fn gradeband(&mut self, low: u8, high: u8, depth: Depth) -> Result<(), BuildError> {
        let (low, high) = remap_grade_bounds(low, high)?;
        if low > high {
            debug!("Remapped gradeband {low}-{high} is empty");
            return Ok(());
        }
        debug!("Gradeband filter over {low}-{high}");

        let topics: Vec<String> = self
            .store
            .standards()
            .filter(|standard| {
                standard.standard_type == StandardType::Topic
                    && standard.grades.is_within(low.value(), high.value())
            })
            .map(|standard| standard.id.clone())
            .collect();

        for topic in topics {
            if !self.place_standard(&topic).is_placed() {
                continue;
            }
            for pe in self.connections(&topic) {
                match self.place_standard(&pe) {
                    Placement::Added if depth.value() > 1 => {
                        for neighbor in self.connections(&pe) {
                            if self.place_standard(&neighbor).is_placed() {
                                self.link(&neighbor, &pe);
                            }
                        }
                    }
                    Placement::Skipped => continue,
                    _ => {}
                }
                self.link(&pe, &topic);
            }
        }
        Ok(())
    }
}
