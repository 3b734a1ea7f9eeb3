//! Graph service
//!
//! Caller-facing pipeline over one entity store: build, overlay resources,
//! lay out, then publish. Every render takes a generation ticket; a render
//! whose ticket is no longer the latest when it completes is discarded and
//! leaves the store's provider counts untouched.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::LayoutBridge;
use crate::aggregate::WorkingGraph;
use crate::commands::BuildCommand;
use crate::errors::{BuildError, RecordSourceError, RenderError};
use crate::handlers::{attach_resources, GraphBuilder};
use crate::infrastructure::{EntityStore, LoadReport, RecordSource};
use crate::value_objects::LabelMode;

/// Result of a render that did not fail
#[derive(Debug, Clone)]
pub enum RenderOutcome {
    /// The graph is now the visible one
    Published(Arc<WorkingGraph>),
    /// A newer render started before this one completed
    Superseded { generation: u64 },
}

impl RenderOutcome {
    pub fn graph(&self) -> Option<&Arc<WorkingGraph>> {
        match self {
            RenderOutcome::Published(graph) => Some(graph),
            RenderOutcome::Superseded { .. } => None,
        }
    }
}

/// Builds, lays out and publishes standards graphs
pub struct GraphService {
    store: RwLock<EntityStore>,
    bridge: LayoutBridge,
    generation: AtomicU64,
    visible: Mutex<Option<Arc<WorkingGraph>>>,
}

impl GraphService {
    pub fn new(store: EntityStore, bridge: LayoutBridge) -> Self {
        Self {
            store: RwLock::new(store),
            bridge,
            generation: AtomicU64::new(0),
            visible: Mutex::new(None),
        }
    }

    /// Load a store from a record source and wrap it in a service
    pub async fn load(
        source: &dyn RecordSource,
        bridge: LayoutBridge,
    ) -> Result<(Self, LoadReport), RecordSourceError> {
        let batch = source.fetch().await?;
        let (store, report) = EntityStore::from_batch(batch);
        Ok((Self::new(store, bridge), report))
    }

    /// Read access to the entity store
    pub fn with_store<R>(&self, f: impl FnOnce(&EntityStore) -> R) -> R {
        f(&self.store.read())
    }

    /// Resolve a search string to a standard Id
    pub fn search(&self, query: &str) -> Option<String> {
        self.store
            .read()
            .resolve_standard(query)
            .map(|standard| standard.id.clone())
    }

    pub fn set_provider_selected(&self, provider_id: &str, selected: bool) -> bool {
        self.store.write().set_provider_selected(provider_id, selected)
    }

    pub fn select_all_providers(&self, selected: bool) {
        self.store.write().select_all_providers(selected);
    }

    /// The last published graph
    pub fn current(&self) -> Option<Arc<WorkingGraph>> {
        self.visible.lock().clone()
    }

    /// Re-label the visible graph without rebuilding or re-laying it out
    pub fn relabel_current(&self, mode: LabelMode) -> Option<Arc<WorkingGraph>> {
        let mut visible = self.visible.lock();
        let mut graph = WorkingGraph::clone(visible.as_ref()?);
        graph.relabel(mode);
        let graph = Arc::new(graph);
        *visible = Some(graph.clone());
        Some(graph)
    }

    /// Build, overlay, lay out and publish one graph.
    ///
    /// A layout failure does not fail the render: the graph is published
    /// without coordinates and carries the error.
    pub fn render(&self, command: &BuildCommand, labels: LabelMode) -> Result<RenderOutcome, BuildError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Render {ticket} started: {}", command.mode());

        let mut graph = {
            let store = self.store.read();
            let mut graph = GraphBuilder::new(&store).with_labels(labels).build(command)?;
            attach_resources(&mut graph, &store);
            graph
        };
        // Recorded on the graph
        let _ = self.bridge.apply_layout(&mut graph);

        let mut visible = self.visible.lock();
        if self.generation.load(Ordering::SeqCst) != ticket {
            info!("Render {ticket} superseded");
            return Ok(RenderOutcome::Superseded { generation: ticket });
        }
        self.store.write().apply_displayed_counts(graph.resource_counts());
        let graph = Arc::new(graph);
        *visible = Some(graph.clone());
        info!(
            generation = ticket,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Published graph"
        );
        Ok(RenderOutcome::Published(graph))
    }

    /// [`GraphService::render`] with the blocking layout wait off the async runtime
    pub async fn render_async(
        self: Arc<Self>,
        command: BuildCommand,
        labels: LabelMode,
    ) -> Result<RenderOutcome, RenderError> {
        tokio::task::spawn_blocking(move || self.render(&command, labels))
            .await
            .map_err(|err| RenderError::Task(err.to_string()))?
            .map_err(RenderError::from)
    }

    pub fn bridge(&self) -> &LayoutBridge {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeConfig;
    use crate::errors::LayoutError;
    use crate::infrastructure::fixtures::{sample_categories, sample_providers, sample_standards, sample_store};
    use crate::infrastructure::{InMemoryRecordSource, RecordBatch};
    use crate::layout::{LayoutEngine, LayoutPoint, LayoutRequest};
    use crate::value_objects::Depth;
    use std::thread;
    use std::time::Duration;

    /// Test Coverage
    ///
    /// ```mermaid
    /// graph TD
    ///     GS[GraphService] --> R[Render pipeline]
    ///     GS --> S[Superseded renders]
    ///     GS --> L[Layout failures]
    ///     GS --> A[Async render]
    /// ```

    struct SlowEngine {
        delay: Duration,
        fail: bool,
    }

    impl LayoutEngine for SlowEngine {
        fn name(&self) -> &str {
            "slow"
        }

        fn evaluate(&mut self, request: &LayoutRequest) -> Result<Vec<LayoutPoint>, LayoutError> {
            thread::sleep(self.delay);
            if self.fail {
                return Err(LayoutError::EngineFailure("no session".to_string()));
            }
            Ok((0..request.node_count)
                .map(|i| LayoutPoint::new(i as f64, 0.0))
                .collect())
        }
    }

    fn service(delay_ms: u64, fail: bool) -> GraphService {
        let (store, _) = sample_store();
        let engine = SlowEngine {
            delay: Duration::from_millis(delay_ms),
            fail,
        };
        let bridge = LayoutBridge::with_engine(Box::new(engine), BridgeConfig::default()).unwrap();
        GraphService::new(store, bridge)
    }

    fn neighborhood(root: &str, depth: u8) -> BuildCommand {
        BuildCommand::StandardsNeighborhood {
            root_id: root.to_string(),
            depth: Depth::new(depth).unwrap(),
        }
    }

    #[test]
    fn test_render_publishes_positioned_graph() {
        let service = service(0, false);
        service.set_provider_selected("prov-b", true);

        let outcome = service.render(&neighborhood("P1", 1), LabelMode::Ngss).unwrap();
        let graph = outcome.graph().unwrap();
        assert!(graph.is_positioned());
        assert!(graph.contains_node("R3"));
        assert_eq!(graph.node("R3").unwrap().position.map(|p| p.x), Some(400.0));

        let current = service.current().unwrap();
        assert!(Arc::ptr_eq(&current, graph));
        assert_eq!(
            service.with_store(|store| store.provider("prov-a").unwrap().displayed_resource_count),
            1
        );
    }

    #[test]
    fn test_build_errors_are_fatal() {
        let service = service(0, false);
        let result = service.render(&neighborhood("nope", 1), LabelMode::Ngss);
        assert_eq!(result.unwrap_err(), BuildError::StandardNotFound("nope".to_string()));
        assert!(service.current().is_none());
    }

    #[test]
    fn test_layout_failure_leaves_graph_unpositioned() {
        let service = service(0, true);
        let outcome = service.render(&neighborhood("T1", 1), LabelMode::Asn).unwrap();
        let graph = outcome.graph().unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph.nodes().all(|node| node.position.is_none()));
        assert_eq!(
            graph.layout_error(),
            Some(&LayoutError::EngineFailure("no session".to_string()))
        );
    }

    #[test]
    fn test_stale_render_is_superseded() {
        let service = Arc::new(service(300, false));

        let first = {
            let service = service.clone();
            thread::spawn(move || service.render(&neighborhood("P1", 1), LabelMode::Ngss))
        };
        thread::sleep(Duration::from_millis(50));
        let second = {
            let service = service.clone();
            thread::spawn(move || service.render(&neighborhood("T2", 2), LabelMode::Ngss))
        };

        let first = first.join().unwrap().unwrap();
        assert!(matches!(first, RenderOutcome::Superseded { generation: 1 }));
        // The stale render did not write its counts
        assert_eq!(
            service.with_store(|store| store.provider("prov-b").unwrap().displayed_resource_count),
            0
        );

        let second = second.join().unwrap().unwrap();
        let graph = second.graph().unwrap();
        assert!(graph.contains_node("T2"));
        assert!(Arc::ptr_eq(&service.current().unwrap(), graph));
        assert_eq!(
            service.with_store(|store| store.provider("prov-a").unwrap().displayed_resource_count),
            1
        );
    }

    #[test]
    fn test_relabel_current() {
        let service = service(0, false);
        assert!(service.relabel_current(LabelMode::Asn).is_none());

        service.render(&neighborhood("P1", 1), LabelMode::Ngss).unwrap();
        let relabeled = service.relabel_current(LabelMode::Asn).unwrap();
        assert_eq!(relabeled.node("P1").unwrap().label, "P1");
        assert!(relabeled.is_positioned());
        assert_eq!(service.search("ms-ps3-1").as_deref(), Some("P1"));
    }

    #[tokio::test]
    async fn test_render_async_from_record_source() {
        let source = InMemoryRecordSource::new(RecordBatch {
            standards: sample_standards(),
            categories: sample_categories(),
            providers: sample_providers(),
        });
        let bridge = LayoutBridge::from_config(BridgeConfig::default()).unwrap();
        let (service, report) = GraphService::load(&source, bridge).await.unwrap();
        assert!(report.is_clean());

        let service = Arc::new(service);
        let outcome = service
            .clone()
            .render_async(
                BuildCommand::TopicCategory {
                    category_id: "Topic_Energy".to_string(),
                    depth: Depth::default(),
                },
                LabelMode::Ngss,
            )
            .await
            .unwrap();
        assert!(outcome.graph().unwrap().is_positioned());
        service.bridge().shutdown();
    }
}
