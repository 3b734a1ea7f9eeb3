//! Layout bridge
//!
//! The layout engine is not reentrant, so one worker thread owns it and
//! serves layout requests strictly one at a time from a bounded queue.
//! Callers wait for their reply with a deadline; a caller that gives up only
//! abandons its own wait, and the worker discards the late reply. Requests
//! still queued when their deadline passes are dropped unevaluated.

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::aggregate::WorkingGraph;
use crate::errors::LayoutError;
use crate::layout::{engine_for, map_points, LayoutConfig, LayoutEngine, LayoutMap, LayoutPoint, LayoutRequest};

pub mod graph_service;

pub use graph_service::{GraphService, RenderOutcome};

/// Queue and layout settings of a bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Layout requests that may wait behind the one being evaluated
    pub queue_capacity: usize,
    pub layout: LayoutConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 16,
            layout: LayoutConfig::default(),
        }
    }
}

type LayoutReply = Result<Vec<LayoutPoint>, LayoutError>;

/// Commands served by the layout worker
enum BridgeCommand {
    Layout {
        request: LayoutRequest,
        /// When the caller stops waiting
        deadline: Instant,
        reply: Sender<LayoutReply>,
    },
    Shutdown,
}

struct BridgeInner {
    command_tx: Sender<BridgeCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
    config: BridgeConfig,
}

impl Drop for BridgeInner {
    fn drop(&mut self) {
        // The worker exits on its own once every sender is gone
        let _ = self.command_tx.try_send(BridgeCommand::Shutdown);
    }
}

/// Serializes access to a single layout engine
#[derive(Clone)]
pub struct LayoutBridge {
    inner: Arc<BridgeInner>,
}

impl LayoutBridge {
    /// Start a worker owning the in-process engine the configuration selects
    pub fn from_config(config: BridgeConfig) -> Result<Self, LayoutError> {
        let engine = engine_for(&config.layout);
        Self::with_engine(engine, config)
    }

    /// Start a worker owning `engine`
    pub fn with_engine(engine: Box<dyn LayoutEngine>, config: BridgeConfig) -> Result<Self, LayoutError> {
        let (command_tx, command_rx) = bounded(config.queue_capacity.max(1));
        let name = engine.name().to_string();
        let worker = thread::Builder::new()
            .name("layout-worker".to_string())
            .spawn(move || run_worker(engine, command_rx))
            .map_err(|err| LayoutError::EngineInit(err.to_string()))?;
        info!("Layout bridge started with engine {name}");

        Ok(Self {
            inner: Arc::new(BridgeInner {
                command_tx,
                worker: Mutex::new(Some(worker)),
                config,
            }),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Compute coordinates for every node of a graph
    pub fn compute_layout(&self, graph: &WorkingGraph) -> Result<LayoutMap, LayoutError> {
        let request = LayoutRequest::from_graph(graph)?;
        if request.node_count == 0 {
            return Ok(LayoutMap::new());
        }

        let layout = &self.inner.config.layout;
        let started = Instant::now();
        let deadline = started + layout.timeout();
        let (reply_tx, reply_rx) = bounded(1);

        self.inner
            .command_tx
            .send_deadline(
                BridgeCommand::Layout {
                    request,
                    deadline,
                    reply: reply_tx,
                },
                deadline,
            )
            .map_err(|err| match err {
                SendTimeoutError::Timeout(_) => LayoutError::Timeout(layout.timeout_ms),
                SendTimeoutError::Disconnected(_) => LayoutError::WorkerUnavailable,
            })?;

        let points = reply_rx.recv_deadline(deadline).map_err(|err| match err {
            RecvTimeoutError::Timeout => LayoutError::Timeout(layout.timeout_ms),
            RecvTimeoutError::Disconnected => LayoutError::WorkerUnavailable,
        })??;

        let positions = map_points(graph, &points, layout.scale)?;
        debug!(
            "Layout of {} nodes took {:?}",
            positions.len(),
            started.elapsed()
        );
        Ok(positions)
    }

    /// Lay out a graph in place; on failure positions stay unset and the error is recorded
    pub fn apply_layout(&self, graph: &mut WorkingGraph) -> Result<(), LayoutError> {
        match self.compute_layout(graph) {
            Ok(positions) => {
                graph.apply_positions(&positions);
                graph.set_layout_error(None);
                info!(nodes = positions.len(), "Applied layout");
                Ok(())
            }
            Err(err) => {
                error!("Layout failed: {err}");
                graph.clear_positions();
                graph.set_layout_error(Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Stop the worker after the requests already queued
    pub fn shutdown(&self) {
        if self.inner.command_tx.send(BridgeCommand::Shutdown).is_err() {
            return;
        }
        if let Some(worker) = self.inner.worker.lock().take() {
            if worker.join().is_err() {
                error!("Layout worker terminated abnormally");
            }
        }
    }
}

fn run_worker(mut engine: Box<dyn LayoutEngine>, commands: Receiver<BridgeCommand>) {
    while let Ok(command) = commands.recv() {
        match command {
            BridgeCommand::Layout {
                request,
                deadline,
                reply,
            } => {
                if Instant::now() >= deadline {
                    warn!(
                        nodes = request.node_count,
                        "Dropped expired layout request without evaluating it"
                    );
                    continue;
                }
                let result = evaluate_guarded(engine.as_mut(), &request);
                if reply.send(result).is_err() {
                    debug!("Discarded layout reply, caller stopped waiting");
                }
            }
            BridgeCommand::Shutdown => break,
        }
    }
    debug!("Layout worker stopped");
}

/// Run one evaluation, tearing the engine down on every path
fn evaluate_guarded(engine: &mut dyn LayoutEngine, request: &LayoutRequest) -> LayoutReply {
    let initialized = panic::catch_unwind(AssertUnwindSafe(|| engine.initialize()))
        .unwrap_or_else(|payload| Err(LayoutError::EngineInit(panic_message(payload))));

    let result = match initialized {
        Ok(()) => panic::catch_unwind(AssertUnwindSafe(|| engine.evaluate(request)))
            .unwrap_or_else(|payload| Err(LayoutError::EngineFailure(panic_message(payload)))),
        Err(err) => Err(err),
    };

    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| engine.teardown())) {
        error!("Layout engine teardown panicked: {}", panic_message(payload));
    }
    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "engine panicked".to_string()
    }
}
