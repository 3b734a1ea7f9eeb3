//! Layout engine seam

use super::config::{LayoutAlgorithm, LayoutConfig};
use super::fruchterman_reingold::FruchtermanReingoldEngine;
use super::kamada_kawai::KamadaKawaiEngine;
use super::serialization::{LayoutPoint, LayoutRequest};
use crate::errors::LayoutError;

/// A force-directed layout service.
///
/// Engines are not reentrant. The layout bridge owns exactly one engine on
/// its worker thread and drives every request through `initialize`,
/// `evaluate` and `teardown`, calling `teardown` even when the first two fail.
pub trait LayoutEngine: Send {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Prepare the engine for one evaluation
    fn initialize(&mut self) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Compute one point per node, in rId order unless the points are tagged
    fn evaluate(&mut self, request: &LayoutRequest) -> Result<Vec<LayoutPoint>, LayoutError>;

    /// Release per-evaluation state
    fn teardown(&mut self) {}
}

/// Build the in-process engine a configuration selects
pub fn engine_for(config: &LayoutConfig) -> Box<dyn LayoutEngine> {
    match config.algorithm {
        LayoutAlgorithm::KamadaKawai => Box::new(KamadaKawaiEngine::new(config.max_iterations, config.epsilon)),
        LayoutAlgorithm::FruchtermanReingold => {
            Box::new(FruchtermanReingoldEngine::new(config.max_iterations, config.seed))
        }
    }
}

/// Adjacency lists over zero-based node indices, rejecting pairs outside the rId space
pub(crate) fn adjacency(request: &LayoutRequest) -> Result<Vec<Vec<usize>>, LayoutError> {
    let mut neighbors = vec![Vec::new(); request.node_count];
    for &(source, target) in &request.edges {
        let index = |r_id: u32| {
            (r_id as usize)
                .checked_sub(1)
                .filter(|i| *i < request.node_count)
                .ok_or_else(|| LayoutError::EngineFailure(format!("edge references unknown rId {r_id}")))
        };
        let (a, b) = (index(source)?, index(target)?);
        if a != b {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
    }
    Ok(neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_selection() {
        let kk = engine_for(&LayoutConfig::default());
        assert_eq!(kk.name(), "kamada_kawai");

        let config = LayoutConfig {
            algorithm: LayoutAlgorithm::FruchtermanReingold,
            ..LayoutConfig::default()
        };
        assert_eq!(engine_for(&config).name(), "fruchterman_reingold");
    }

    #[test]
    fn test_adjacency_rejects_unknown_rids() {
        let request = LayoutRequest {
            node_count: 2,
            edges: vec![(1, 3)],
        };
        assert!(matches!(adjacency(&request), Err(LayoutError::EngineFailure(_))));

        let request = LayoutRequest {
            node_count: 3,
            edges: vec![(1, 2), (2, 3), (2, 2)],
        };
        assert_eq!(adjacency(&request).unwrap(), vec![vec![1], vec![0, 2], vec![1]]);
    }
}
