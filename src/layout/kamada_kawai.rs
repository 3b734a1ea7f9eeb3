//! Kamada-Kawai spring layout
//!
//! Every node pair is joined by a spring whose rest length is the graph
//! distance between the two nodes. Nodes are moved one at a time, always the
//! one with the largest energy gradient, with Newton-Raphson steps until the
//! gradient falls below epsilon. Pairs in different components are treated as
//! one hop further apart than the farthest connected pair.

use petgraph::algo::dijkstra;
use petgraph::graph::{NodeIndex, UnGraph};
use std::f64::consts::TAU;
use tracing::debug;

use super::engine::{adjacency, LayoutEngine};
use super::serialization::{LayoutPoint, LayoutRequest};
use crate::errors::LayoutError;

/// Newton steps spent on one node before picking the next
const MAX_NODE_STEPS: u32 = 50;

/// Deterministic in-process Kamada-Kawai engine
#[derive(Debug, Clone)]
pub struct KamadaKawaiEngine {
    max_iterations: u32,
    epsilon: f64,
}

impl KamadaKawaiEngine {
    pub fn new(max_iterations: u32, epsilon: f64) -> Self {
        Self {
            max_iterations,
            epsilon,
        }
    }
}

impl Default for KamadaKawaiEngine {
    fn default() -> Self {
        Self::new(1_000, 1e-4)
    }
}

impl LayoutEngine for KamadaKawaiEngine {
    fn name(&self) -> &str {
        "kamada_kawai"
    }

    fn evaluate(&mut self, request: &LayoutRequest) -> Result<Vec<LayoutPoint>, LayoutError> {
        let n = request.node_count;
        if n == 0 {
            return Ok(Vec::new());
        }
        if n == 1 {
            return Ok(vec![LayoutPoint::new(0.0, 0.0)]);
        }

        let distances = graph_distances(n, &adjacency(request)?);
        let farthest = distances
            .iter()
            .flatten()
            .copied()
            .fold(1.0_f64, f64::max);

        // Start on a circle wide enough for the longest shortest path
        let radius = (farthest / 2.0).max(1.0);
        let mut positions: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = TAU * i as f64 / n as f64;
                (radius * angle.cos(), radius * angle.sin())
            })
            .collect();

        let mut iterations = 0;
        while iterations < self.max_iterations {
            let (node, delta) = (0..n)
                .map(|m| {
                    let g = gradient(m, &positions, &distances);
                    (m, g.ex.hypot(g.ey))
                })
                .fold((0, f64::MIN), |best, candidate| {
                    if candidate.1 > best.1 {
                        candidate
                    } else {
                        best
                    }
                });
            if delta < self.epsilon {
                break;
            }

            for _ in 0..MAX_NODE_STEPS {
                let g = gradient(node, &positions, &distances);
                if g.ex.hypot(g.ey) < self.epsilon {
                    break;
                }
                let det = g.exx * g.eyy - g.exy * g.exy;
                if det.abs() < 1e-12 {
                    break;
                }
                let dx = (g.exy * g.ey - g.eyy * g.ex) / det;
                let dy = (g.exy * g.ex - g.exx * g.ey) / det;
                positions[node].0 += dx;
                positions[node].1 += dy;
            }
            iterations += 1;
        }
        debug!("Kamada-Kawai settled {n} nodes after {iterations} iterations");

        Ok(positions
            .into_iter()
            .map(|(x, y)| LayoutPoint::new(x, y))
            .collect())
    }
}

/// All-pairs hop distances, disconnected pairs set past the farthest one
fn graph_distances(n: usize, neighbors: &[Vec<usize>]) -> Vec<Vec<f64>> {
    let mut graph = UnGraph::<(), ()>::with_capacity(n, 0);
    for _ in 0..n {
        graph.add_node(());
    }
    for (a, adjacent) in neighbors.iter().enumerate() {
        for &b in adjacent.iter().filter(|b| **b > a) {
            graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
    }

    let mut distances = vec![vec![f64::INFINITY; n]; n];
    for (source, row) in distances.iter_mut().enumerate() {
        for (target, hops) in dijkstra(&graph, NodeIndex::new(source), None, |_| 1_u32) {
            row[target.index()] = f64::from(hops);
        }
    }

    let farthest = distances
        .iter()
        .flatten()
        .copied()
        .filter(|d| d.is_finite())
        .fold(1.0_f64, f64::max);
    for d in distances.iter_mut().flatten() {
        if !d.is_finite() {
            *d = farthest + 1.0;
        }
    }
    distances
}

struct Gradient {
    ex: f64,
    ey: f64,
    exx: f64,
    eyy: f64,
    exy: f64,
}

fn gradient(m: usize, positions: &[(f64, f64)], distances: &[Vec<f64>]) -> Gradient {
    let (xm, ym) = positions[m];
    let mut g = Gradient {
        ex: 0.0,
        ey: 0.0,
        exx: 0.0,
        eyy: 0.0,
        exy: 0.0,
    };
    for (i, &(xi, yi)) in positions.iter().enumerate() {
        if i == m {
            continue;
        }
        let length = distances[m][i];
        let strength = 1.0 / (length * length);
        let dx = xm - xi;
        let dy = ym - yi;
        let d = dx.hypot(dy).max(1e-9);
        let d3 = d * d * d;

        g.ex += strength * (dx - length * dx / d);
        g.ey += strength * (dy - length * dy / d);
        g.exx += strength * (1.0 - length * dy * dy / d3);
        g.eyy += strength * (1.0 - length * dx * dx / d3);
        g.exy += strength * length * dx * dy / d3;
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(points: &[LayoutPoint], a: usize, b: usize) -> f64 {
        (points[a].x - points[b].x).hypot(points[a].y - points[b].y)
    }

    #[test]
    fn test_path_straightens_to_unit_springs() {
        let request = LayoutRequest {
            node_count: 3,
            edges: vec![(1, 2), (2, 3)],
        };
        let points = KamadaKawaiEngine::default().evaluate(&request).unwrap();

        assert_eq!(points.len(), 3);
        assert!((distance(&points, 0, 1) - 1.0).abs() < 0.05);
        assert!((distance(&points, 1, 2) - 1.0).abs() < 0.05);
        assert!(distance(&points, 0, 2) > 1.9);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let request = LayoutRequest {
            node_count: 6,
            edges: vec![(1, 2), (2, 3), (3, 1), (3, 4), (4, 5), (5, 6)],
        };
        let first = KamadaKawaiEngine::default().evaluate(&request).unwrap();
        let second = KamadaKawaiEngine::default().evaluate(&request).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|p| p.r_id.is_none()));
    }

    #[test]
    fn test_trivial_and_disconnected_graphs() {
        let mut engine = KamadaKawaiEngine::default();
        let empty = LayoutRequest {
            node_count: 0,
            edges: vec![],
        };
        assert!(engine.evaluate(&empty).unwrap().is_empty());

        let single = LayoutRequest {
            node_count: 1,
            edges: vec![],
        };
        assert_eq!(engine.evaluate(&single).unwrap(), vec![LayoutPoint::new(0.0, 0.0)]);

        let split = LayoutRequest {
            node_count: 4,
            edges: vec![(1, 2), (3, 4)],
        };
        let points = engine.evaluate(&split).unwrap();
        assert!(points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
        assert!(distance(&points, 0, 2) > 0.5);
    }

    #[test]
    fn test_graph_distances() {
        let distances = graph_distances(4, &[vec![1], vec![0, 2], vec![1], vec![]]);
        assert_eq!(distances[0][2], 2.0);
        assert_eq!(distances[0][0], 0.0);
        // disconnected: farthest finite (2) plus one
        assert_eq!(distances[0][3], 3.0);
    }
}
