//! Fruchterman-Reingold force-directed layout
//!
//! All node pairs repel with k²/d and edge endpoints attract with d²/k, where
//! k is the ideal edge length. Displacements are capped by a temperature that
//! cools every iteration. Initial placement is random from a fixed seed so a
//! given request always produces the same layout.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::engine::{adjacency, LayoutEngine};
use super::serialization::{LayoutPoint, LayoutRequest};
use crate::errors::LayoutError;

/// In-process Fruchterman-Reingold engine
#[derive(Debug, Clone)]
pub struct FruchtermanReingoldEngine {
    /// Ideal distance between connected nodes
    pub ideal_distance: f64,
    /// Cooling rate per iteration
    pub cooling_rate: f64,
    pub max_iterations: u32,
    pub seed: u64,
}

impl FruchtermanReingoldEngine {
    pub fn new(max_iterations: u32, seed: u64) -> Self {
        Self {
            ideal_distance: 1.0,
            cooling_rate: 0.95,
            max_iterations,
            seed,
        }
    }
}

impl Default for FruchtermanReingoldEngine {
    fn default() -> Self {
        Self::new(500, 42)
    }
}

impl LayoutEngine for FruchtermanReingoldEngine {
    fn name(&self) -> &str {
        "fruchterman_reingold"
    }

    fn evaluate(&mut self, request: &LayoutRequest) -> Result<Vec<LayoutPoint>, LayoutError> {
        let n = request.node_count;
        if n == 0 {
            return Ok(Vec::new());
        }
        let neighbors = adjacency(request)?;

        let k = self.ideal_distance;
        let k_squared = k * k;
        let half_side = (n as f64).sqrt() * k;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut positions: Vec<(f64, f64)> = (0..n)
            .map(|_| {
                (
                    rng.gen_range(-half_side..half_side),
                    rng.gen_range(-half_side..half_side),
                )
            })
            .collect();

        let mut temperature = half_side / 5.0;
        let mut iterations = 0;
        for _ in 0..self.max_iterations {
            let mut displacements = vec![(0.0_f64, 0.0_f64); n];

            // Repulsive forces
            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = positions[i].0 - positions[j].0;
                    let dy = positions[i].1 - positions[j].1;
                    let distance = dx.hypot(dy).max(0.01);
                    let force = k_squared / distance;
                    displacements[i].0 += dx / distance * force;
                    displacements[i].1 += dy / distance * force;
                }
            }

            // Attractive forces, each undirected edge once
            for (i, adjacent) in neighbors.iter().enumerate() {
                for &j in adjacent.iter().filter(|j| **j > i) {
                    let dx = positions[j].0 - positions[i].0;
                    let dy = positions[j].1 - positions[i].1;
                    let distance = dx.hypot(dy).max(0.01);
                    let force = distance * distance / k;
                    let (fx, fy) = (dx / distance * force, dy / distance * force);
                    displacements[i].0 += fx;
                    displacements[i].1 += fy;
                    displacements[j].0 -= fx;
                    displacements[j].1 -= fy;
                }
            }

            // Apply displacements with temperature
            for (position, (dx, dy)) in positions.iter_mut().zip(displacements) {
                let length = dx.hypot(dy);
                if length > 0.0 {
                    let capped = length.min(temperature);
                    position.0 = (position.0 + dx / length * capped).clamp(-half_side, half_side);
                    position.1 = (position.1 + dy / length * capped).clamp(-half_side, half_side);
                }
            }

            temperature *= self.cooling_rate;
            iterations += 1;
            if temperature < 1e-4 {
                break;
            }
        }
        debug!("Fruchterman-Reingold placed {n} nodes in {iterations} iterations");

        Ok(positions
            .into_iter()
            .map(|(x, y)| LayoutPoint::new(x, y))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: u32) -> LayoutRequest {
        LayoutRequest {
            node_count: n as usize,
            edges: (1..=n).map(|i| (i, i % n + 1)).collect(),
        }
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let first = FruchtermanReingoldEngine::new(200, 7).evaluate(&ring(8)).unwrap();
        let second = FruchtermanReingoldEngine::new(200, 7).evaluate(&ring(8)).unwrap();
        let other = FruchtermanReingoldEngine::new(200, 8).evaluate(&ring(8)).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn test_points_are_finite_and_separated() {
        let points = FruchtermanReingoldEngine::default().evaluate(&ring(10)).unwrap();
        assert_eq!(points.len(), 10);
        for (i, a) in points.iter().enumerate() {
            assert!(a.x.is_finite() && a.y.is_finite());
            for b in &points[i + 1..] {
                assert!((a.x - b.x).hypot(a.y - b.y) > 1e-3);
            }
        }
    }

    #[test]
    fn test_empty_request() {
        let request = LayoutRequest {
            node_count: 0,
            edges: vec![],
        };
        assert!(FruchtermanReingoldEngine::default().evaluate(&request).unwrap().is_empty());
    }
}
