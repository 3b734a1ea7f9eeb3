//! Layout configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Force-directed algorithm used to place nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    #[default]
    KamadaKawai,
    FruchtermanReingold,
}

/// Settings for one layout engine and the bridge that drives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub algorithm: LayoutAlgorithm,
    /// Multiplier applied to engine coordinates
    pub scale: f64,
    /// How long a caller waits for its layout, queueing included
    pub timeout_ms: u64,
    pub max_iterations: u32,
    /// Kamada-Kawai stops once the largest energy gradient falls below this
    pub epsilon: f64,
    /// Seed for Fruchterman-Reingold initial placement
    pub seed: u64,
}

impl LayoutConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parse a configuration from JSON, missing fields take defaults
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::default(),
            scale: 100.0,
            timeout_ms: 30_000,
            max_iterations: 1_000,
            epsilon: 1e-4,
            seed: 42,
        }
    }
}
