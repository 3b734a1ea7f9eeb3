//! Graph layout
//!
//! The wire format a working graph is serialized to, the engine trait the
//! layout bridge drives, and two in-process force-directed engines.

pub mod config;
pub mod engine;
pub mod fruchterman_reingold;
pub mod kamada_kawai;
pub mod serialization;

pub use config::{LayoutAlgorithm, LayoutConfig};
pub use engine::{engine_for, LayoutEngine};
pub use fruchterman_reingold::FruchtermanReingoldEngine;
pub use kamada_kawai::KamadaKawaiEngine;
pub use serialization::{map_points, LayoutMap, LayoutPoint, LayoutRequest};
