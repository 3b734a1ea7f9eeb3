//! Graph build commands
//!
//! Each command selects one construction mode and carries its parameters.
//! Commands are handled by the graph builder, which validates them against
//! the entity store before producing a working graph.

use serde::{Deserialize, Serialize};

use crate::errors::BuildError;
use crate::value_objects::{Depth, Dimension};

/// Commands that build a working graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BuildCommand {
    /// Breadth-first neighborhood around one standard
    StandardsNeighborhood {
        /// Standard Id, or an NGSS code
        root_id: String,
        /// Number of hops to expand
        #[serde(default)]
        depth: Depth,
    },

    /// Gradeband progression of one topic category
    TopicCategory {
        /// The Topic category to bundle
        category_id: String,
        /// Validated but the expansion is always two hops
        #[serde(default)]
        depth: Depth,
    },

    /// Grade bucket progression of one CC, DCI or SEP category
    Category3D {
        /// The dimension the category belongs to
        view: Dimension,
        /// The category to bundle
        category_id: String,
        /// Number of hops to expand from each category standard
        #[serde(default)]
        depth: Depth,
    },

    /// Topics within a grade range and their performance expectations
    Gradeband {
        /// Lowest grade, K = 0
        low_grade: u8,
        /// Highest grade
        high_grade: u8,
        /// 1 for topics and PEs only, more to add the PEs' connections
        #[serde(default)]
        depth: Depth,
    },
}

impl BuildCommand {
    /// Short mode name used in logs
    pub fn mode(&self) -> &'static str {
        match self {
            BuildCommand::StandardsNeighborhood { .. } => "standards_neighborhood",
            BuildCommand::TopicCategory { .. } => "topic_category",
            BuildCommand::Category3D { .. } => "category_3d",
            BuildCommand::Gradeband { .. } => "gradeband",
        }
    }

    pub fn depth(&self) -> Depth {
        match self {
            BuildCommand::StandardsNeighborhood { depth, .. }
            | BuildCommand::TopicCategory { depth, .. }
            | BuildCommand::Category3D { depth, .. }
            | BuildCommand::Gradeband { depth, .. } => *depth,
        }
    }
}

/// Validate a raw depth for a build command
pub fn parse_depth(value: u8) -> Result<Depth, BuildError> {
    Depth::new(value).map_err(BuildError::InvalidParameter)
}
