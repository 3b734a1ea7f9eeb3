//! Standards table projection
//!
//! One row per standard node of a finished graph, in render order.

use serde::Serialize;

use crate::aggregate::{GraphNode, NodeDetail, WorkingGraph};
use crate::value_objects::{NodeKind, StandardType};

/// Characters of a description shown before it is folded
pub const DESCRIPTION_PREVIEW_LENGTH: usize = 120;

const ASN_RESOURCE_URL: &str = "http://asn.jesandco.org/resources/";
const NO_NGSS_CODE: &str = "No NGSS code";

/// A row of the standards table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandardsRow {
    pub id: String,
    pub asn_url: String,
    /// NGSS code, or a notice for crosscutting concepts and practices
    pub ngss_code: String,
    /// NGSS page, absent for crosscutting concepts and practices
    pub ngss_url: Option<String>,
    /// Gradeband in parentheses, e.g. "(6-8)"
    pub gradeband: String,
    pub description: String,
    /// Folded tail of a long description
    pub description_more: Option<String>,
    pub color: Option<&'static str>,
}

/// Render-ordered standards of one graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StandardsTable {
    pub rows: Vec<StandardsRow>,
}

impl StandardsTable {
    pub fn from_graph(graph: &WorkingGraph) -> Self {
        let rows = graph
            .sorted_by_render_order()
            .into_iter()
            .filter_map(row)
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn row(node: &GraphNode) -> Option<StandardsRow> {
    let NodeDetail::Standard {
        ngss_code,
        description,
        url,
        grades,
        ..
    } = &node.detail
    else {
        return None;
    };

    let codeless = matches!(
        node.kind,
        NodeKind::Standard(StandardType::Cc | StandardType::Sep)
    );
    let (ngss_code, ngss_url) = if codeless {
        (NO_NGSS_CODE.to_string(), None)
    } else {
        (ngss_code.clone().unwrap_or_default(), Some(url.clone()))
    };
    let (description, description_more) = split_description(description);

    Some(StandardsRow {
        id: node.id.clone(),
        asn_url: format!("{ASN_RESOURCE_URL}{}", node.id),
        ngss_code,
        ngss_url,
        gradeband: format!("({})", grades.label()),
        description,
        description_more,
        color: node.style.color,
    })
}

/// Split a description after the preview length, on a character boundary
pub fn split_description(description: &str) -> (String, Option<String>) {
    match description.char_indices().nth(DESCRIPTION_PREVIEW_LENGTH) {
        Some((split, _)) => (
            description[..split].to_string(),
            Some(description[split..].to_string()),
        ),
        None => (description.to_string(), None),
    }
}
