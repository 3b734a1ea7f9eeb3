//! Resource overlay
//!
//! Adds resource nodes for selected providers to a finished working graph
//! and counts, for every provider, how many of its resources align to a
//! standard in the graph whether or not the provider is selected.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::{DisplayedResource, GraphNode, NodeDetail, WorkingGraph};
use crate::errors::GraphConstructionError;
use crate::infrastructure::{EntityStore, Provider, Resource};
use crate::value_objects::{NodeKind, BLANK_RESOURCE_LABEL};

/// Result of one overlay pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayReport {
    /// Displayable resources per provider, in provider load order
    pub counts: IndexMap<String, usize>,
    pub resources_added: usize,
    pub edges_added: usize,
}

/// Attach resources of selected providers and compute displayable counts
pub fn attach_resources(graph: &mut WorkingGraph, store: &EntityStore) -> OverlayReport {
    let mut report = OverlayReport::default();

    for provider in store.providers() {
        let mut displayable: IndexSet<&str> = IndexSet::new();

        for resource in &provider.resources {
            for alignment in &resource.alignments {
                let aligned = graph
                    .node(alignment)
                    .is_some_and(|node| node.kind.is_standard());
                if !aligned {
                    continue;
                }
                displayable.insert(&resource.id);

                if provider.is_selected {
                    attach_one(graph, provider, resource, alignment, &mut report);
                }
            }
        }

        debug!(
            "Provider {} has {} displayable resources",
            provider.id,
            displayable.len()
        );
        report.counts.insert(provider.id.clone(), displayable.len());
    }

    graph.set_resource_counts(report.counts.clone());
    info!(
        resources = report.resources_added,
        edges = report.edges_added,
        "Attached provider resources"
    );
    report
}

fn attach_one(
    graph: &mut WorkingGraph,
    provider: &Provider,
    resource: &Resource,
    standard_id: &str,
    report: &mut OverlayReport,
) {
    match graph.node(&resource.id) {
        Some(node) if node.kind != NodeKind::Resource => {
            let kind = node.kind.to_string();
            graph.record_warning(GraphConstructionError::ResourceIdCollision {
                resource: resource.id.clone(),
                kind,
            });
            return;
        }
        Some(_) => {}
        None => {
            let node = GraphNode::new(
                resource.id.clone(),
                NodeKind::Resource,
                BLANK_RESOURCE_LABEL,
                NodeDetail::Resource {
                    title: resource.title.clone(),
                    summary: resource.summary.clone(),
                    url: resource.url.clone(),
                    resource_type: resource.resource_type.clone(),
                    provider_id: provider.id.clone(),
                },
            )
            .with_provider_style(provider.style.as_ref());
            if graph.add_node(node) {
                report.resources_added += 1;
            }
        }
    }

    match graph.add_edge(&resource.id, standard_id) {
        Ok(true) => report.edges_added += 1,
        Ok(false) => {}
        Err(err) => {
            graph.record_warning(err);
            return;
        }
    }
    graph.add_displayed_resource(
        standard_id,
        DisplayedResource {
            resource_id: resource.id.clone(),
            provider_id: provider.id.clone(),
        },
    );
}
