//! Entity store
//!
//! Indexes one data load of standards, categories and providers into the
//! lookup maps every graph build reads from. Malformed records and dangling
//! references are skipped and reported in the [`LoadReport`].

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::records::{CategoryRecord, ProviderRecord, RecordBatch, StandardRecord};
use crate::errors::{DataLoadError, LoadWarning, ProviderStyleExhaustionError};
use crate::value_objects::{
    CategoryKind, Dimension, Grade, GradeBucket, GradeRange, ProviderStyle, StandardType,
};

/// An indexed standard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standard {
    pub id: String,
    pub ngss_code: Option<String>,
    pub description: String,
    pub url: String,
    pub grades: GradeRange,
    pub standard_type: StandardType,
    /// Symmetrized connection set, declared order first
    pub connections: IndexSet<String>,
}

/// An indexed category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: String,
    pub kind: CategoryKind,
    pub description: String,
    pub is_ngss: bool,
    pub standards: Vec<String>,
}

/// A provider's resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub url: String,
    pub resource_type: Option<String>,
    pub alignments: IndexSet<String>,
}

/// A resource provider with its runtime selection state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub resources: Vec<Resource>,
    /// None when the palette ran out before this provider
    pub style: Option<ProviderStyle>,
    pub is_selected: bool,
    pub displayed_resource_count: usize,
}

/// Warnings collected while loading
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn push(&mut self, warning: impl Into<LoadWarning>) {
        let warning = warning.into();
        warn!("{warning}");
        self.warnings.push(warning);
    }
}

/// Lookup maps over one data load
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    standards: IndexMap<String, Standard>,
    categories: HashMap<CategoryKind, IndexMap<String, Category>>,
    providers: IndexMap<String, Provider>,
}

impl EntityStore {
    /// Index a record batch
    pub fn from_batch(batch: RecordBatch) -> (Self, LoadReport) {
        Self::load(batch.standards, batch.categories, batch.providers)
    }

    /// Index the three raw collections
    pub fn load(
        standards: Vec<StandardRecord>,
        categories: Vec<CategoryRecord>,
        providers: Vec<ProviderRecord>,
    ) -> (Self, LoadReport) {
        let mut report = LoadReport::default();
        let mut store = Self::default();

        store.load_standards(standards, &mut report);
        store.load_categories(categories, &mut report);
        store.load_providers(providers, &mut report);

        info!(
            standards = store.standards.len(),
            categories = store.categories.values().map(IndexMap::len).sum::<usize>(),
            providers = store.providers.len(),
            warnings = report.warning_count(),
            "Entity store loaded"
        );
        (store, report)
    }

    fn load_standards(&mut self, records: Vec<StandardRecord>, report: &mut LoadReport) {
        for record in records {
            if record.id.trim().is_empty() {
                report.push(DataLoadError::MissingId { collection: "standard" });
                continue;
            }
            if self.standards.contains_key(&record.id) {
                report.push(DataLoadError::DuplicateRecord {
                    collection: "standard",
                    id: record.id,
                });
                continue;
            }
            let grades = match parse_grades(&record) {
                Ok(grades) => grades,
                Err(reason) => {
                    report.push(DataLoadError::InvalidGrade { id: record.id, reason });
                    continue;
                }
            };
            let ngss_code = record
                .ngss_code
                .filter(|code| !code.trim().is_empty() && code != "NULL");
            let connections = record
                .connections
                .into_iter()
                .filter(|other| *other != record.id)
                .collect();

            self.standards.insert(
                record.id.clone(),
                Standard {
                    id: record.id,
                    ngss_code,
                    description: record.description,
                    url: record.url,
                    grades,
                    standard_type: StandardType::from(record.standard_type.as_str()),
                    connections,
                },
            );
        }

        // Drop references to standards that were never loaded
        let known: IndexSet<String> = self.standards.keys().cloned().collect();
        for standard in self.standards.values_mut() {
            let from = standard.id.clone();
            standard.connections.retain(|to| {
                let keep = known.contains(to);
                if !keep {
                    report.push(DataLoadError::UnknownConnection {
                        from: from.clone(),
                        to: to.clone(),
                    });
                }
                keep
            });
        }

        // Connections are declared one way but mean both ways
        let mut reverse = Vec::new();
        for standard in self.standards.values() {
            for other in &standard.connections {
                reverse.push((other.clone(), standard.id.clone()));
            }
        }
        for (owner, neighbor) in reverse {
            if let Some(standard) = self.standards.get_mut(&owner) {
                if standard.connections.insert(neighbor.clone()) {
                    debug!("Symmetrized connection {owner} <- {neighbor}");
                }
            }
        }
    }

    fn load_categories(&mut self, records: Vec<CategoryRecord>, report: &mut LoadReport) {
        for record in records {
            if record.id.trim().is_empty() {
                report.push(DataLoadError::MissingId { collection: "category" });
                continue;
            }
            let Ok(kind) = record.category_type.parse::<CategoryKind>() else {
                report.push(DataLoadError::UnknownCategoryType {
                    id: record.id,
                    kind: record.category_type,
                });
                continue;
            };
            let bucket = self.categories.entry(kind).or_default();
            if bucket.contains_key(&record.id) {
                report.push(DataLoadError::DuplicateRecord {
                    collection: "category",
                    id: record.id,
                });
                continue;
            }

            let mut members = IndexSet::new();
            for standard in record.standards {
                if self.standards.contains_key(&standard) {
                    members.insert(standard);
                } else {
                    report.push(DataLoadError::UnknownCategoryMember {
                        category: record.id.clone(),
                        standard,
                    });
                }
            }

            bucket.insert(
                record.id.clone(),
                Category {
                    id: record.id,
                    kind,
                    description: record.description,
                    is_ngss: record.is_ngss.map(|flag| flag.as_flag()).unwrap_or(false),
                    standards: members.into_iter().collect(),
                },
            );
        }
    }

    fn load_providers(&mut self, records: Vec<ProviderRecord>, report: &mut LoadReport) {
        for record in records {
            if record.id.trim().is_empty() {
                report.push(DataLoadError::MissingId { collection: "provider" });
                continue;
            }
            if self.providers.contains_key(&record.id) {
                report.push(DataLoadError::DuplicateRecord {
                    collection: "provider",
                    id: record.id,
                });
                continue;
            }

            let mut resources = Vec::with_capacity(record.resources.len());
            for resource in record.resources {
                if resource.id.trim().is_empty() {
                    report.push(DataLoadError::MissingId { collection: "resource" });
                    continue;
                }
                resources.push(Resource {
                    id: resource.id,
                    title: resource.title,
                    summary: resource.summary,
                    url: resource.url,
                    resource_type: resource.resource_type,
                    alignments: resource.alignments.into_iter().collect(),
                });
            }

            // Palette outer, shapes inner, in provider load order
            let style = ProviderStyle::nth(self.providers.len());
            if style.is_none() {
                report.push(ProviderStyleExhaustionError {
                    provider: record.id.clone(),
                    capacity: ProviderStyle::CAPACITY,
                });
            }

            self.providers.insert(
                record.id.clone(),
                Provider {
                    id: record.id,
                    name: record.name,
                    resources,
                    style,
                    is_selected: false,
                    displayed_resource_count: 0,
                },
            );
        }
    }

    pub fn standard(&self, id: &str) -> Option<&Standard> {
        self.standards.get(id)
    }

    /// All standards in load order
    pub fn standards(&self) -> impl Iterator<Item = &Standard> {
        self.standards.values()
    }

    pub fn standard_count(&self) -> usize {
        self.standards.len()
    }

    /// Resolve a search string: exact Id first, then NGSS code ignoring case
    pub fn resolve_standard(&self, query: &str) -> Option<&Standard> {
        let query = query.trim();
        if let Some(standard) = self.standards.get(query) {
            return Some(standard);
        }
        self.standards.values().find(|standard| {
            standard
                .ngss_code
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(query))
        })
    }

    pub fn category(&self, kind: CategoryKind, id: &str) -> Option<&Category> {
        self.categories.get(&kind).and_then(|bucket| bucket.get(id))
    }

    /// Categories of one kind in load order
    pub fn categories(&self, kind: CategoryKind) -> impl Iterator<Item = &Category> {
        self.categories
            .get(&kind)
            .into_iter()
            .flat_map(|bucket| bucket.values())
    }

    /// Topic members of a category grouped by their own "Low-High" gradeband
    pub fn topic_gradeband_bundle(&self, category_id: &str) -> Option<IndexMap<String, Vec<String>>> {
        let category = self.category(CategoryKind::Topic, category_id)?;
        let mut bundle: IndexMap<String, Vec<String>> = IndexMap::new();
        for id in &category.standards {
            if let Some(standard) = self.standards.get(id) {
                bundle
                    .entry(standard.grades.label())
                    .or_default()
                    .push(id.clone());
            }
        }
        Some(bundle)
    }

    /// Member standards of a CC, DCI or SEP category
    pub fn category_bundle(&self, view: Dimension, category_id: &str) -> Option<&[String]> {
        self.category(CategoryKind::Dimension(view), category_id)
            .map(|category| category.standards.as_slice())
    }

    /// Inclusive overlap between `[low, high]` and a grade bucket
    pub fn is_in_grade_range(&self, high: Grade, low: Grade, bucket: GradeBucket) -> bool {
        bucket.overlaps(high.value(), low.value())
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// Providers in load order
    pub fn providers(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Mark a provider selected or not; false when the provider is unknown
    pub fn set_provider_selected(&mut self, id: &str, selected: bool) -> bool {
        match self.providers.get_mut(id) {
            Some(provider) => {
                provider.is_selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn select_all_providers(&mut self, selected: bool) {
        for provider in self.providers.values_mut() {
            provider.is_selected = selected;
        }
    }

    /// Store the per-provider displayable counts computed by the last overlay
    pub fn apply_displayed_counts(&mut self, counts: &IndexMap<String, usize>) {
        for provider in self.providers.values_mut() {
            provider.displayed_resource_count = counts.get(&provider.id).copied().unwrap_or(0);
        }
    }
}

fn parse_grades(record: &StandardRecord) -> Result<GradeRange, String> {
    let low = Grade::parse(&record.low_grade.as_text())?;
    let high = Grade::parse(&record.high_grade.as_text())?;
    if low > high {
        return Err(format!("low grade {low} is above high grade {high}"));
    }
    Ok(GradeRange::new(low, high))
}
