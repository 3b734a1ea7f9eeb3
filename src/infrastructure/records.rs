//! Raw record shapes delivered by the document store
//!
//! These mirror the stored documents field for field. Grades and flags arrive
//! either as strings or as JSON scalars, so they are kept loose here and
//! validated when the entity store indexes them.

use serde::{Deserialize, Serialize};

/// A JSON scalar that may have been stored as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(i64),
    Flag(bool),
}

impl RawScalar {
    pub fn as_text(&self) -> String {
        match self {
            RawScalar::Text(s) => s.clone(),
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Flag(b) => b.to_string(),
        }
    }

    pub fn as_flag(&self) -> bool {
        match self {
            RawScalar::Text(s) => s.trim().eq_ignore_ascii_case("true"),
            RawScalar::Number(n) => *n != 0,
            RawScalar::Flag(b) => *b,
        }
    }
}

/// A curriculum standard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StandardRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "NGSSCode", default)]
    pub ngss_code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    pub low_grade: RawScalar,
    pub high_grade: RawScalar,
    #[serde(rename = "Type")]
    pub standard_type: String,
    #[serde(default)]
    pub connections: Vec<String>,
}

/// A Topic, CC, DCI or SEP category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CategoryRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "Type")]
    pub category_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "IsNGSS", default)]
    pub is_ngss: Option<RawScalar>,
    #[serde(default)]
    pub standards: Vec<String>,
}

/// A curriculum resource aligned to standards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "Type", default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub alignments: Vec<String>,
}

/// A curriculum provider and its resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProviderRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// One data load: the three raw collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    pub standards: Vec<StandardRecord>,
    pub categories: Vec<CategoryRecord>,
    pub providers: Vec<ProviderRecord>,
}
