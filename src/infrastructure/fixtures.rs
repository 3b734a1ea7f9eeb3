//! Record fixtures shared by unit tests
//!
//! The sample load is a small energy/forces slice of the standards network:
//!
//! ```text
//! T1(6-8) ─ P1 ─ D1(5-8), C1      T2(9-12) ─ P3 ─ D2(9-12)
//! T1, T3  ─ P2 ─ D1, S1           T4(3)    ─ P4 ─ D3(3)
//! ```

use super::entity_store::{EntityStore, LoadReport};
use super::records::{CategoryRecord, ProviderRecord, RawScalar, ResourceRecord, StandardRecord};

pub fn standard(id: &str, kind: &str, low: &str, high: &str, connections: &[&str]) -> StandardRecord {
    StandardRecord {
        id: id.to_string(),
        ngss_code: None,
        description: format!("Description of {id}"),
        url: format!("https://www.nextgenscience.org/{id}"),
        low_grade: RawScalar::Text(low.to_string()),
        high_grade: RawScalar::Text(high.to_string()),
        standard_type: kind.to_string(),
        connections: connections.iter().map(|c| c.to_string()).collect(),
    }
}

fn coded(mut record: StandardRecord, code: &str) -> StandardRecord {
    record.ngss_code = Some(code.to_string());
    record
}

pub fn category(id: &str, kind: &str, standards: &[&str]) -> CategoryRecord {
    CategoryRecord {
        id: id.to_string(),
        category_type: kind.to_string(),
        description: format!("{id} category"),
        is_ngss: Some(RawScalar::Text("true".to_string())),
        standards: standards.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn resource(id: &str, alignments: &[&str]) -> ResourceRecord {
    ResourceRecord {
        id: id.to_string(),
        title: format!("Resource {id}"),
        summary: String::new(),
        url: format!("https://resources.example.org/{id}"),
        resource_type: Some("lesson".to_string()),
        alignments: alignments.iter().map(|a| a.to_string()).collect(),
    }
}

pub fn provider(id: &str, resources: &[ResourceRecord]) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: format!("Provider {id}"),
        resources: resources.to_vec(),
    }
}

pub fn sample_standards() -> Vec<StandardRecord> {
    vec![
        coded(standard("T1", "Topic", "6", "8", &["P1", "P2"]), "MS.Energy"),
        coded(standard("T2", "Topic", "9", "12", &["P3"]), "HS.Energy"),
        coded(standard("T3", "Topic", "6", "8", &["P2"]), "MS.Energy.Transfer"),
        coded(standard("T4", "Topic", "3", "3", &["P4"]), "3.Forces"),
        coded(standard("P1", "PE", "6", "8", &["D1", "C1"]), "MS-PS3-1"),
        coded(standard("P2", "PE", "6", "8", &["D1", "S1"]), "MS-PS3-2"),
        coded(standard("P3", "PE", "9", "12", &["D2"]), "HS-PS3-1"),
        coded(standard("P4", "PE", "3", "3", &["D3"]), "3-PS2-1"),
        coded(standard("D1", "DCI", "5", "8", &[]), "PS3.A"),
        coded(standard("D2", "DCI", "9", "12", &[]), "PS3.B"),
        coded(standard("D3", "DCI", "3", "3", &[]), "PS2.A"),
        standard("C1", "CC", "6", "8", &[]),
        coded(standard("S1", "SEP", "6", "8", &[]), "SEP.Models"),
    ]
}

pub fn sample_categories() -> Vec<CategoryRecord> {
    vec![
        category("Topic_Energy", "Topic", &["T1", "T3", "T2"]),
        category("Topic_Forces", "Topic", &["T4"]),
        category("DCI_PS3", "DCI", &["D1", "D2"]),
        category("CC_Patterns", "CC", &["C1"]),
    ]
}

pub fn sample_providers() -> Vec<ProviderRecord> {
    vec![
        provider(
            "prov-a",
            &[resource("R1", &["P1", "D2"]), resource("R2", &["T4"])],
        ),
        provider("prov-b", &[resource("R3", &["P1"])]),
    ]
}

pub fn sample_store() -> (EntityStore, LoadReport) {
    EntityStore::load(sample_standards(), sample_categories(), sample_providers())
}
