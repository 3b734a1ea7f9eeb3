//! Shared payload for integration tests
//!
//! Same energy/forces slice the unit tests use, in the data endpoint's
//! JSON shape.

#![allow(dead_code)]

use serde_json::{json, Value};
use standards_graph::infrastructure::{parse_payload, RecordBatch};
use standards_graph::{EntityStore, LoadReport};

fn standard(id: &str, kind: &str, low: Value, high: Value, code: Option<&str>, connections: &[&str]) -> Value {
    json!({
        "Id": id,
        "NGSSCode": code,
        "Description": format!("Description of {id}"),
        "Url": format!("https://www.nextgenscience.org/{id}"),
        "LowGrade": low,
        "HighGrade": high,
        "Type": kind,
        "Connections": connections,
    })
}

fn resource(id: &str, alignments: &[&str]) -> Value {
    json!({
        "Id": id,
        "Title": format!("Resource {id}"),
        "Url": format!("https://resources.example.org/{id}"),
        "Type": "lesson",
        "Alignments": alignments,
    })
}

pub fn payload() -> Value {
    json!({
        "standards": [
            standard("T1", "Topic", json!("6"), json!("8"), Some("MS.Energy"), &["P1", "P2"]),
            standard("T2", "Topic", json!(9), json!(12), Some("HS.Energy"), &["P3"]),
            standard("T3", "Topic", json!("6"), json!("8"), Some("MS.Energy.Transfer"), &["P2"]),
            standard("T4", "Topic", json!("3"), json!("3"), Some("3.Forces"), &["P4"]),
            standard("P1", "PE", json!("6"), json!("8"), Some("MS-PS3-1"), &["D1", "C1"]),
            standard("P2", "PE", json!("6"), json!("8"), Some("MS-PS3-2"), &["D1", "S1"]),
            standard("P3", "PE", json!("9"), json!("12"), Some("HS-PS3-1"), &["D2"]),
            standard("P4", "PE", json!("3"), json!("3"), Some("3-PS2-1"), &["D3"]),
            standard("D1", "DCI", json!("5"), json!("8"), Some("PS3.A"), &[]),
            standard("D2", "DCI", json!("9"), json!("12"), Some("PS3.B"), &[]),
            standard("D3", "DCI", json!("3"), json!("3"), Some("PS2.A"), &[]),
            standard("C1", "CC", json!("6"), json!("8"), None, &[]),
            standard("S1", "SEP", json!("6"), json!("8"), Some("SEP.Models"), &[]),
        ],
        "categories": [
            {"Id": "Topic_Energy", "Type": "Topic", "IsNGSS": "true", "Standards": ["T1", "T3", "T2"]},
            {"Id": "Topic_Forces", "Type": "Topic", "IsNGSS": true, "Standards": ["T4"]},
            {"Id": "DCI_PS3", "Type": "DCI", "Standards": ["D1", "D2"]},
            {"Id": "CC_Patterns", "Type": "CC", "Standards": ["C1"]},
        ],
        "providers": [
            {"Id": "prov-a", "Name": "Provider A", "Resources": [resource("R1", &["P1", "D2"]), resource("R2", &["T4"])]},
            {"Id": "prov-b", "Name": "Provider B", "Resources": [resource("R3", &["P1"])]},
        ],
    })
}

pub fn batch() -> RecordBatch {
    parse_payload(&payload().to_string()).unwrap()
}

pub fn store() -> (EntityStore, LoadReport) {
    EntityStore::from_batch(batch())
}
