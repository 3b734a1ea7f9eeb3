//! Record sources
//!
//! The document store is an external collaborator. A [`RecordSource`]
//! delivers one batch of the three raw collections; [`JsonRecordSource`]
//! reads the payload shape returned by the data endpoint, where each
//! collection is either an inline array or a JSON-encoded string of one.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

use super::records::{CategoryRecord, ProviderRecord, RecordBatch, StandardRecord};
use crate::errors::RecordSourceError;

/// Supplies one data load
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self) -> Result<RecordBatch, RecordSourceError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Embedded<T> {
    Inline(Vec<T>),
    Encoded(String),
}

impl<T: DeserializeOwned> Embedded<T> {
    fn decode(self) -> Result<Vec<T>, serde_json::Error> {
        match self {
            Embedded::Inline(items) => Ok(items),
            Embedded::Encoded(text) => serde_json::from_str(&text),
        }
    }
}

#[derive(Deserialize)]
struct Payload {
    standards: Embedded<StandardRecord>,
    categories: Embedded<CategoryRecord>,
    providers: Embedded<ProviderRecord>,
}

/// Parse a data endpoint payload
pub fn parse_payload(text: &str) -> Result<RecordBatch, RecordSourceError> {
    let payload: Payload = serde_json::from_str(text)?;
    let batch = RecordBatch {
        standards: payload.standards.decode()?,
        categories: payload.categories.decode()?,
        providers: payload.providers.decode()?,
    };
    debug!(
        standards = batch.standards.len(),
        categories = batch.categories.len(),
        providers = batch.providers.len(),
        "Parsed record payload"
    );
    Ok(batch)
}

/// Reads a payload from a JSON file
#[derive(Debug, Clone)]
pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    async fn fetch(&self) -> Result<RecordBatch, RecordSourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_payload(&text)
    }
}

/// Serves a batch already in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    batch: RecordBatch,
}

impl InMemoryRecordSource {
    pub fn new(batch: RecordBatch) -> Self {
        Self { batch }
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn fetch(&self) -> Result<RecordBatch, RecordSourceError> {
        Ok(self.batch.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = r#"{
        "standards": [{"Id": "S1", "LowGrade": "K", "HighGrade": "2", "Type": "PE"}],
        "categories": [],
        "providers": [{"Id": "P", "Name": "Provider", "Resources": []}]
    }"#;

    #[test]
    fn test_parse_inline_payload() {
        let batch = parse_payload(INLINE).unwrap();
        assert_eq!(batch.standards.len(), 1);
        assert_eq!(batch.providers[0].name, "Provider");
    }

    #[test]
    fn test_parse_encoded_payload() {
        let standards = r#"[{"Id": "S1", "LowGrade": 3, "HighGrade": 5, "Type": "DCI"}]"#;
        let payload = serde_json::json!({
            "standards": standards,
            "categories": "[]",
            "providers": "[]",
        });
        let batch = parse_payload(&payload.to_string()).unwrap();
        assert_eq!(batch.standards[0].standard_type, "DCI");
        assert!(batch.categories.is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        let result = parse_payload(r#"{"standards": "not json", "categories": [], "providers": []}"#);
        assert!(matches!(result, Err(RecordSourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_in_memory_source() {
        let batch = parse_payload(INLINE).unwrap();
        let source = InMemoryRecordSource::new(batch.clone());
        assert_eq!(source.fetch().await.unwrap(), batch);
    }

    #[test]
    fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!("standards-payload-{}.json", std::process::id()));
        std::fs::write(&path, INLINE).unwrap();

        let batch = tokio_test::block_on(JsonRecordSource::new(&path).fetch()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(batch.standards[0].id, "S1");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let source = JsonRecordSource::new("/nonexistent/standards.json");
        assert!(matches!(source.fetch().await, Err(RecordSourceError::Io(_))));
    }
}
