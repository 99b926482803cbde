//! Raw-manifest structural parsing
//!
//! Turns YAML (or JSON) manifest files into a flat sequence of generic
//! documents. Multi-document streams separated by `---` are split, empty
//! documents are skipped and `kind: List` wrappers are flattened into their
//! items.

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::trace;

const LIST_KIND: &str = "List";

/// A single parsed manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument(Value);

impl ManifestDocument {
    /// Wrap an already parsed value
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The document's `kind`, if it is a string
    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    /// The document's `apiVersion`, if it is a string
    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    /// API group from `apiVersion` (empty for the core group)
    pub fn api_group(&self) -> Option<&str> {
        self.api_version()
            .map(|v| v.rsplit_once('/').map(|(group, _)| group).unwrap_or(""))
    }

    /// `metadata.name`, if present
    pub fn name(&self) -> Option<&str> {
        self.get_str(&["metadata", "name"])
    }

    /// Walk nested mappings along `path`
    pub fn get(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |value, key| value.get(*key))
    }

    /// Walk nested mappings along `path` and return a string leaf
    pub fn get_str(&self, path: &[&str]) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// The underlying value
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ManifestDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Parse every document in a YAML stream
pub fn parse_documents(
    content: &str,
) -> std::result::Result<Vec<ManifestDocument>, serde_yaml_ng::Error> {
    let mut documents = Vec::new();

    for document in serde_yaml_ng::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        push_flattened(value, &mut documents);
    }

    trace!("Parsed {} manifest documents", documents.len());
    Ok(documents)
}

fn push_flattened(value: Value, documents: &mut Vec<ManifestDocument>) {
    match value {
        Value::Null => {}
        Value::Object(mut map) if map.get("kind").and_then(Value::as_str) == Some(LIST_KIND) => {
            if let Some(Value::Array(items)) = map.remove("items") {
                for item in items {
                    push_flattened(item, documents);
                }
            }
        }
        other => documents.push(ManifestDocument(other)),
    }
}

/// Read and parse a raw manifest file
pub fn read_documents(path: &Path) -> Result<Vec<ManifestDocument>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::manifest_read_failed(path.display().to_string(), e.to_string()))?;
    parse_documents(&content)
        .map_err(|e| Error::manifest_read_failed(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_document_stream() {
        let yaml = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: sample
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: sample-manager
---
"#;
        let docs = parse_documents(yaml).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].kind(), Some("Namespace"));
        assert_eq!(docs[0].api_group(), Some(""));
        assert_eq!(docs[1].name(), Some("sample-manager"));
        assert_eq!(docs[1].api_group(), Some("apps"));
    }

    #[test]
    fn test_list_is_flattened() {
        let yaml = r#"
apiVersion: v1
kind: List
items:
  - kind: ConfigMap
    metadata:
      name: a
  - kind: List
    items:
      - kind: Secret
        metadata:
          name: b
"#;
        let docs = parse_documents(yaml).unwrap();
        let kinds: Vec<_> = docs.iter().filter_map(|d| d.kind()).collect();
        assert_eq!(kinds, vec!["ConfigMap", "Secret"]);
    }

    #[test]
    fn test_json_document() {
        let docs = parse_documents(r#"{"kind": "Service", "metadata": {"name": "svc"}}"#).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str(&["metadata", "name"]), Some("svc"));
        assert!(docs[0].get(&["spec", "ports"]).is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(parse_documents("kind: [unclosed").is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_documents(Path::new("/nonexistent/manifest.yaml")).unwrap_err();
        assert!(matches!(err, Error::ManifestReadFailed { .. }));
    }
}
