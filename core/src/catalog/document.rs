use crate::error::Result;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Fields injected into every concept row, in column order
pub const INJECTED_FIELDS: [&str; 5] = ["system", "id", "version", "status", "description"];

/// A value-set terminology document
///
/// Only the parts used for flattening are modelled; everything else in the
/// document is ignored. Concepts are kept as raw JSON objects since their
/// fields vary between catalogs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueSetDocument {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub compose: Compose,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Compose {
    #[serde(default)]
    pub include: Vec<Include>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Include {
    #[serde(default)]
    pub system: Value,
    #[serde(default)]
    pub concept: Vec<Map<String, Value>>,
}

/// One flattened concept: ordered (column, cell) pairs
pub type ConceptRow = Vec<(String, Option<String>)>;

impl ValueSetDocument {
    /// Parses a document from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads and parses a document file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Flattens the document into one row per concept of every include block
    ///
    /// A row holds the concept's own fields followed by `system`, `id`,
    /// `version`, `status` and `description`. Injected fields replace concept
    /// fields of the same name; absent document fields become empty strings.
    pub fn concept_rows(&self) -> Vec<ConceptRow> {
        let mut rows = Vec::new();
        for include in &self.compose.include {
            let injected = [
                &include.system,
                &self.id,
                &self.version,
                &self.status,
                &self.description,
            ];

            for concept in &include.concept {
                let mut row: ConceptRow = concept
                    .iter()
                    .map(|(key, value)| (key.clone(), cell_text(value)))
                    .collect();

                for (name, value) in INJECTED_FIELDS.iter().zip(injected) {
                    let cell = Some(cell_text(value).unwrap_or_default());
                    match row.iter_mut().find(|(key, _)| key == name) {
                        Some(existing) => existing.1 = cell,
                        None => row.push((name.to_string(), cell)),
                    }
                }
                rows.push(row);
            }
        }
        rows
    }
}

/// Renders a JSON value as a table cell
///
/// Strings are kept as-is, null is an empty cell, anything else is its
/// compact JSON text.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "resourceType": "ValueSet",
        "id": "laterality",
        "version": "2024.1",
        "status": "active",
        "description": "Laterality codes",
        "compose": {
            "include": [
                {
                    "system": "http://snomed.info/sct",
                    "concept": [
                        {"code": "7771000", "display": "Left"},
                        {"code": "24028007", "display": "Right", "designation": [{"value": "R"}]}
                    ]
                },
                {
                    "system": "http://dicom.nema.org/resources/ontology/DCM",
                    "concept": [{"code": "B", "display": "Both", "status": "retired"}]
                }
            ]
        }
    }"#;

    fn cell<'a>(row: &'a ConceptRow, name: &str) -> Option<&'a str> {
        row.iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    #[test]
    fn test_concept_rows() {
        let doc = ValueSetDocument::from_json(DOCUMENT).unwrap();
        let rows = doc.concept_rows();
        assert_eq!(rows.len(), 3);

        let columns: Vec<_> = rows[0].iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            columns,
            vec!["code", "display", "system", "id", "version", "status", "description"]
        );
        assert_eq!(cell(&rows[0], "system"), Some("http://snomed.info/sct"));
        assert_eq!(cell(&rows[2], "system"), Some("http://dicom.nema.org/resources/ontology/DCM"));
        assert_eq!(cell(&rows[1], "designation"), Some(r#"[{"value":"R"}]"#));
    }

    #[test]
    fn test_injected_fields_override_concept_fields() {
        let doc = ValueSetDocument::from_json(DOCUMENT).unwrap();
        let rows = doc.concept_rows();
        assert_eq!(cell(&rows[2], "status"), Some("active"));
        assert_eq!(rows[2].iter().filter(|(k, _)| k == "status").count(), 1);
    }

    #[test]
    fn test_missing_document_fields_are_empty() {
        let doc = ValueSetDocument::from_json(
            r#"{"compose": {"include": [{"concept": [{"code": "X"}]}]}}"#,
        )
        .unwrap();
        let rows = doc.concept_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(cell(&rows[0], "id"), Some(""));
        assert_eq!(cell(&rows[0], "system"), Some(""));
    }

    #[test]
    fn test_document_without_compose() {
        let doc = ValueSetDocument::from_json(r#"{"id": "empty"}"#).unwrap();
        assert!(doc.concept_rows().is_empty());
    }

    #[test]
    fn test_invalid_json_fails() {
        assert!(ValueSetDocument::from_json("{not json").is_err());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), None);
        assert_eq!(cell_text(&Value::from("a")), Some("a".to_string()));
        assert_eq!(cell_text(&Value::from(3)), Some("3".to_string()));
        assert_eq!(cell_text(&Value::from(true)), Some("true".to_string()));
    }
}
