//! The catalog: Grove's only input.
//!
//! A catalog is an ordered list of directory/package descriptors with their
//! declared relationships. Entry order matters; it is the order nodes are
//! created in and therefore the order every deterministic output follows.

use crate::error::{CatalogError, Result};
use crate::node::{Category, Importance, RelationKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A declared outgoing relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Id of the entry this one needs.
    pub target: String,
    #[serde(default)]
    pub kind: RelationKind,
}

impl Relationship {
    pub fn new(target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }
}

/// One directory or package descriptor.
///
/// `id` and `path` default to empty when absent from JSON so the graph
/// builder can report them as [`CatalogError::MissingId`] and
/// [`CatalogError::MissingPath`] with the entry's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        category: Category,
        importance: Importance,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            label: None,
            category,
            subcategory: None,
            importance,
            relationships: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    /// Declares a relationship to `target`.
    pub fn with_relationship(mut self, target: impl Into<String>, kind: RelationKind) -> Self {
        self.relationships.push(Relationship::new(target, kind));
        self
    }

    /// Declares a plain `depends` relationship on each target.
    pub fn depends_on<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships.extend(
            targets
                .into_iter()
                .map(|t| Relationship::new(t, RelationKind::Depends)),
        );
        self
    }
}

/// Accepted on-disk shapes: a bare array or an object with `entries`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<CatalogEntry>),
    Wrapped { entries: Vec<CatalogEntry> },
}

/// An immutable catalog snapshot.
///
/// Constructed explicitly and handed to the graph builder; there is no
/// process-wide registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parses a catalog from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let entries = match file {
            CatalogFile::List(entries) => entries,
            CatalogFile::Wrapped { entries } => entries,
        };
        Ok(Self { entries })
    }

    /// Reads and parses a catalog JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::debug!(
            "loaded {} catalog entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {"id": "core", "path": "packages/core", "category": "package", "importance": "critical"},
        {"id": "web", "path": "apps/web", "category": "source",
         "relationships": [{"target": "core", "kind": "imports"}, {"target": "ui"}]}
    ]"#;

    #[test]
    fn test_parse_list_form() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);

        let web = &catalog.entries()[1];
        assert_eq!(web.importance, Importance::Optional);
        assert_eq!(web.relationships.len(), 2);
        assert_eq!(web.relationships[0].kind, RelationKind::Imports);
        assert_eq!(web.relationships[1].kind, RelationKind::Depends);
    }

    #[test]
    fn test_parse_wrapped_form() {
        let json = format!("{{\"entries\": {}}}", SAMPLE);
        let catalog = Catalog::from_json_str(&json).unwrap();
        assert_eq!(catalog.entries()[0].id, "core");
    }

    #[test]
    fn test_missing_id_parses_as_empty() {
        let catalog =
            Catalog::from_json_str(r#"[{"path": "docs", "category": "documentation"}]"#).unwrap();
        assert!(catalog.entries()[0].id.is_empty());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = Catalog::from_json_str(r#"[{"id": "x", "path": "x", "category": "widget"}]"#)
            .unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
