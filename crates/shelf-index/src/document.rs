//! On-disk shape of the import index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use shelf_core::ItemId;

/// The whole persisted index.
///
/// `imports` is required: a document without it is treated as malformed
/// and replaced by a fresh one. Unknown top-level keys written by other
/// tools are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportIndexDocument {
    /// Base URL for links into the downloads share.
    #[serde(default)]
    pub web_base_url_downloads: String,

    /// Base URL for links into the catalog library.
    #[serde(default)]
    pub web_base_url_eagle: String,

    /// RFC 3339 timestamp of the last save.
    #[serde(default)]
    pub last_updated: String,

    /// Folder name to entry.
    pub imports: BTreeMap<String, IndexEntry>,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl ImportIndexDocument {
    /// Creates an empty document with the given base URLs and timestamp.
    #[must_use]
    pub fn fresh(
        web_base_url_downloads: impl Into<String>,
        web_base_url_eagle: impl Into<String>,
        last_updated: impl Into<String>,
    ) -> Self {
        Self {
            web_base_url_downloads: web_base_url_downloads.into(),
            web_base_url_eagle: web_base_url_eagle.into(),
            last_updated: last_updated.into(),
            imports: BTreeMap::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Summarizes the document.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            total: self.imports.len(),
            with_external_id: self
                .imports
                .values()
                .filter(|e| e.external_id.as_deref().is_some_and(|id| !id.is_empty()))
                .count(),
            last_updated: self.last_updated.clone(),
        }
    }
}

/// One imported folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexEntry {
    /// Identifier assigned by the catalog.
    #[serde(rename = "eagleItemId")]
    pub item_id: ItemId,

    /// Storage path relative to the catalog's images root, `/`-separated.
    #[serde(rename = "filePath")]
    pub file_path: String,

    /// Public link to the stored file.
    #[serde(rename = "webUrl")]
    pub web_url: String,

    /// External numeric identifier, when one could be extracted.
    #[serde(rename = "nhentaiId")]
    pub external_id: Option<String>,

    /// Source URL of the item.
    #[serde(rename = "nhentaiUrl")]
    pub external_url: Option<String>,

    /// Display title.
    pub title: String,

    /// Tags in display order.
    pub tags: Vec<String>,

    /// RFC 3339 import timestamp.
    #[serde(rename = "importedAt")]
    pub imported_at: String,
}

/// Aggregate figures over an index document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of entries.
    pub total: usize,
    /// Entries carrying an external identifier.
    pub with_external_id: usize,
    /// Timestamp of the last save.
    pub last_updated: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_without_imports_is_rejected() {
        let result: Result<ImportIndexDocument, _> =
            serde_json::from_str(r#"{"lastUpdated": "2024-01-01T00:00:00.000Z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let text = r#"{"imports": {}, "lastUpdated": "t", "schemaNote": {"v": 2}}"#;
        let document: ImportIndexDocument = serde_json::from_str(text).unwrap();
        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value["schemaNote"], serde_json::json!({"v": 2}));
        assert_eq!(value["webBaseUrlEagle"], "");
    }

    #[test]
    fn test_entry_tolerates_missing_fields() {
        let entry: IndexEntry = serde_json::from_str(r#"{"eagleItemId": "KX1"}"#).unwrap();
        assert_eq!(entry.item_id.as_str(), "KX1");
        assert!(entry.external_id.is_none());
        assert!(entry.tags.is_empty());
    }

    #[test]
    fn test_stats_counts_external_ids() {
        let mut document = ImportIndexDocument::fresh("d", "e", "2024-05-01T00:00:00.000Z");
        document.imports.insert(
            "A".to_owned(),
            IndexEntry {
                external_id: Some("1".to_owned()),
                ..IndexEntry::default()
            },
        );
        document.imports.insert("B".to_owned(), IndexEntry::default());

        let stats = document.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.with_external_id, 1);
        assert_eq!(stats.last_updated, "2024-05-01T00:00:00.000Z");
    }
}
