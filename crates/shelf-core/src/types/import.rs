//! Catalog item identifiers, import options and per-file results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::metadata::Metadata;

/// Identifier the catalog assigns to an imported item.
///
/// # Examples
///
/// ```
/// use shelf_core::ItemId;
///
/// let id = ItemId::new("MJVZNHLIT4O3D");
/// assert_eq!(id.as_str(), "MJVZNHLIT4O3D");
/// assert_eq!(id.to_string(), "MJVZNHLIT4O3D");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates an identifier from any string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    #[inline]
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    #[inline]
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Options passed to the catalog alongside a file path.
///
/// Absent fields are omitted entirely, both in the struct and in its
/// serialized form, so the catalog applies its own defaults for them.
///
/// # Examples
///
/// ```
/// use shelf_core::ImportOptions;
///
/// let options = ImportOptions::builder()
///     .title("Sample Title")
///     .tags(vec!["a".to_owned()])
///     .build();
/// assert_eq!(
///     serde_json::to_string(&options).unwrap(),
///     r#"{"name":"Sample Title","tags":["a"]}"#,
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Item title.
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Source URL of the item.
    #[serde(rename = "website", default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    /// Tags to attach.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl ImportOptions {
    /// Starts building options field by field.
    #[inline]
    #[must_use]
    pub fn builder() -> ImportOptionsBuilder {
        ImportOptionsBuilder::default()
    }

    /// Builds options from whichever metadata fields are present.
    #[must_use]
    pub fn from_metadata(metadata: Option<&Metadata>) -> Self {
        let Some(metadata) = metadata else {
            return Self::default();
        };
        let mut builder = Self::builder();
        if let Some(name) = metadata.name.as_deref().filter(|s| !s.is_empty()) {
            builder = builder.title(name);
        }
        if let Some(url) = metadata.url.as_deref().filter(|s| !s.is_empty()) {
            builder = builder.source_url(url);
        }
        if let Some(tags) = &metadata.tags {
            builder = builder.tags(tags.clone());
        }
        if let Some(annotation) = metadata.annotation.as_deref().filter(|s| !s.is_empty()) {
            builder = builder.annotation(annotation);
        }
        builder.build()
    }
}

/// Builder for [`ImportOptions`].
#[derive(Debug, Clone, Default)]
pub struct ImportOptionsBuilder {
    options: ImportOptions,
}

impl ImportOptionsBuilder {
    /// Sets the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    /// Sets the source URL.
    #[must_use]
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.options.source_url = Some(url.into());
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.options.tags = Some(tags);
        self
    }

    /// Sets the annotation.
    #[must_use]
    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.options.annotation = Some(annotation.into());
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> ImportOptions {
        self.options
    }
}

/// Outcome of importing a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportResult {
    /// The catalog accepted the file under this identifier.
    Imported(ItemId),
    /// The import failed.
    Failed(String),
}

impl ImportResult {
    /// Returns `true` if the file was imported.
    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Imported(_))
    }

    /// Returns the assigned identifier on success.
    #[must_use]
    pub const fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::Imported(id) => Some(id),
            Self::Failed(_) => None,
        }
    }

    /// Returns the error detail on failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Imported(_) => None,
            Self::Failed(detail) => Some(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_full_metadata() {
        let metadata = Metadata {
            name: Some("Sample Title".to_owned()),
            url: Some("https://nhentai.net/g/123456/".to_owned()),
            tags: Some(vec!["a".to_owned(), "b".to_owned()]),
            annotation: None,
        };
        let options = ImportOptions::from_metadata(Some(&metadata));
        assert_eq!(options.title.as_deref(), Some("Sample Title"));
        assert_eq!(
            options.source_url.as_deref(),
            Some("https://nhentai.net/g/123456/")
        );
        assert_eq!(options.tags, Some(vec!["a".to_owned(), "b".to_owned()]));
        assert!(options.annotation.is_none());

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Sample Title",
                "website": "https://nhentai.net/g/123456/",
                "tags": ["a", "b"],
            })
        );
    }

    #[test]
    fn test_options_without_metadata_are_empty() {
        assert_eq!(ImportOptions::from_metadata(None), ImportOptions::default());
        assert_eq!(
            ImportOptions::from_metadata(Some(&Metadata::default())),
            ImportOptions::default()
        );
        assert_eq!(
            serde_json::to_string(&ImportOptions::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_options_skip_empty_strings() {
        let metadata = Metadata {
            name: Some(String::new()),
            annotation: Some("note".to_owned()),
            ..Metadata::default()
        };
        let options = ImportOptions::from_metadata(Some(&metadata));
        assert!(options.title.is_none());
        assert_eq!(options.annotation.as_deref(), Some("note"));
    }

    #[test]
    fn test_import_result_accessors() {
        let ok = ImportResult::Imported(ItemId::new("ABC"));
        assert!(ok.is_success());
        assert_eq!(ok.item_id().map(ItemId::as_str), Some("ABC"));
        assert!(ok.error().is_none());

        let failed = ImportResult::Failed("catalog returned no id".to_owned());
        assert!(!failed.is_success());
        assert!(failed.item_id().is_none());
        assert_eq!(failed.error(), Some("catalog returned no id"));
    }

    #[test]
    fn test_item_id_serializes_transparently() {
        let id = ItemId::from("KX12");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""KX12""#);
    }
}
