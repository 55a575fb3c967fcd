//! The sidecar metadata document of an item folder.

use rustc_hash::FxHashSet;
use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional metadata supplied next to the files of an item folder.
///
/// Every field is optional; a folder without a sidecar document is imported
/// with defaults. Tags keep their original order with duplicates removed.
///
/// # Examples
///
/// ```
/// use shelf_core::Metadata;
///
/// let (metadata, ignored) = Metadata::from_json(
///     r#"{"name": "Sample Title", "tags": ["a", "b", "a"], "url": 7}"#,
/// ).unwrap();
/// assert_eq!(metadata.name.as_deref(), Some("Sample Title"));
/// assert_eq!(metadata.tags, Some(vec!["a".to_owned(), "b".to_owned()]));
/// assert!(metadata.url.is_none());
/// assert_eq!(ignored, ["url"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Display title of the item.
    #[serde(default)]
    pub name: Option<String>,

    /// Source URL the item was downloaded from.
    #[serde(default)]
    pub url: Option<String>,

    /// Tags in display order.
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Free-text annotation, may embed an `ID: <digits>` line.
    #[serde(default)]
    pub annotation: Option<String>,
}

impl Metadata {
    /// Parses a sidecar document field by field.
    ///
    /// A field holding the wrong kind of value is left unset and its key is
    /// returned alongside the metadata; the remaining fields still apply.
    /// Non-string entries of `tags` are dropped the same way.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the text is not JSON or not a JSON object.
    pub fn from_json(text: &str) -> Result<(Self, Vec<&'static str>), serde_json::Error> {
        let Value::Object(fields) = serde_json::from_str::<Value>(text)? else {
            return Err(serde_json::Error::custom(
                "metadata document is not a JSON object",
            ));
        };

        let mut ignored = Vec::new();
        let metadata = Self {
            name: string_field(&fields, "name", &mut ignored),
            url: string_field(&fields, "url", &mut ignored),
            tags: tags_field(&fields, &mut ignored),
            annotation: string_field(&fields, "annotation", &mut ignored),
        };
        Ok((metadata, ignored))
    }

    /// Returns the title, or `fallback` when the document has none.
    #[must_use]
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(fallback)
    }
}

fn string_field(
    fields: &Map<String, Value>,
    key: &'static str,
    ignored: &mut Vec<&'static str>,
) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => {
            ignored.push(key);
            None
        }
    }
}

fn tags_field(fields: &Map<String, Value>, ignored: &mut Vec<&'static str>) -> Option<Vec<String>> {
    let items = match fields.get("tags")? {
        Value::Null => return None,
        Value::Array(items) => items,
        _ => {
            ignored.push("tags");
            return None;
        }
    };

    if items.iter().any(|item| !item.is_string()) {
        ignored.push("tags");
    }
    let mut seen = FxHashSet::default();
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .filter(|tag| seen.insert(*tag))
            .map(str::to_owned)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_valid() {
        let (metadata, ignored) = Metadata::from_json("{}").unwrap();
        assert_eq!(metadata, Metadata::default());
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let (metadata, ignored) =
            Metadata::from_json(r#"{"id": "KX1", "name": "T", "annotation": "ID: 42"}"#).unwrap();
        assert_eq!(metadata.name.as_deref(), Some("T"));
        assert_eq!(metadata.annotation.as_deref(), Some("ID: 42"));
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_mistyped_field_keeps_the_others() {
        let (metadata, ignored) = Metadata::from_json(
            r#"{"name": "Real Title", "url": "https://nhentai.net/g/777/", "tags": "single"}"#,
        )
        .unwrap();
        assert_eq!(metadata.name.as_deref(), Some("Real Title"));
        assert_eq!(metadata.url.as_deref(), Some("https://nhentai.net/g/777/"));
        assert!(metadata.tags.is_none());
        assert_eq!(ignored, ["tags"]);

        let (metadata, ignored) =
            Metadata::from_json(r#"{"name": 12, "annotation": null, "url": "u"}"#).unwrap();
        assert!(metadata.name.is_none());
        assert!(metadata.annotation.is_none());
        assert_eq!(metadata.url.as_deref(), Some("u"));
        assert_eq!(ignored, ["name"]);
    }

    #[test]
    fn test_non_string_tags_are_dropped() {
        let (metadata, ignored) = Metadata::from_json(r#"{"tags": ["a", 1, "b", "a"]}"#).unwrap();
        assert_eq!(metadata.tags, Some(vec!["a".to_owned(), "b".to_owned()]));
        assert_eq!(ignored, ["tags"]);
    }

    #[test]
    fn test_non_object_documents_fail() {
        assert!(Metadata::from_json("not json").is_err());
        assert!(Metadata::from_json(r#"["name"]"#).is_err());
        assert!(Metadata::from_json("null").is_err());
    }

    #[test]
    fn test_title_or() {
        let metadata = Metadata::default();
        assert_eq!(metadata.title_or("Folder"), "Folder");

        let metadata = Metadata {
            name: Some(String::new()),
            ..Metadata::default()
        };
        assert_eq!(metadata.title_or("Folder"), "Folder");

        let metadata = Metadata {
            name: Some("Named".to_owned()),
            ..Metadata::default()
        };
        assert_eq!(metadata.title_or("Folder"), "Named");
    }
}
