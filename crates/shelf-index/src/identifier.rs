//! External identifier extraction.

use std::sync::LazyLock;

use regex::Regex;

static URL_ID: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"/g/(\d+)").ok());
static ANNOTATION_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"ID:\s*(\d+)").ok());

fn first_capture(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    re.as_ref()?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().to_owned())
}

/// Extracts the numeric external identifier of an item.
///
/// The source URL (`.../g/<digits>/`) wins; the annotation (`ID: <digits>`)
/// is only consulted when the URL is absent or carries no identifier.
///
/// # Examples
///
/// ```
/// use shelf_index::extract_external_id;
///
/// assert_eq!(
///     extract_external_id(Some("https://nhentai.net/g/123456/"), None).as_deref(),
///     Some("123456"),
/// );
/// assert_eq!(
///     extract_external_id(None, Some("Pages: 20\nID: 777")).as_deref(),
///     Some("777"),
/// );
/// assert_eq!(extract_external_id(Some("https://example.com/"), None), None);
/// ```
#[must_use]
pub fn extract_external_id(url: Option<&str>, annotation: Option<&str>) -> Option<String> {
    url.and_then(|u| first_capture(&URL_ID, u))
        .or_else(|| annotation.and_then(|a| first_capture(&ANNOTATION_ID, a)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_takes_precedence() {
        let id = extract_external_id(Some("https://nhentai.net/g/42/"), Some("ID: 99"));
        assert_eq!(id.as_deref(), Some("42"));
    }

    #[test]
    fn test_falls_back_to_annotation() {
        let id = extract_external_id(Some("https://other.site/book/x"), Some("📔 ID:  5150"));
        assert_eq!(id.as_deref(), Some("5150"));
    }

    #[test]
    fn test_url_without_trailing_slash() {
        let id = extract_external_id(Some("https://nhentai.net/g/31337"), None);
        assert_eq!(id.as_deref(), Some("31337"));
    }

    #[test]
    fn test_nothing_to_extract() {
        assert_eq!(extract_external_id(None, None), None);
        assert_eq!(extract_external_id(Some(""), Some("no id here")), None);
        assert_eq!(extract_external_id(None, Some("ID: abc")), None);
    }
}
