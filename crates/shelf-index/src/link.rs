//! Catalog-relative storage paths and public links.

/// Computes the storage path of a catalog file relative to the images root.
///
/// Separators are converted to `/`. The root prefix is only stripped at a
/// component boundary; a path outside the root falls back to its last two
/// components (`<item>.info/<file>`), which is how the catalog lays out its
/// items.
///
/// # Examples
///
/// ```
/// use shelf_index::relative_storage_path;
///
/// assert_eq!(
///     relative_storage_path(r"D:\Library\images", r"D:\Library\images\KX1.info\book.pdf"),
///     "KX1.info/book.pdf",
/// );
/// ```
#[must_use]
pub fn relative_storage_path(images_root: &str, file_path: &str) -> String {
    let file = file_path.replace('\\', "/");
    let root = images_root.replace('\\', "/");
    let root = root.trim_end_matches('/');

    if !root.is_empty() {
        if let Some(rest) = strip_prefix_ignore_case(&file, root) {
            if let Some(rest) = rest.strip_prefix('/') {
                return rest.trim_start_matches('/').to_owned();
            }
        }
    }

    let mut tail: Vec<&str> = file.rsplit('/').filter(|s| !s.is_empty()).take(2).collect();
    tail.reverse();
    tail.join("/")
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Percent-encodes every segment of a `/`-separated path independently.
#[must_use]
pub fn encode_path(relative: &str) -> String {
    relative
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Joins a base URL with an already encoded relative path.
#[must_use]
pub fn public_url(base: &str, encoded_relative: &str) -> String {
    let base = base.trim_end_matches('/');
    let relative = encoded_relative.trim_start_matches('/');
    if base.is_empty() {
        return relative.to_owned();
    }
    format!("{base}/{relative}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_under_root() {
        assert_eq!(
            relative_storage_path("/lib/images/", "/lib/images/A.info/a.pdf"),
            "A.info/a.pdf"
        );
        assert_eq!(
            relative_storage_path(r"d:\lib\IMAGES", r"D:\lib\images\A.info\a.pdf"),
            "A.info/a.pdf"
        );
    }

    #[test]
    fn test_relative_path_requires_component_boundary() {
        assert_eq!(
            relative_storage_path("/lib/images", "/lib/images2/deep/A.info/a.pdf"),
            "A.info/a.pdf"
        );
    }

    #[test]
    fn test_relative_path_outside_root_keeps_last_two_components() {
        assert_eq!(
            relative_storage_path("", r"E:\elsewhere\B.info\b.pdf"),
            "B.info/b.pdf"
        );
        assert_eq!(relative_storage_path("/x", "b.pdf"), "b.pdf");
    }

    #[test]
    fn test_encode_each_segment() {
        assert_eq!(
            encode_path("A.info/[作者] 本 #1.pdf"),
            "A.info/%5B%E4%BD%9C%E8%80%85%5D%20%E6%9C%AC%20%231.pdf"
        );
    }

    #[test]
    fn test_public_url_join() {
        assert_eq!(
            public_url("http://localhost:8889/", "A.info/a.pdf"),
            "http://localhost:8889/A.info/a.pdf"
        );
        assert_eq!(public_url("", "/A.info/a.pdf"), "A.info/a.pdf");
    }
}
