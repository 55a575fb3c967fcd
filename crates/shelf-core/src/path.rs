//! Path normalization and validation for the catalog import API.
//!
//! The catalog only accepts locally-mounted absolute paths. A network share
//! (`\\host\share\...` or `//host/share/...`) has to be mapped to a drive
//! letter or mount point before it can be handed over, which is outside the
//! importer's control, so such paths are rejected up front.
//!
//! # Examples
//!
//! ```
//! use shelf_core::{normalize, validate};
//!
//! assert_eq!(normalize(r"Z:/downloads/"), r"Z:\downloads");
//! assert!(validate(&normalize("/mnt/nas/downloads")).is_ok());
//! assert!(validate(r"\\192.168.10.2\docker\downloads").is_err());
//! ```

/// Reasons a path is not acceptable for the import API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathRejection {
    /// The path is empty.
    #[error("path is empty")]
    Empty,

    /// The path addresses a network share instead of a local mount.
    #[error("'{0}' is a network share path; map it to a local drive or mount point first")]
    NetworkShare(String),

    /// The path is not rooted at a drive or volume.
    #[error("'{0}' is not an absolute path rooted at a drive or volume")]
    NotAbsolute(String),
}

impl PathRejection {
    /// Returns the human-readable reason for the rejection.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

#[inline]
const fn is_separator(c: char) -> bool {
    matches!(c, '/' | '\\')
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Returns `true` if the path uses network-share notation (`\\host` or `//host`).
#[must_use]
pub fn is_network_share(path: &str) -> bool {
    let mut chars = path.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if is_separator(a) && is_separator(b)
    )
}

/// Returns `true` if the path is rooted at a drive letter or a single `/`.
#[must_use]
pub fn is_volume_rooted(path: &str) -> bool {
    if is_network_share(path) {
        return false;
    }
    if has_drive_prefix(path) {
        return path[2..].starts_with(is_separator);
    }
    path.starts_with('/')
}

/// Canonicalizes separators and strips a trailing separator.
///
/// Drive-letter and `\\` share paths use `\`; everything else uses `/`.
/// Runs of separators collapse to one, except the leading share marker,
/// which is kept so that [`validate`] still sees it. A bare volume root
/// (`/`, `C:\`) keeps its separator.
#[must_use]
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let windows_style = has_drive_prefix(trimmed) || trimmed.starts_with(r"\\");
    let sep = if windows_style { '\\' } else { '/' };

    let mut out = String::with_capacity(trimmed.len());
    let rest = if is_network_share(trimmed) {
        out.push(sep);
        out.push(sep);
        trimmed.trim_start_matches(is_separator)
    } else {
        trimmed
    };

    let mut prev_sep = out.ends_with(sep);
    for c in rest.chars() {
        if is_separator(c) {
            if !prev_sep {
                out.push(sep);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }

    while out.ends_with(sep) && !is_bare_root(&out) {
        out.pop();
    }
    out
}

fn is_bare_root(path: &str) -> bool {
    match path.len() {
        1 => path.starts_with(is_separator),
        2 => is_network_share(path),
        3 => has_drive_prefix(path) && path.ends_with(is_separator),
        _ => false,
    }
}

/// Checks whether a path can be handed to the import API.
///
/// # Errors
///
/// Returns the [`PathRejection`] describing why the path is unusable.
pub fn validate(path: &str) -> Result<(), PathRejection> {
    if path.trim().is_empty() {
        return Err(PathRejection::Empty);
    }
    if is_network_share(path) {
        return Err(PathRejection::NetworkShare(path.to_owned()));
    }
    if !is_volume_rooted(path) {
        return Err(PathRejection::NotAbsolute(path.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_share_paths_are_rejected() {
        for path in [
            r"\\192.168.10.2\docker\downloads",
            "//nas/share/comics",
            r"\/mixed\share",
            r"\\",
        ] {
            let err = validate(path).unwrap_err();
            assert!(matches!(err, PathRejection::NetworkShare(_)), "{path}");
            assert!(!err.reason().is_empty());
        }
    }

    #[test]
    fn test_volume_rooted_paths_are_valid() {
        for path in [r"Z:\downloads", "z:/downloads", r"C:\", "/", "/mnt/nas/downloads"] {
            assert!(validate(path).is_ok(), "{path}");
        }
    }

    #[test]
    fn test_relative_and_empty_paths_are_rejected() {
        assert_eq!(validate(""), Err(PathRejection::Empty));
        assert_eq!(validate("   "), Err(PathRejection::Empty));
        assert!(matches!(
            validate("downloads/comic"),
            Err(PathRejection::NotAbsolute(_))
        ));
        assert!(matches!(validate("C:"), Err(PathRejection::NotAbsolute(_))));
        assert!(matches!(
            validate(r"C:relative"),
            Err(PathRejection::NotAbsolute(_))
        ));
    }

    #[test]
    fn test_normalize_drive_paths() {
        assert_eq!(normalize("Z:/downloads/comic/"), r"Z:\downloads\comic");
        assert_eq!(normalize(r"Z:\\downloads\\\comic"), r"Z:\downloads\comic");
        assert_eq!(normalize("C:/"), r"C:\");
        assert_eq!(normalize(r"C:\"), r"C:\");
    }

    #[test]
    fn test_normalize_unix_paths() {
        assert_eq!(normalize("/mnt//nas/downloads/"), "/mnt/nas/downloads");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("  /srv/comics  "), "/srv/comics");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_keeps_share_marker() {
        assert_eq!(normalize(r"\\nas\share\\dir\"), r"\\nas\share\dir");
        assert_eq!(normalize("//nas/share/"), "//nas/share");
        assert!(validate(&normalize(r"\\nas/share")).is_err());
    }
}
