//! Content path - the stable identifier of a content item

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Slash-delimited identifier of a content item
///
/// Derived from the file location relative to the content directory with the
/// extension removed. A trailing `index` segment folds into its directory, so
/// `posts/closures.md` and `posts/closures/index.md` name the same item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentPath(String);

impl ContentPath {
    /// Build the identifier for a file relative to the content directory
    pub fn from_source(relative: &Path, extensions: &[String]) -> Self {
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        Self::from_segments(segments, extensions)
    }

    /// Normalise a user supplied path (`posts/a`, `/posts/a/`, `posts/a.md`)
    ///
    /// Returns `None` when nothing is left after normalisation.
    pub fn parse(raw: &str, extensions: &[String]) -> Option<Self> {
        let segments: Vec<String> = raw
            .replace('\\', "/")
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self::from_segments(segments, extensions))
    }

    fn from_segments(mut segments: Vec<String>, extensions: &[String]) -> Self {
        if let Some(last) = segments.last_mut() {
            if let Some((stem, ext)) = last.rsplit_once('.') {
                if !stem.is_empty() && extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                    *last = stem.to_string();
                }
            }
        }

        if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
            segments.pop();
        }

        Self(segments.join("/"))
    }

    /// Replace the last segment with a front-matter slug
    pub fn with_slug(&self, slug: &str) -> Self {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => Self(format!("{}/{}", parent, slug)),
            None => Self(slug.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last segment
    pub fn name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, empty for top-level items
    pub fn section(&self) -> &str {
        self.0.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
    }
}

impl fmt::Display for ContentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["md".to_string(), "markdown".to_string()]
    }

    #[test]
    fn test_from_source_strips_extension() {
        let path = ContentPath::from_source(Path::new("posts/mvp-tips.md"), &exts());
        assert_eq!(path.as_str(), "posts/mvp-tips");
        assert_eq!(path.name(), "mvp-tips");
        assert_eq!(path.section(), "posts");
    }

    #[test]
    fn test_index_folds_into_directory() {
        let bundle = ContentPath::from_source(Path::new("posts/closures/index.md"), &exts());
        let flat = ContentPath::from_source(Path::new("posts/closures.md"), &exts());
        assert_eq!(bundle, flat);
    }

    #[test]
    fn test_top_level_index_is_kept() {
        let path = ContentPath::from_source(Path::new("index.md"), &exts());
        assert_eq!(path.as_str(), "index");
        assert_eq!(path.section(), "");
    }

    #[test]
    fn test_parse_normalises_variants() {
        let expected = ContentPath::parse("posts/mvp-tips", &exts()).unwrap();
        for raw in ["/posts/mvp-tips/", "posts/mvp-tips.md", "./posts//mvp-tips"] {
            assert_eq!(ContentPath::parse(raw, &exts()).unwrap(), expected, "{}", raw);
        }
        assert!(ContentPath::parse("/", &exts()).is_none());
    }

    #[test]
    fn test_unknown_extension_is_kept() {
        let path = ContentPath::parse("posts/release-v1.2", &exts()).unwrap();
        assert_eq!(path.as_str(), "posts/release-v1.2");
    }

    #[test]
    fn test_with_slug() {
        let path = ContentPath::parse("posts/2022-03-28-mvp", &exts()).unwrap();
        assert_eq!(path.with_slug("mvp-tips").as_str(), "posts/mvp-tips");
        let top = ContentPath::parse("about", &exts()).unwrap();
        assert_eq!(top.with_slug("me").as_str(), "me");
    }
}
