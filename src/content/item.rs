//! Content item model

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::body::{self, Block, Link};
use super::frontmatter::{FrontMatter, ParseOptions};
use super::{ContentError, ContentPath};

/// One authored file: metadata plus body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentItem {
    /// Stable identifier
    pub path: ContentPath,

    /// Human-readable title
    pub title: String,

    /// Authoring/publication time with its written offset
    pub date: DateTime<FixedOffset>,

    /// Excluded from public listings when set
    pub draft: bool,

    /// Raw markup following the front-matter
    pub body: String,

    /// Source file, relative to the content directory
    pub source: PathBuf,

    /// Front-matter fields the store does not interpret
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl ContentItem {
    /// Parse a content file
    ///
    /// `source` is the file location relative to the content directory and
    /// determines the item's path. Parsing touches nothing but its arguments,
    /// so the same input always yields an equal item.
    pub fn parse(
        source: &Path,
        text: &str,
        extensions: &[String],
        options: &ParseOptions,
    ) -> Result<Self, ContentError> {
        let (fm, body) = FrontMatter::parse(source, text, options)?;

        let path = ContentPath::from_source(source, extensions);
        let path = match &fm.slug {
            Some(slug) => path.with_slug(slug),
            None => path,
        };

        Ok(Self {
            path,
            title: fm.title,
            date: fm.date,
            draft: fm.draft,
            body: body.to_string(),
            source: source.to_path_buf(),
            extra: fm.extra,
        })
    }

    /// Top-level blocks of the body
    pub fn outline(&self) -> Vec<Block> {
        body::outline(&self.body)
    }

    /// Links and images referenced by the body
    pub fn links(&self) -> Vec<Link> {
        body::links(&self.body)
    }

    /// Text before the `<!--more-->` divider
    pub fn summary(&self) -> Option<&str> {
        body::summary(&self.body)
    }
}
