//! Content item store - loads items from the content directory

use glob::Pattern;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter::ParseOptions;
use super::{ContentError, ContentItem, ContentPath};

/// How the store discovers and parses files
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// File extensions treated as content, without the dot
    pub extensions: Vec<String>,
    /// Glob patterns, relative to the content directory, of files to skip
    pub ignore: Vec<String>,
    pub parse: ParseOptions,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string(), "markdown".to_string()],
            ignore: Vec::new(),
            parse: ParseOptions::default(),
        }
    }
}

/// Outcome of a scan that keeps going past errors
#[derive(Debug)]
pub struct ScanReport {
    /// Every item that parsed, minus later files shadowed by a duplicate path
    pub store: ContentStore,
    /// Errors in file order
    pub errors: Vec<ContentError>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The authoritative set of content items, keyed by path
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
    extensions: Vec<String>,
    items: BTreeMap<ContentPath, ContentItem>,
}

impl ContentStore {
    /// Load every item under `root`, failing on the first error in file order
    pub fn load(root: &Path, options: &StoreOptions) -> Result<Self, ContentError> {
        let report = Self::scan(root, options)?;
        match report.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(report.store),
        }
    }

    /// Load every item under `root`, collecting all errors
    ///
    /// Only an unusable ignore pattern aborts the scan.
    pub fn scan(root: &Path, options: &StoreOptions) -> Result<ScanReport, ContentError> {
        let patterns = options
            .ignore
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|source| ContentError::InvalidIgnorePattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut store = Self {
            root: root.to_path_buf(),
            extensions: options.extensions.clone(),
            items: BTreeMap::new(),
        };
        let mut errors = Vec::new();

        if !root.exists() {
            tracing::warn!("Content directory {:?} does not exist", root);
            return Ok(ScanReport { store, errors });
        }

        let walker = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !is_excluded(root, entry.path(), &patterns)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    errors.push(ContentError::Walk(e));
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !has_extension(path, &options.extensions) {
                continue;
            }

            let source = path.strip_prefix(root).unwrap_or(path).to_path_buf();
            match load_item(path, &source, options) {
                Ok(item) => {
                    if let Err(err) = store.insert(item) {
                        errors.push(err);
                    }
                }
                Err(err) => errors.push(err),
            }
        }

        tracing::info!(
            "Loaded {} content items from {:?} ({} errors)",
            store.items.len(),
            root,
            errors.len()
        );

        Ok(ScanReport { store, errors })
    }

    /// Build a store from already parsed items, rejecting duplicate paths
    pub fn from_items<I>(root: &Path, extensions: &[String], items: I) -> Result<Self, ContentError>
    where
        I: IntoIterator<Item = ContentItem>,
    {
        let mut store = Self {
            root: root.to_path_buf(),
            extensions: extensions.to_vec(),
            items: BTreeMap::new(),
        };
        for item in items {
            store.insert(item)?;
        }
        Ok(store)
    }

    fn insert(&mut self, item: ContentItem) -> Result<(), ContentError> {
        match self.items.entry(item.path.clone()) {
            Entry::Occupied(existing) => Err(ContentError::DuplicatePath {
                path: item.path.to_string(),
                first: existing.get().source.clone(),
                second: item.source,
            }),
            Entry::Vacant(slot) => {
                slot.insert(item);
                Ok(())
            }
        }
    }

    /// Every item currently present
    ///
    /// Iteration follows path order; sort with the listing helpers for display.
    pub fn list_items(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.values()
    }

    /// Look up an item by identifier or file path
    pub fn read_item(&self, path: &str) -> Result<&ContentItem, ContentError> {
        ContentPath::parse(path, &self.extensions)
            .and_then(|p| self.items.get(&p))
            .ok_or_else(|| ContentError::NotFound {
                path: path.to_string(),
            })
    }

    pub fn get(&self, path: &ContentPath) -> Option<&ContentItem> {
        self.items.get(path)
    }

    pub fn contains(&self, path: &ContentPath) -> bool {
        self.items.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The content directory
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn load_item(
    path: &Path,
    source: &Path,
    options: &StoreOptions,
) -> Result<ContentItem, ContentError> {
    let text = fs::read_to_string(path).map_err(|e| ContentError::Io {
        file: source.to_path_buf(),
        source: e,
    })?;
    let item = ContentItem::parse(source, &text, &options.extensions, &options.parse)?;
    tracing::debug!("Parsed {:?} as {}", source, item.path);
    Ok(item)
}

/// Hidden entries and ignore-pattern matches are skipped, directories included
fn is_excluded(root: &Path, path: &Path, patterns: &[Pattern]) -> bool {
    let hidden = path
        .file_name()
        .and_then(OsStr::to_str)
        .map(|name| name.starts_with('.'))
        .unwrap_or(false);
    if hidden {
        return true;
    }

    let relative = path.strip_prefix(root).unwrap_or(path);
    patterns.iter().any(|p| p.matches_path(relative))
}

/// Check if a file has one of the content extensions, ignoring case
pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            extensions
                .iter()
                .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}
