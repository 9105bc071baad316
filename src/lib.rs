//! postshelf: content store for a front-matter blog
//!
//! This crate reads blog posts (a metadata block followed by a markup body),
//! validates them, and exposes them to a renderer through a small store API.
//! It also carries the authoring commands behind the `postshelf` binary.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::Path;

use content::{ContentStore, ScanReport};

/// A blog site rooted at a base directory
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory
    pub content_dir: std::path::PathBuf,
}

impl Site {
    /// Open a site from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Load the content store, failing on the first authoring error
    pub fn store(&self) -> Result<ContentStore> {
        let options = self.config.store_options()?;
        Ok(ContentStore::load(&self.content_dir, &options)?)
    }

    /// Load the content store, collecting every authoring error
    pub fn scan(&self) -> Result<ScanReport> {
        let options = self.config.store_options()?;
        Ok(ContentStore::scan(&self.content_dir, &options)?)
    }

    /// Create a new draft
    pub fn new_item(&self, title: &str, section: Option<&str>) -> Result<std::path::PathBuf> {
        commands::new::create_item(self, title, section, None)
    }
}
