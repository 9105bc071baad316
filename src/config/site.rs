//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::{ListingOptions, ParseOptions, StoreOptions};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    pub content_dir: String,
    pub default_section: String,

    // Reading
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignore: Vec<String>,
    /// IANA zone for timestamps written without an offset; empty means none
    pub timezone: String,

    // Listing
    pub build_drafts: bool,
    pub build_future: bool,

    // Date format (strftime)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),

            content_dir: "content".to_string(),
            default_section: "posts".to_string(),

            extensions: vec!["md".to_string(), "markdown".to_string()],
            ignore: Vec::new(),
            timezone: String::new(),

            build_drafts: false,
            build_future: false,

            date_format: "%Y-%m-%d".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// Reject settings that would only fail once content is displayed
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!(
                "`date_format` {:?} is not a valid strftime pattern",
                self.date_format
            );
        }
        Ok(())
    }

    /// The configured timezone, if any
    pub fn timezone(&self) -> Result<Option<Tz>> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(None);
        }
        name.parse::<Tz>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Unknown timezone {:?}: {}", name, e))
    }

    /// How the content store should read files
    pub fn store_options(&self) -> Result<StoreOptions> {
        self.validate()?;

        let extensions = self
            .extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if extensions.is_empty() {
            anyhow::bail!("`extensions` must name at least one file extension");
        }

        Ok(StoreOptions {
            extensions,
            ignore: self.ignore.clone(),
            parse: ParseOptions {
                timezone: self.timezone()?,
            },
        })
    }

    /// Listing filters implied by the build settings
    pub fn listing_options(&self) -> ListingOptions {
        ListingOptions::public()
            .with_drafts(self.build_drafts)
            .with_future(self.build_future)
    }
}
