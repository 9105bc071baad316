//! List content items

use anyhow::Result;
use chrono::Utc;

use super::display_date;
use crate::config::SiteConfig;
use crate::content::{listing, ContentItem, ListingOptions};
use crate::Site;

/// List items newest first, as text or JSON
pub fn run(site: &Site, options: &ListingOptions, json: bool) -> Result<()> {
    let store = site.store()?;
    let items = listing(store.list_items(), options, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        print!("{}", format_listing(&site.config, &items));
    }

    Ok(())
}

fn format_listing(config: &SiteConfig, items: &[&ContentItem]) -> String {
    let mut out = format!("Items ({}):\n", items.len());
    for item in items {
        out.push_str(&format!(
            "  {} - {} [{}]{}\n",
            display_date(config, &item.date),
            item.title,
            item.path,
            if item.draft { " (draft)" } else { "" }
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;
    use std::path::Path;

    #[test]
    fn test_format_listing_demo_site() {
        let site = Site::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/blog")).unwrap();
        let store: ContentStore = site.store().unwrap();
        let options = site.config.listing_options().with_drafts(true);
        let items = listing(store.list_items(), &options, Utc::now());

        let text = format_listing(&site.config, &items);
        assert_eq!(
            text,
            "Items (2):\n  \
             10 Apr 2022 - Closures by Example [posts/closures] (draft)\n  \
             28 Mar 2022 - MVP Tips [posts/mvp-tips]\n"
        );
    }
}
