//! Listing conventions shared with the renderer

use chrono::{DateTime, Utc};

use super::ContentItem;

/// Which items a listing keeps
#[derive(Debug, Clone, Default)]
pub struct ListingOptions {
    /// Keep items marked `draft: true`
    pub include_drafts: bool,
    /// Keep items dated after `now`
    pub include_future: bool,
    /// Keep at most this many items after sorting
    pub limit: Option<usize>,
}

impl ListingOptions {
    /// The public listing: no drafts, nothing scheduled
    pub fn public() -> Self {
        Self::default()
    }

    pub fn with_drafts(mut self, include: bool) -> Self {
        self.include_drafts = include;
        self
    }

    pub fn with_future(mut self, include: bool) -> Self {
        self.include_future = include;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Whether an item passes the draft and future filters
    pub fn admits(&self, item: &ContentItem, now: DateTime<Utc>) -> bool {
        (self.include_drafts || !item.draft) && (self.include_future || item.date <= now)
    }
}

/// Sort newest first, ties broken by path so any input order gives one result
pub fn sort_by_date_desc(items: &mut [&ContentItem]) {
    items.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));
}

/// Filter, sort and truncate items for display
pub fn listing<'a, I>(items: I, options: &ListingOptions, now: DateTime<Utc>) -> Vec<&'a ContentItem>
where
    I: IntoIterator<Item = &'a ContentItem>,
{
    let mut selected: Vec<&ContentItem> = items
        .into_iter()
        .filter(|item| options.admits(item, now))
        .collect();

    sort_by_date_desc(&mut selected);

    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }

    selected
}
