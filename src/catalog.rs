//! Browsing helpers: search, tag filtering and ordering of teardowns.

use crate::models::TeardownRecord;
use std::collections::BTreeSet;

/// Sort order for the record list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Alphabetical by name
    Name,
    /// Alphabetical by market
    Market,
    /// Lexical by duration text
    Duration,
    /// Most recently created first; undated records last
    Newest,
}

/// Filter applied before analytics.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Case-insensitive substring matched against name, market and short
    /// description.
    pub search: Option<String>,
    /// Exact tag the record must carry.
    pub tag: Option<String>,
}

impl CatalogFilter {
    /// Whether a record passes both the search and the tag filter.
    pub fn matches(&self, record: &TeardownRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                [&record.name, &record.market, &record.short_description]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            _ => true,
        };

        let matches_tag = match self.tag.as_deref() {
            Some(tag) => record.tags.iter().any(|t| t == tag),
            None => true,
        };

        matches_search && matches_tag
    }

    /// True when no filter criteria are set.
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty()) && self.tag.is_none()
    }
}

/// Apply a filter and an optional ordering, returning a new list.
///
/// Without an ordering the store order is kept.
pub fn select(
    records: &[TeardownRecord],
    filter: &CatalogFilter,
    order: Option<SortOrder>,
) -> Vec<TeardownRecord> {
    let mut selected: Vec<TeardownRecord> = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();

    if let Some(order) = order {
        sort_records(&mut selected, order);
    }
    selected
}

/// Sort records in place. The sort is stable.
pub fn sort_records(records: &mut [TeardownRecord], order: SortOrder) {
    match order {
        SortOrder::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
        SortOrder::Market => records.sort_by(|a, b| a.market.cmp(&b.market)),
        SortOrder::Duration => records.sort_by(|a, b| a.duration.cmp(&b.duration)),
        SortOrder::Newest => records.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Every distinct tag across the collection, sorted.
pub fn all_tags(records: &[TeardownRecord]) -> Vec<String> {
    records
        .iter()
        .flat_map(|r| r.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
