//! Per-session record of every result set fetched, keyed by the exact query.

use crate::tvmaze::SearchMatch;
use indexmap::IndexMap;
use std::sync::Arc;

/// Results shared between the cache and whatever view is currently showing them.
pub type Results = Arc<[SearchMatch]>;

/// Mapping from each distinct query string to the result set last fetched for it.
///
/// Keys are never evicted. Writing a key again replaces its value wholesale but
/// keeps the key's original position, so iteration follows first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultCache {
    entries: IndexMap<String, Results>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: impl Into<String>, results: impl Into<Results>) {
        self.entries.insert(query.into(), results.into());
    }

    pub fn get(&self, query: &str) -> Option<&Results> {
        self.entries.get(query)
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.contains_key(query)
    }

    pub fn remove(&mut self, query: &str) -> Option<Results> {
        self.entries.shift_remove(query)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Results)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
