//! Tiered resolution of the current query against previously fetched results.
//!
//! While the fetch for the current query is pending, a related result set can
//! stand in for it:
//!
//! 1. **Exact**: the current query itself was fetched.
//! 2. **Prefix extension**: longer queries starting with the current one were
//!    fetched. Under prefix search their hits also match the current query, so
//!    the union is a correct (partial) answer.
//! 3. **Prefix reduction**: a shorter prefix of the current query was fetched.
//!    Its hits are a superset of the answer; only the longest such prefix is
//!    used, unmodified.
//! 4. **No match**: nothing related is cached.

use crate::client::results::{ResultCache, Results};
use crate::tvmaze::SearchMatch;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionKind {
    ExactMatch,
    PrefixExtension,
    PrefixReduction,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    ExactMatch(Results),
    PrefixExtension(Results),
    PrefixReduction(Results),
    NoMatch,
}

impl Resolution {
    pub fn kind(&self) -> ResolutionKind {
        match self {
            Resolution::ExactMatch(_) => ResolutionKind::ExactMatch,
            Resolution::PrefixExtension(_) => ResolutionKind::PrefixExtension,
            Resolution::PrefixReduction(_) => ResolutionKind::PrefixReduction,
            Resolution::NoMatch => ResolutionKind::NoMatch,
        }
    }

    pub fn results(&self) -> Option<&Results> {
        match self {
            Resolution::ExactMatch(results)
            | Resolution::PrefixExtension(results)
            | Resolution::PrefixReduction(results) => Some(results),
            Resolution::NoMatch => None,
        }
    }

    /// A non-empty query is still loading until its own results arrive.
    pub fn is_loading(&self, query: &str) -> bool {
        !query.is_empty() && self.kind() != ResolutionKind::ExactMatch
    }
}

/// Pick the result set to display for `query`.
pub fn resolve(query: &str, cache: &ResultCache) -> Resolution {
    if let Some(results) = cache.get(query) {
        return Resolution::ExactMatch(results.clone());
    }
    if cache.is_empty() {
        return Resolution::NoMatch;
    }

    let mut extensions = cache
        .iter()
        .filter(|(key, _)| key.starts_with(query))
        .peekable();
    if extensions.peek().is_some() {
        let merged = dedup_by_show(extensions.flat_map(|(_, results)| results.iter()));
        return Resolution::PrefixExtension(merged.into());
    }

    match longest_cached_prefix(query, cache) {
        Some(results) => Resolution::PrefixReduction(results.clone()),
        None => Resolution::NoMatch,
    }
}

/// Strict prefixes of `query`, one character shorter at a time down to a single
/// character; the first cached one wins.
fn longest_cached_prefix<'a>(query: &str, cache: &'a ResultCache) -> Option<&'a Results> {
    query
        .char_indices()
        .rev()
        .filter(|(end, _)| *end > 0)
        .map(|(end, _)| &query[..end])
        .find_map(|prefix| cache.get(prefix))
}

/// Keep the first occurrence of each show.
fn dedup_by_show<'a>(matches: impl Iterator<Item = &'a SearchMatch>) -> Vec<SearchMatch> {
    let mut seen = HashSet::new();
    matches
        .filter(|m| seen.insert(m.id()))
        .cloned()
        .collect()
}
