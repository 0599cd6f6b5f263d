//! Grouping of the displayed results by genre.

use crate::tvmaze::SearchMatch;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// A genre bucket. Shows without any genre land in [`GenreKey::Uncategorized`],
/// which can never collide with a real label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenreKey {
    Genre(String),
    Uncategorized,
}

impl GenreKey {
    pub fn genre(label: impl Into<String>) -> Self {
        Self::Genre(label.into())
    }

    /// Whether `m` survives a filter on this key.
    pub fn admits(&self, m: &SearchMatch) -> bool {
        match self {
            GenreKey::Uncategorized => m.show.genres.is_empty(),
            GenreKey::Genre(label) => m.show.has_genre(label),
        }
    }
}

impl fmt::Display for GenreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreKey::Genre(label) => f.write_str(label),
            GenreKey::Uncategorized => f.write_str("Uncategorized"),
        }
    }
}

/// Genre → matches carrying it, with genres in first-seen order and matches
/// in result order. Built whole from a result set and never patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreIndex {
    groups: IndexMap<GenreKey, Vec<SearchMatch>>,
}

impl GenreIndex {
    pub fn get(&self, key: &GenreKey) -> Option<&[SearchMatch]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &GenreKey) -> bool {
        self.groups.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &GenreKey> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GenreKey, &[SearchMatch])> {
        self.groups.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn build_index(results: &[SearchMatch]) -> GenreIndex {
    let mut groups: IndexMap<GenreKey, Vec<SearchMatch>> = IndexMap::new();
    let mut placed: HashSet<(GenreKey, u64)> = HashSet::new();

    for m in results {
        let keys: Vec<GenreKey> = if m.show.genres.is_empty() {
            vec![GenreKey::Uncategorized]
        } else {
            m.show.genres.iter().cloned().map(GenreKey::Genre).collect()
        };
        for key in keys {
            if placed.insert((key.clone(), m.id())) {
                groups.entry(key).or_default().push(m.clone());
            }
        }
    }

    GenreIndex { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{hit, ids};

    #[test]
    fn empty_results_give_empty_index() {
        assert!(build_index(&[]).is_empty());
    }

    #[test]
    fn shows_are_filed_under_every_genre() {
        let results = vec![
            hit(1, &["Drama", "Crime"]),
            hit(2, &["Crime"]),
            hit(3, &[]),
            hit(4, &["Drama"]),
        ];
        let index = build_index(&results);

        let keys: Vec<_> = index.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                GenreKey::genre("Drama"),
                GenreKey::genre("Crime"),
                GenreKey::Uncategorized
            ]
        );
        assert_eq!(ids(index.get(&GenreKey::genre("Drama")).unwrap()), vec![1, 4]);
        assert_eq!(ids(index.get(&GenreKey::genre("Crime")).unwrap()), vec![1, 2]);
        assert_eq!(ids(index.get(&GenreKey::Uncategorized).unwrap()), vec![3]);
    }

    #[test]
    fn every_result_is_accounted_for() {
        let results = vec![hit(1, &["A", "B"]), hit(2, &[]), hit(3, &["B"]), hit(4, &[])];
        let index = build_index(&results);

        for m in &results {
            let homes: Vec<_> = index
                .iter()
                .filter(|(_, group)| group.iter().any(|g| g.id() == m.id()))
                .map(|(k, _)| k.clone())
                .collect();
            if m.show.genres.is_empty() {
                assert_eq!(homes, vec![GenreKey::Uncategorized]);
            } else {
                assert_eq!(homes.len(), m.show.genres.len());
                assert!(homes.iter().all(|k| k.admits(m)));
            }
        }
    }

    #[test]
    fn no_match_appears_twice_under_one_key() {
        let results = vec![hit(1, &["Drama", "Drama"]), hit(1, &["Drama"]), hit(2, &[]), hit(2, &[])];
        let index = build_index(&results);
        assert_eq!(ids(index.get(&GenreKey::genre("Drama")).unwrap()), vec![1]);
        assert_eq!(ids(index.get(&GenreKey::Uncategorized).unwrap()), vec![2]);
    }

    #[test]
    fn literal_uncategorized_genre_stays_distinct() {
        let results = vec![hit(1, &["Uncategorized"]), hit(2, &[])];
        let index = build_index(&results);
        assert_eq!(index.len(), 2);
        assert_eq!(ids(index.get(&GenreKey::genre("Uncategorized")).unwrap()), vec![1]);
        assert_eq!(ids(index.get(&GenreKey::Uncategorized).unwrap()), vec![2]);
    }
}
