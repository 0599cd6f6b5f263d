//! The client's single owner of search state and the views derived from it.

use crate::client::genres::{GenreIndex, GenreKey, build_index};
use crate::client::matcher::{Resolution, ResolutionKind, resolve};
use crate::client::results::{ResultCache, Results};
use crate::client::selection::Selection;
use crate::tvmaze::{SearchMatch, ShowId};
use std::sync::Arc;

/// Everything a presentation layer needs to render one frame.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub query: String,
    pub resolution: Resolution,
    pub genres: Arc<GenreIndex>,
    /// Shows of the selected genre, in result order.
    pub genre_shows: Vec<SearchMatch>,
    pub displayed: Option<SearchMatch>,
    pub loading: bool,
    /// Genre choice is disabled while an approximate superset is shown.
    pub genres_enabled: bool,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    results: ResultCache,
    selection: Selection,
    /// Genre index of the last displayed result set, reused while that set is unchanged.
    indexed: Option<(Results, Arc<GenreIndex>)>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Set the raw input text. Returns the trimmed query when it changed and a
    /// fetch should be scheduled for it.
    pub fn set_input(&mut self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed == self.query {
            return None;
        }
        self.query = trimmed.to_owned();
        Some(self.query.clone())
    }

    /// Record a completed fetch. `query` is the query that was fetched, which
    /// may no longer be the current one.
    pub fn record_results(&mut self, query: String, results: Vec<SearchMatch>) {
        self.results.insert(query, results);
    }

    pub fn results(&self) -> &ResultCache {
        &self.results
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn select_genre(&mut self, genre: GenreKey) {
        self.selection.select_genre(genre);
    }

    pub fn select_show(&mut self, id: ShowId) {
        self.selection.select_show(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn resolution(&self) -> Resolution {
        resolve(&self.query, &self.results)
    }

    pub fn view(&mut self) -> SearchView {
        let resolution = self.resolution();
        let genres = self.genre_index(resolution.results());
        let results = resolution.results().map(|r| &r[..]);

        let genre_shows = self
            .selection
            .genre
            .as_ref()
            .and_then(|genre| genres.get(genre))
            .map(<[SearchMatch]>::to_vec)
            .unwrap_or_default();
        let displayed = self.selection.reconcile(results).cloned();

        SearchView {
            loading: resolution.is_loading(&self.query),
            genres_enabled: resolution.kind() != ResolutionKind::PrefixReduction,
            query: self.query.clone(),
            genres,
            genre_shows,
            displayed,
            resolution,
        }
    }

    /// Rebuild the index only when the displayed result set is a different one.
    fn genre_index(&mut self, results: Option<&Results>) -> Arc<GenreIndex> {
        let Some(results) = results else {
            self.indexed = None;
            return Arc::new(GenreIndex::default());
        };
        if let Some((indexed, index)) = &self.indexed
            && Arc::ptr_eq(indexed, results)
        {
            return index.clone();
        }
        let index = Arc::new(build_index(results));
        self.indexed = Some((results.clone(), index.clone()));
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{hit, ids};

    #[test]
    fn input_is_trimmed_and_deduplicated() {
        let mut session = SearchSession::new();
        assert_eq!(session.set_input("  bat "), Some("bat".to_owned()));
        assert_eq!(session.set_input("bat   "), None);
        assert_eq!(session.set_input(""), Some(String::new()));
    }

    #[test]
    fn initial_empty_query_is_not_loading() {
        let mut session = SearchSession::new();
        let view = session.view();
        assert_eq!(view.resolution, Resolution::NoMatch);
        assert!(!view.loading);
        assert!(view.genres.is_empty());
    }

    #[test]
    fn typing_ahead_shows_shorter_results_non_interactively() {
        let mut session = SearchSession::new();
        session.record_results("bat".into(), vec![hit(1, &["Action"]), hit(2, &[])]);
        session.set_input("batm");

        let view = session.view();
        assert_eq!(view.resolution.kind(), ResolutionKind::PrefixReduction);
        assert!(view.loading);
        assert!(!view.genres_enabled);
        assert_eq!(view.genres.len(), 2);

        session.record_results("batm".into(), vec![hit(1, &["Action"])]);
        let view = session.view();
        assert_eq!(view.resolution.kind(), ResolutionKind::ExactMatch);
        assert!(!view.loading);
        assert!(view.genres_enabled);
        assert_eq!(view.genres.len(), 1);
    }

    #[test]
    fn selection_survives_transient_result_sets() {
        let mut session = SearchSession::new();
        session.record_results("batman".into(), vec![hit(1, &["Action"]), hit(2, &["Drama"])]);
        session.record_results("batwoman".into(), vec![hit(3, &["Drama"])]);
        session.set_input("batman");
        session.select_genre(GenreKey::genre("Drama"));
        session.select_show(2);

        let view = session.view();
        assert_eq!(view.displayed.as_ref().map(|m| m.id()), Some(2));
        assert_eq!(ids(&view.genre_shows), vec![2]);

        session.set_input("batwoman");
        assert!(session.view().displayed.is_none());
        assert_eq!(session.selection().show_id, Some(2));

        session.set_input("batman");
        assert_eq!(session.view().displayed.map(|m| m.id()), Some(2));
    }

    #[test]
    fn genre_index_is_reused_for_the_same_result_set() {
        let mut session = SearchSession::new();
        session.record_results("bat".into(), vec![hit(1, &["Action"])]);
        session.set_input("bat");

        let first = session.view().genres;
        let second = session.view().genres;
        assert!(Arc::ptr_eq(&first, &second));

        session.record_results("bat".into(), vec![hit(1, &["Action"])]);
        let third = session.view().genres;
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(*first, *third);
    }
}
