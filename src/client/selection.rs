//! The user's genre/show choice and its lazy revalidation against the live results.
//!
//! Selections are never cleared when the results or genre change. Instead every
//! render asks [`reconcile`] whether the chosen show is still visible, so the
//! choice reappears once a result set containing it is displayed again.

use crate::client::genres::GenreKey;
use crate::tvmaze::{SearchMatch, ShowId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub genre: Option<GenreKey>,
    pub show_id: Option<ShowId>,
}

impl Selection {
    pub fn select_genre(&mut self, genre: GenreKey) {
        self.genre = Some(genre);
    }

    pub fn select_show(&mut self, id: ShowId) {
        self.show_id = Some(id);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn reconcile<'a>(&self, results: Option<&'a [SearchMatch]>) -> Option<&'a SearchMatch> {
        reconcile(self.show_id, self.genre.as_ref(), results)
    }
}

/// The show to display for the current selection, or `None` if it is not
/// part of `results` or is filtered out by the active genre.
pub fn reconcile<'a>(
    show_id: Option<ShowId>,
    genre: Option<&GenreKey>,
    results: Option<&'a [SearchMatch]>,
) -> Option<&'a SearchMatch> {
    let (show_id, results) = (show_id?, results?);
    let selected = results.iter().find(|m| m.id() == show_id)?;
    match genre {
        Some(genre) if !genre.admits(selected) => None,
        _ => Some(selected),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::hit;

    #[test]
    fn nothing_selected_or_nothing_loaded() {
        let results = vec![hit(1, &[])];
        assert!(reconcile(None, None, Some(&results[..])).is_none());
        assert!(reconcile(Some(1), None, None).is_none());
    }

    #[test]
    fn show_outside_results_is_hidden_then_resurfaces() {
        let mut selection = Selection::default();
        selection.select_show(2);

        let with_show = vec![hit(1, &[]), hit(2, &["Action"])];
        let without_show = vec![hit(1, &[])];

        assert_eq!(selection.reconcile(Some(&with_show[..])).map(|m| m.id()), Some(2));
        assert!(selection.reconcile(Some(&without_show[..])).is_none());
        // Selection itself is untouched, so restoring the results restores the show.
        assert_eq!(selection.show_id, Some(2));
        assert_eq!(selection.reconcile(Some(&with_show[..])).map(|m| m.id()), Some(2));
    }

    #[test]
    fn genre_filter_applies_to_categorized_shows() {
        let results = vec![hit(1, &["Drama", "Crime"])];
        let crime = GenreKey::genre("Crime");
        let comedy = GenreKey::genre("Comedy");
        assert!(reconcile(Some(1), Some(&crime), Some(&results[..])).is_some());
        assert!(reconcile(Some(1), Some(&comedy), Some(&results[..])).is_none());
        assert!(reconcile(Some(1), Some(&GenreKey::Uncategorized), Some(&results[..])).is_none());
    }

    #[test]
    fn uncategorized_shows_only_pass_the_uncategorized_filter() {
        let results = vec![hit(3, &[])];
        assert!(reconcile(Some(3), Some(&GenreKey::Uncategorized), Some(&results[..])).is_some());
        assert!(reconcile(Some(3), Some(&GenreKey::genre("Drama")), Some(&results[..])).is_none());
        assert!(reconcile(Some(3), None, Some(&results[..])).is_some());
    }

    #[test]
    fn clear_resets_both_fields() {
        let mut selection = Selection::default();
        selection.select_genre(GenreKey::Uncategorized);
        selection.select_show(9);
        selection.clear();
        assert_eq!(selection, Selection::default());
    }
}
