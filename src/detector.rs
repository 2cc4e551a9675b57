//! This module provides the set difference between what a source reports
//! as free right now and what is stored as free.

use std::{collections::HashSet, hash::Hash};

use crate::models::Game;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Retrieved but not stored.
    pub newly_free: Vec<Game>,
    /// Stored but no longer retrieved.
    pub no_longer_free: Vec<Game>,
}

impl Diff {
    pub fn is_empty(&self) -> bool {
        self.newly_free.is_empty() && self.no_longer_free.is_empty()
    }
}

/// Diffs by [`Game::identity`].
pub fn diff(retrieved: &[Game], stored: &[Game]) -> Diff {
    diff_by(retrieved, stored, Game::identity)
}

/// Diffs `retrieved` against `stored` where two games are the same listing
/// iff `key` maps them to equal values. Games found on both sides appear in
/// neither output. Output order follows the input, and duplicate keys in
/// `retrieved` are reported once.
///
/// Only call this with a successful retrieval: an empty `retrieved` marks
/// every stored game as no longer free.
pub fn diff_by<'a, K, F>(retrieved: &'a [Game], stored: &'a [Game], key: F) -> Diff
where
    K: Eq + Hash,
    F: Fn(&'a Game) -> K,
{
    let stored_keys = stored.iter().map(&key).collect::<HashSet<K>>();
    let retrieved_keys = retrieved.iter().map(&key).collect::<HashSet<K>>();

    let mut seen = HashSet::new();
    let newly_free = retrieved
        .iter()
        .filter(|game| {
            let k = key(*game);
            !stored_keys.contains(&k) && seen.insert(k)
        })
        .cloned()
        .collect();

    let no_longer_free = stored
        .iter()
        .filter(|game| !retrieved_keys.contains(&key(*game)))
        .cloned()
        .collect();

    Diff {
        newly_free,
        no_longer_free,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn game(link: &str, source_id: &str) -> Game {
        Game::new(format!("Game {link}"), link, source_id)
    }

    #[test]
    fn new_listing_is_newly_free() {
        let stored = [game("a", "epic")];
        let retrieved = [game("a", "epic"), game("b", "epic")];

        let actual = diff(&retrieved, &stored);

        assert_eq!(vec![game("b", "epic").link], links(&actual.newly_free));
        assert!(actual.no_longer_free.is_empty());
    }

    #[test]
    fn missing_listing_is_no_longer_free() {
        let stored = [game("a", "epic"), game("b", "epic")];
        let retrieved = [game("b", "epic")];

        let actual = diff(&retrieved, &stored);

        assert!(actual.newly_free.is_empty());
        assert_eq!(vec!["a".to_string()], links(&actual.no_longer_free));
    }

    #[test]
    fn still_free_listing_is_in_neither_side() {
        let stored = [game("a", "epic")];
        let mut renamed = game("a", "epic");
        renamed.name = "Renamed".to_string();

        let actual = diff(&[renamed], &stored);

        assert!(actual.is_empty(), "{actual:?}");
    }

    #[test]
    fn same_link_from_other_source_is_different_listing() {
        let stored = [game("a", "epic")];
        let retrieved = [game("a", "humble")];

        let actual = diff(&retrieved, &stored);

        assert_eq!(1, actual.newly_free.len());
        assert_eq!(1, actual.no_longer_free.len());
    }

    #[test]
    fn duplicate_retrieved_listings_are_reported_once() {
        let retrieved = [game("a", "epic"), game("a", "epic")];

        let actual = diff(&retrieved, &[]);

        assert_eq!(vec!["a".to_string()], links(&actual.newly_free));
    }

    #[test]
    fn diff_is_idempotent() {
        let stored = [game("a", "epic"), game("c", "epic")];
        let retrieved = [game("b", "epic"), game("a", "epic")];

        assert_eq!(diff(&retrieved, &stored), diff(&retrieved, &stored));
    }

    #[test]
    fn diff_by_uses_given_identity() {
        let stored = [game("a", "epic")];
        let retrieved = [game("a", "steam")];

        // Link-only identity treats both as the same listing.
        let actual = diff_by(&retrieved, &stored, |g| g.link.as_str());

        assert!(actual.is_empty(), "{actual:?}");
    }

    fn links(games: &[Game]) -> Vec<String> {
        games.iter().map(|g| g.link.clone()).collect()
    }
}
