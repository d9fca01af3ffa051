//! Dense user indexing.
//!
//! Training works on contiguous `usize` indices rather than raw user id
//! strings. [`UserIndex`] assigns each distinct user id the next free index
//! in order of first appearance and keeps the mapping bijective for the
//! lifetime of a run, so results can be translated back to external ids.

use ahash::AHashMap;

use crate::error::{GamerecError, Result};
use crate::inventory::RawInventoryRecord;

/// Bijective mapping between external user ids and dense indices.
#[derive(Debug, Clone, Default)]
pub struct UserIndex {
    by_id: AHashMap<String, usize>,
    by_index: Vec<String>,
}

impl UserIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index over the user ids of a record slice, in input order.
    ///
    /// Duplicate ids collapse onto the index assigned at first appearance.
    pub fn from_records(records: &[RawInventoryRecord]) -> Self {
        let mut index = UserIndex::new();
        for record in records {
            index.insert(&record.user_id);
        }
        index
    }

    /// Returns the index for a user id, assigning the next free one if the
    /// id has not been seen before.
    pub fn insert(&mut self, user_id: &str) -> usize {
        if let Some(&idx) = self.by_id.get(user_id) {
            return idx;
        }
        let idx = self.by_index.len();
        self.by_id.insert(user_id.to_string(), idx);
        self.by_index.push(user_id.to_string());
        idx
    }

    /// Looks up the index assigned to a user id.
    pub fn index_of(&self, user_id: &str) -> Result<usize> {
        self.by_id
            .get(user_id)
            .copied()
            .ok_or_else(|| GamerecError::lookup(format!("unknown user id '{user_id}'")))
    }

    /// Looks up the user id assigned to an index.
    pub fn user_id_of(&self, index: usize) -> Result<&str> {
        self.by_index
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| GamerecError::lookup(format!("no user at index {index}")))
    }

    /// Number of distinct users indexed.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Returns true if no users have been indexed.
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Iterates over `(index, user_id)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_index
            .iter()
            .enumerate()
            .map(|(idx, id)| (idx, id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: &str) -> RawInventoryRecord {
        RawInventoryRecord {
            user_id: user_id.to_string(),
            games: None,
        }
    }

    #[test]
    fn test_first_appearance_order() {
        let records = vec![record("carol"), record("alice"), record("bob")];
        let index = UserIndex::from_records(&records);

        assert_eq!(index.len(), 3);
        assert_eq!(index.index_of("carol").unwrap(), 0);
        assert_eq!(index.index_of("alice").unwrap(), 1);
        assert_eq!(index.index_of("bob").unwrap(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let records = vec![record("alice"), record("bob"), record("alice")];
        let index = UserIndex::from_records(&records);

        assert_eq!(index.len(), 2);
        assert_eq!(index.index_of("alice").unwrap(), 0);
        assert_eq!(index.index_of("bob").unwrap(), 1);
    }

    #[test]
    fn test_round_trip() {
        let ids = ["a", "b", "c", "d", "e"];
        let mut index = UserIndex::new();
        for id in &ids {
            index.insert(id);
        }

        for (expected_idx, id) in ids.iter().enumerate() {
            let idx = index.index_of(id).unwrap();
            assert_eq!(idx, expected_idx);
            assert_eq!(index.user_id_of(idx).unwrap(), *id);
        }
    }

    #[test]
    fn test_unknown_lookups_fail() {
        let index = UserIndex::from_records(&[record("alice")]);

        assert!(matches!(
            index.index_of("dave"),
            Err(GamerecError::Lookup(_))
        ));
        assert!(matches!(
            index.user_id_of(99),
            Err(GamerecError::Lookup(_))
        ));
    }

    #[test]
    fn test_iter_in_index_order() {
        let index = UserIndex::from_records(&[record("x"), record("y")]);
        let pairs: Vec<(usize, &str)> = index.iter().collect();
        assert_eq!(pairs, vec![(0, "x"), (1, "y")]);
    }
}
