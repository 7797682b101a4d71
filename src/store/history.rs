//! Match history interface and in-memory implementation
//!
//! History is kept in insertion order. Replays use chronological order
//! instead, which [`chronological_order`] derives with a stable sort.

use crate::error::StoreError;
use crate::types::MatchRecord;
use std::collections::BTreeSet;

/// Ordered list of matches with an editable tail
pub trait MatchHistory: Send + Sync {
    /// Append a match, returning its index
    fn append(&mut self, record: MatchRecord) -> usize;

    fn get(&self, index: usize) -> Option<&MatchRecord>;

    /// Replace the winner set of a match, returning the previous one
    fn set_winner(
        &mut self,
        index: usize,
        winners: BTreeSet<usize>,
    ) -> Result<BTreeSet<usize>, StoreError>;

    /// Remove a match, shifting later indices down
    fn delete(&mut self, index: usize) -> Result<MatchRecord, StoreError>;

    /// Put a match back at `index`, shifting later indices up
    fn insert(&mut self, index: usize, record: MatchRecord) -> Result<(), StoreError>;

    /// All matches in insertion order
    fn records(&self) -> &[MatchRecord];

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All matches oldest first; equal timestamps keep insertion order
    fn iterate_chronological(&self) -> Vec<MatchRecord> {
        let records = self.records();
        chronological_order(records)
            .into_iter()
            .map(|i| records[i].clone())
            .collect()
    }
}

/// Indices of `records` sorted by timestamp, ties broken by position
pub fn chronological_order(records: &[MatchRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| records[i].timestamp);
    order
}

/// Vector-backed match history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryHistory {
    records: Vec<MatchRecord>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.records.len() {
            return Err(StoreError::MatchNotFound {
                index,
                len: self.records.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<MatchRecord>> for InMemoryHistory {
    fn from(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }
}

impl MatchHistory for InMemoryHistory {
    fn append(&mut self, record: MatchRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    fn get(&self, index: usize) -> Option<&MatchRecord> {
        self.records.get(index)
    }

    fn set_winner(
        &mut self,
        index: usize,
        winners: BTreeSet<usize>,
    ) -> Result<BTreeSet<usize>, StoreError> {
        self.check_index(index)?;

        let record = &mut self.records[index];
        let team_count = record.teams.len();
        if let Some(&bad) = winners.iter().find(|&&w| w >= team_count) {
            return Err(StoreError::InvalidWinnerIndex {
                index: bad,
                team_count,
            });
        }

        Ok(std::mem::replace(&mut record.winning_teams, winners))
    }

    fn delete(&mut self, index: usize) -> Result<MatchRecord, StoreError> {
        self.check_index(index)?;
        Ok(self.records.remove(index))
    }

    fn insert(&mut self, index: usize, record: MatchRecord) -> Result<(), StoreError> {
        if index > self.records.len() {
            return Err(StoreError::MatchNotFound {
                index,
                len: self.records.len(),
            });
        }
        self.records.insert(index, record);
        Ok(())
    }

    fn records(&self) -> &[MatchRecord] {
        &self.records
    }
}
