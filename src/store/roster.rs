//! Roster store interface and in-memory implementation

use crate::types::{Participant, ParticipantId};
use std::collections::BTreeMap;

/// Keyed access to participants
///
/// Mutation takes `&mut self`, so holding a mutable borrow is what grants the
/// single writer its exclusivity.
pub trait RosterStore: Send + Sync {
    /// Look up a participant by id
    fn find(&self, id: ParticipantId) -> Option<Participant>;

    /// Insert or replace a participant
    fn upsert(&mut self, participant: Participant);

    /// Remove a participant, returning it if it was present
    fn remove(&mut self, id: ParticipantId) -> Option<Participant>;

    /// Snapshot of every participant, ordered by id
    fn iterate(&self) -> Vec<Participant>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory roster keyed by participant id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryRoster {
    participants: BTreeMap<ParticipantId, Participant>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrowing lookup, avoiding the clone `find` makes
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    pub fn values(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }
}

impl FromIterator<Participant> for InMemoryRoster {
    fn from_iter<I: IntoIterator<Item = Participant>>(iter: I) -> Self {
        Self {
            participants: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

impl RosterStore for InMemoryRoster {
    fn find(&self, id: ParticipantId) -> Option<Participant> {
        self.participants.get(&id).cloned()
    }

    fn upsert(&mut self, participant: Participant) {
        self.participants.insert(participant.id, participant);
    }

    fn remove(&mut self, id: ParticipantId) -> Option<Participant> {
        self.participants.remove(&id)
    }

    fn iterate(&self) -> Vec<Participant> {
        self.participants.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.participants.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut roster = InMemoryRoster::new();
        assert!(roster.is_empty());
        assert!(roster.find(1).is_none());

        roster.upsert(Participant::new(1, "alice", 1500.0));
        roster.upsert(Participant::new(2, "bob", 1400.0));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.find(1).unwrap().name, "alice");

        // Upsert replaces in place
        roster.upsert(Participant::new(1, "alice", 1550.0));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get(1).unwrap().rating, 1550.0);

        assert!(roster.remove(1).is_some());
        assert!(roster.remove(1).is_none());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_iterate_is_ordered_by_id() {
        let roster: InMemoryRoster = [
            Participant::new(30, "c", 1.0),
            Participant::new(10, "a", 1.0),
            Participant::new(20, "b", 1.0),
        ]
        .into_iter()
        .collect();

        let ids: Vec<u64> = roster.iterate().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }
}
