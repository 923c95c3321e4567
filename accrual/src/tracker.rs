//! Per-participant accrual windows and per-(participant, policy) settlement cursors.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use ubi_types::{Address, PolicyId, Timestamp};

/// Eligibility state for a single participant.
///
/// `accruing_since == None` is the NotAccruing state; `Some(t)` means the
/// participant has been accruing since `t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantState {
    pub accruing_since: Option<Timestamp>,
}

impl ParticipantState {
    pub fn is_accruing(&self) -> bool {
        self.accruing_since.is_some()
    }
}

/// Tracks who is accruing and how far each participant has been paid under
/// each policy.
///
/// Cursors only move forward. They survive a participant leaving and
/// re-entering the accruing state, so intervals already paid are never
/// paid twice.
#[derive(Clone, Debug, Default)]
pub struct AccrualWindowTracker {
    participants: HashMap<Address, ParticipantState>,
    cursors: HashMap<Address, BTreeMap<PolicyId, Timestamp>>,
}

impl AccrualWindowTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accruing_since(&self, participant: &Address) -> Option<Timestamp> {
        self.participants
            .get(participant)
            .and_then(|s| s.accruing_since)
    }

    pub fn is_accruing(&self, participant: &Address) -> bool {
        self.accruing_since(participant).is_some()
    }

    /// Enter the Accruing state at `now`.
    pub fn start(&mut self, participant: &Address, now: Timestamp) {
        self.participants
            .entry(participant.clone())
            .or_default()
            .accruing_since = Some(now);
    }

    /// Return to the NotAccruing state. Cursors are kept.
    pub fn stop(&mut self, participant: &Address) {
        if let Some(state) = self.participants.get_mut(participant) {
            state.accruing_since = None;
        }
    }

    /// The instant through which `participant` has been paid under `policy`,
    /// `None` if never settled.
    pub fn last_settled(&self, participant: &Address, policy: PolicyId) -> Option<Timestamp> {
        self.cursors
            .get(participant)
            .and_then(|c| c.get(&policy))
            .copied()
    }

    /// Move a cursor forward to `to`. A cursor never moves backwards; the
    /// resulting position is returned.
    pub fn advance_cursor(
        &mut self,
        participant: &Address,
        policy: PolicyId,
        to: Timestamp,
    ) -> Timestamp {
        let cursor = self
            .cursors
            .entry(participant.clone())
            .or_default()
            .entry(policy)
            .or_insert(to);
        if to > *cursor {
            *cursor = to;
        }
        *cursor
    }

    pub fn participants(&self) -> impl Iterator<Item = (&Address, &ParticipantState)> {
        self.participants.iter()
    }

    pub fn cursors(&self) -> impl Iterator<Item = (&Address, PolicyId, Timestamp)> {
        self.cursors
            .iter()
            .flat_map(|(addr, c)| c.iter().map(move |(id, t)| (addr, *id, *t)))
    }

    pub(crate) fn restore_participant(&mut self, participant: Address, state: ParticipantState) {
        self.participants.insert(participant, state);
    }

    pub(crate) fn restore_cursor(&mut self, participant: Address, policy: PolicyId, at: Timestamp) {
        self.cursors.entry(participant).or_default().insert(policy, at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::new("ubi_alice")
    }

    #[test]
    fn unknown_participant_is_not_accruing() {
        let t = AccrualWindowTracker::new();
        assert!(!t.is_accruing(&alice()));
        assert_eq!(t.accruing_since(&alice()), None);
        assert_eq!(t.last_settled(&alice(), 1), None);
    }

    #[test]
    fn start_and_stop_toggle_state() {
        let mut t = AccrualWindowTracker::new();
        t.start(&alice(), Timestamp::new(100));
        assert_eq!(t.accruing_since(&alice()), Some(Timestamp::new(100)));
        t.stop(&alice());
        assert!(!t.is_accruing(&alice()));
        t.start(&alice(), Timestamp::new(300));
        assert_eq!(t.accruing_since(&alice()), Some(Timestamp::new(300)));
    }

    #[test]
    fn timestamp_zero_is_a_real_start() {
        let mut t = AccrualWindowTracker::new();
        t.start(&alice(), Timestamp::EPOCH);
        assert!(t.is_accruing(&alice()));
    }

    #[test]
    fn cursor_never_moves_backwards() {
        let mut t = AccrualWindowTracker::new();
        assert_eq!(t.advance_cursor(&alice(), 1, Timestamp::new(500)), Timestamp::new(500));
        assert_eq!(t.advance_cursor(&alice(), 1, Timestamp::new(400)), Timestamp::new(500));
        assert_eq!(t.advance_cursor(&alice(), 1, Timestamp::new(900)), Timestamp::new(900));
        assert_eq!(t.last_settled(&alice(), 2), None);
    }

    #[test]
    fn stop_keeps_cursors() {
        let mut t = AccrualWindowTracker::new();
        t.start(&alice(), Timestamp::new(0));
        t.advance_cursor(&alice(), 1, Timestamp::new(50));
        t.stop(&alice());
        assert_eq!(t.last_settled(&alice(), 1), Some(Timestamp::new(50)));
        assert_eq!(t.cursors().count(), 1);
    }
}
