//! Time-bounded accrual rate policies and the registry that holds them.

use crate::error::AccrualError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ubi_types::{PolicyId, Timestamp};

/// A rate policy: `rate_per_second` accrues over the half-open window
/// `[valid_from, valid_to)`.
///
/// The rate never changes once stored. `valid_to` can only move earlier,
/// once, through [`PolicyRegistry::finalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Raw units accrued per elapsed second. Always non-zero.
    pub rate_per_second: u128,
    pub valid_from: Timestamp,
    pub valid_to: Timestamp,
}

impl Policy {
    pub fn new(
        rate_per_second: u128,
        valid_from: Timestamp,
        valid_to: Timestamp,
    ) -> Result<Self, AccrualError> {
        if rate_per_second == 0 {
            return Err(AccrualError::ZeroRate);
        }
        if valid_from >= valid_to {
            return Err(AccrualError::InvalidWindow {
                valid_from,
                valid_to,
            });
        }
        Ok(Self {
            rate_per_second,
            valid_from,
            valid_to,
        })
    }

    /// The latest instant that can be settled at `now`: `min(now, valid_to)`.
    pub fn settle_point(&self, now: Timestamp) -> Timestamp {
        now.min(self.valid_to)
    }
}

/// Policy table keyed by [`PolicyId`]. Entries are never removed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PolicyRegistry {
    policies: BTreeMap<PolicyId, Policy>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new policy. Fails if `id` is taken or the policy is malformed.
    pub fn insert(
        &mut self,
        id: PolicyId,
        rate_per_second: u128,
        valid_from: Timestamp,
        valid_to: Timestamp,
    ) -> Result<Policy, AccrualError> {
        if self.contains(id) {
            return Err(AccrualError::PolicyAlreadyExists(id));
        }
        let policy = Policy::new(rate_per_second, valid_from, valid_to)?;
        self.policies.insert(id, policy);
        Ok(policy)
    }

    /// Terminate a policy early: clamp `valid_to` to `now`.
    ///
    /// Returns the previous `valid_to`.
    pub fn finalize(&mut self, id: PolicyId, now: Timestamp) -> Result<Timestamp, AccrualError> {
        let policy = self
            .policies
            .get_mut(&id)
            .ok_or(AccrualError::UnknownPolicy(id))?;
        if policy.valid_to <= now {
            return Err(AccrualError::AlreadyExpired {
                id,
                valid_to: policy.valid_to,
            });
        }
        let previous = policy.valid_to;
        policy.valid_to = now;
        Ok(previous)
    }

    pub fn get(&self, id: PolicyId) -> Option<&Policy> {
        self.policies.get(&id)
    }

    pub fn contains(&self, id: PolicyId) -> bool {
        self.policies.contains_key(&id)
    }

    /// All known policy ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = PolicyId> + '_ {
        self.policies.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PolicyId, &Policy)> {
        self.policies.iter().map(|(id, p)| (*id, p))
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Restore a stored policy verbatim, bypassing creation checks.
    pub(crate) fn restore(&mut self, id: PolicyId, policy: Policy) {
        self.policies.insert(id, policy);
    }
}
