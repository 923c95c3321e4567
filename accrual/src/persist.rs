//! Saving and restoring engine state through an [`AccrualStore`].

use crate::engine::AccrualEngine;
use crate::error::AccrualError;
use crate::gate::GovernanceGate;
use crate::policy::{Policy, PolicyRegistry};
use crate::tracker::{AccrualWindowTracker, ParticipantState};
use ubi_external::{EligibilityRegistry, FungibleLedger};
use ubi_store::{AccrualStore, StoreError};
use ubi_types::{AccrualParams, Address, Timestamp};

const CONTROLLER_KEY: &[u8] = b"controller";
const PARAMS_KEY: &[u8] = b"params";
const THIRD_PARTY_START_KEY: &[u8] = b"allow_third_party_start";

impl<R, L> AccrualEngine<R, L>
where
    R: EligibilityRegistry,
    L: FungibleLedger,
{
    /// Persist all engine state to an accrual store.
    ///
    /// Pending mint records are not persisted; drain them first.
    pub fn save_to_store(&self, store: &dyn AccrualStore) -> Result<(), AccrualError> {
        store.put_meta(CONTROLLER_KEY, &bincode::serialize(self.controller())?)?;
        store.put_meta(PARAMS_KEY, &bincode::serialize(self.params())?)?;
        store.put_meta(
            THIRD_PARTY_START_KEY,
            &[u8::from(self.allows_third_party_start())],
        )?;

        for (id, policy) in self.policies.iter() {
            store.put_policy(id, &bincode::serialize(policy)?)?;
        }
        for (addr, state) in self.tracker.participants() {
            store.put_participant(addr, &bincode::serialize(state)?)?;
        }
        for (addr, policy, at) in self.tracker.cursors() {
            store.put_cursor(addr, policy, &bincode::serialize(&at)?)?;
        }

        tracing::debug!(policies = self.policies.len(), "accrual state saved");
        Ok(())
    }

    /// Restore engine state from an accrual store, attaching fresh collaborators.
    pub fn load_from_store(
        store: &dyn AccrualStore,
        registry: R,
        ledger: L,
    ) -> Result<Self, AccrualError> {
        let controller: Address = match store.get_meta(CONTROLLER_KEY)? {
            Some(bytes) => bincode::deserialize(&bytes)?,
            None => return Err(StoreError::NotFound("controller".to_string()).into()),
        };
        let params: AccrualParams = match store.get_meta(PARAMS_KEY)? {
            Some(bytes) => bincode::deserialize(&bytes)?,
            None => AccrualParams::default(),
        };
        let allow_third_party_start = matches!(
            store.get_meta(THIRD_PARTY_START_KEY)?.as_deref(),
            Some([1])
        );

        let mut policies = PolicyRegistry::new();
        for (id, bytes) in store.iter_policies()? {
            let policy: Policy = bincode::deserialize(&bytes)?;
            policies.restore(id, policy);
        }

        let mut tracker = AccrualWindowTracker::new();
        for (addr, bytes) in store.iter_participants()? {
            let state: ParticipantState = bincode::deserialize(&bytes)?;
            tracker.restore_participant(addr, state);
        }
        for (addr, policy, bytes) in store.iter_cursors()? {
            let at: Timestamp = bincode::deserialize(&bytes)?;
            tracker.restore_cursor(addr, policy, at);
        }

        tracing::debug!(policies = policies.len(), "accrual state loaded");
        Ok(Self::from_parts(
            GovernanceGate::new(controller),
            params,
            allow_third_party_start,
            policies,
            tracker,
            registry,
            ledger,
        ))
    }
}
