//! The accrual engine: the eligibility state machine that drives policies,
//! windows and cursors, and mints through the external ledger.

use crate::calculator::{self, Accrual};
use crate::config::AccrualConfig;
use crate::error::AccrualError;
use crate::event::MintRecord;
use crate::gate::GovernanceGate;
use crate::policy::{Policy, PolicyRegistry};
use crate::tracker::AccrualWindowTracker;
use std::collections::{BTreeSet, HashMap};
use ubi_external::{EligibilityRegistry, FungibleLedger, SnapshotId};
use ubi_types::{AccrualParams, Address, PolicyId, Timestamp};

/// Orchestrates every participant transition:
///
/// ```text
/// NotAccruing --start_accruing--> Accruing --report_removal--> NotAccruing
///                                  |    ^
///                                  +----+ mint_accrued
/// ```
///
/// Every entry point takes `&mut self` and either applies all of its effects
/// or none of them. All checks and arithmetic happen first, the ledger credit
/// next, and tracker writes last.
pub struct AccrualEngine<R, L> {
    gate: GovernanceGate,
    params: AccrualParams,
    allow_third_party_start: bool,
    pub(crate) policies: PolicyRegistry,
    pub(crate) tracker: AccrualWindowTracker,
    registry: R,
    ledger: L,
    mint_records: Vec<MintRecord>,
}

impl<R, L> AccrualEngine<R, L>
where
    R: EligibilityRegistry,
    L: FungibleLedger,
{
    /// Create an engine with no policies and default parameters.
    pub fn new(controller: Address, registry: R, ledger: L) -> Self {
        Self {
            gate: GovernanceGate::new(controller),
            params: AccrualParams::default(),
            allow_third_party_start: false,
            policies: PolicyRegistry::new(),
            tracker: AccrualWindowTracker::new(),
            registry,
            ledger,
            mint_records: Vec::new(),
        }
    }

    /// Create an engine from configuration, installing its genesis policies.
    pub fn from_config(config: &AccrualConfig, registry: R, ledger: L) -> Result<Self, AccrualError> {
        let mut engine = Self::new(config.controller.clone(), registry, ledger);
        engine.params = validate_params(config.params)?;
        engine.allow_third_party_start = config.allow_third_party_start;
        for p in &config.policies {
            engine.policies.insert(
                p.id,
                u128::from(p.rate_per_second),
                p.valid_from,
                p.valid_to,
            )?;
        }
        tracing::info!(
            controller = %config.controller,
            policies = engine.policies.len(),
            "accrual engine initialised"
        );
        Ok(engine)
    }

    pub(crate) fn from_parts(
        gate: GovernanceGate,
        params: AccrualParams,
        allow_third_party_start: bool,
        policies: PolicyRegistry,
        tracker: AccrualWindowTracker,
        registry: R,
        ledger: L,
    ) -> Self {
        Self {
            gate,
            params,
            allow_third_party_start,
            policies,
            tracker,
            registry,
            ledger,
            mint_records: Vec::new(),
        }
    }

    // ── Governor-only ──────────────────────────────────────────────────

    /// Create a rate policy accruing `rate_per_second` over `[valid_from, valid_to)`.
    pub fn add_policy(
        &mut self,
        caller: &Address,
        id: PolicyId,
        rate_per_second: u128,
        valid_from: Timestamp,
        valid_to: Timestamp,
    ) -> Result<(), AccrualError> {
        self.gate.ensure_governor(caller)?;
        self.policies.insert(id, rate_per_second, valid_from, valid_to)?;
        tracing::info!(
            policy = id,
            rate = %rate_per_second,
            valid_from = %valid_from,
            valid_to = %valid_to,
            "policy added"
        );
        Ok(())
    }

    /// Create a policy from the configured defaults, valid from `now`.
    pub fn add_default_policy(
        &mut self,
        caller: &Address,
        id: PolicyId,
        now: Timestamp,
    ) -> Result<(), AccrualError> {
        self.gate.ensure_governor(caller)?;
        let valid_to = now
            .checked_add_secs(self.params.default_policy_duration_secs)
            .ok_or(AccrualError::ArithmeticOverflow)?;
        self.add_policy(
            caller,
            id,
            u128::from(self.params.default_rate_per_second),
            now,
            valid_to,
        )
    }

    /// Terminate a policy as of `now`. Accrual up to `now` stays claimable.
    pub fn finalize_policy(
        &mut self,
        caller: &Address,
        id: PolicyId,
        now: Timestamp,
    ) -> Result<(), AccrualError> {
        self.gate.ensure_governor(caller)?;
        let previous = self.policies.finalize(id, now)?;
        tracing::info!(policy = id, previous_valid_to = %previous, valid_to = %now, "policy finalized");
        Ok(())
    }

    /// Replace the rate-policy defaults.
    pub fn set_params(&mut self, caller: &Address, params: AccrualParams) -> Result<(), AccrualError> {
        self.gate.ensure_governor(caller)?;
        self.params = validate_params(params)?;
        tracing::info!(
            default_rate = params.default_rate_per_second,
            default_duration_secs = params.default_policy_duration_secs,
            "accrual params updated"
        );
        Ok(())
    }

    /// Swap the eligibility registry collaborator.
    pub fn set_registry(&mut self, caller: &Address, registry: R) -> Result<(), AccrualError> {
        self.gate.ensure_governor(caller)?;
        self.registry = registry;
        tracing::info!("eligibility registry replaced");
        Ok(())
    }

    /// Ask the ledger to record a balance snapshot.
    pub fn take_snapshot(&mut self, caller: &Address) -> Result<SnapshotId, AccrualError> {
        self.gate.ensure_governor(caller)?;
        let id = self.ledger.take_snapshot()?;
        tracing::info!(snapshot = id, "ledger snapshot taken");
        Ok(id)
    }

    // ── Participant transitions ────────────────────────────────────────

    /// Move `participant` from NotAccruing to Accruing as of `now`.
    pub fn start_accruing(
        &mut self,
        caller: &Address,
        participant: &Address,
        now: Timestamp,
    ) -> Result<(), AccrualError> {
        if !self.allow_third_party_start && caller != participant {
            return Err(AccrualError::Unauthorized(caller.clone()));
        }
        self.ensure_eligible(participant)?;
        self.ensure_not_accruing(participant)?;
        self.tracker.start(participant, now);
        tracing::info!(participant = %participant, since = %now, "accrual started");
        Ok(())
    }

    /// Mint what `participant` has accrued under `policy` into its own balance.
    ///
    /// Zero is a valid result: nothing is credited but the record is still
    /// emitted. A policy that does not exist leaves no cursor behind.
    pub fn mint_accrued(
        &mut self,
        participant: &Address,
        policy: PolicyId,
        now: Timestamp,
    ) -> Result<MintRecord, AccrualError> {
        self.ensure_eligible(participant)?;
        let since = self.ensure_accruing(participant)?;

        let accrual = calculator::accrue(
            self.policies.get(policy),
            Some(since),
            self.tracker.last_settled(participant, policy),
            now,
        )?;

        self.credit(participant, accrual.amount)?;
        if let Some(to) = accrual.settle_to {
            self.tracker.advance_cursor(participant, policy, to);
        }

        Ok(self.record(participant, participant, accrual.amount, vec![policy], now))
    }

    /// Report that `participant` is no longer eligible.
    ///
    /// Everything it accrued under `policies` is settled and credited to
    /// `caller`, and the participant drops back to NotAccruing. Repeated ids
    /// are processed in order; a repeat finds its interval already settled
    /// and adds nothing.
    pub fn report_removal(
        &mut self,
        caller: &Address,
        participant: &Address,
        policies: &[PolicyId],
        now: Timestamp,
    ) -> Result<MintRecord, AccrualError> {
        let since = self.ensure_accruing(participant)?;
        self.ensure_ineligible(participant)?;

        // Staged cursors, so repeated ids see earlier settlements.
        let mut staged: HashMap<PolicyId, Timestamp> = HashMap::new();
        let mut total: u128 = 0;
        for &id in policies {
            let last_settled = staged
                .get(&id)
                .copied()
                .or_else(|| self.tracker.last_settled(participant, id));
            let Accrual { amount, settle_to } =
                calculator::accrue(self.policies.get(id), Some(since), last_settled, now)?;
            total = total
                .checked_add(amount)
                .ok_or(AccrualError::ArithmeticOverflow)?;
            if let Some(to) = settle_to {
                let at = last_settled.map_or(to, |prev| prev.max(to));
                staged.insert(id, at);
            }
        }

        self.credit(caller, total)?;
        for (id, to) in staged {
            self.tracker.advance_cursor(participant, id, to);
        }
        self.tracker.stop(participant);

        tracing::info!(participant = %participant, reporter = %caller, "participant removed");
        Ok(self.record(participant, caller, total, policies.to_vec(), now))
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// What `participant` could mint under `policy` at `now`. No side effects.
    pub fn get_accrued_value(
        &self,
        participant: &Address,
        policy: PolicyId,
        now: Timestamp,
    ) -> Result<u128, AccrualError> {
        let accrual = calculator::accrue(
            self.policies.get(policy),
            self.tracker.accruing_since(participant),
            self.tracker.last_settled(participant, policy),
            now,
        )?;
        Ok(accrual.amount)
    }

    /// Total claimable across `policies`, each counted once.
    pub fn accrued_across(
        &self,
        participant: &Address,
        policies: &[PolicyId],
        now: Timestamp,
    ) -> Result<u128, AccrualError> {
        let mut seen = BTreeSet::new();
        let mut total: u128 = 0;
        for &id in policies {
            if !seen.insert(id) {
                continue;
            }
            let amount = self.get_accrued_value(participant, id, now)?;
            total = total
                .checked_add(amount)
                .ok_or(AccrualError::ArithmeticOverflow)?;
        }
        Ok(total)
    }

    pub fn policy(&self, id: PolicyId) -> Option<&Policy> {
        self.policies.get(id)
    }

    pub fn policy_ids(&self) -> Vec<PolicyId> {
        self.policies.ids().collect()
    }

    pub fn accruing_since(&self, participant: &Address) -> Option<Timestamp> {
        self.tracker.accruing_since(participant)
    }

    pub fn last_settled(&self, participant: &Address, policy: PolicyId) -> Option<Timestamp> {
        self.tracker.last_settled(participant, policy)
    }

    pub fn controller(&self) -> &Address {
        self.gate.controller()
    }

    pub fn params(&self) -> &AccrualParams {
        &self.params
    }

    pub fn allows_third_party_start(&self) -> bool {
        self.allow_third_party_start
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn mint_records(&self) -> &[MintRecord] {
        &self.mint_records
    }

    /// Hand all pending mint records to the host.
    pub fn drain_mint_records(&mut self) -> Vec<MintRecord> {
        std::mem::take(&mut self.mint_records)
    }

    // ── Guards ─────────────────────────────────────────────────────────

    fn ensure_eligible(&self, participant: &Address) -> Result<(), AccrualError> {
        if !self.registry.is_eligible(participant) {
            return Err(AccrualError::NotEligible(participant.clone()));
        }
        Ok(())
    }

    fn ensure_ineligible(&self, participant: &Address) -> Result<(), AccrualError> {
        if self.registry.is_eligible(participant) {
            return Err(AccrualError::StillEligible(participant.clone()));
        }
        Ok(())
    }

    fn ensure_accruing(&self, participant: &Address) -> Result<Timestamp, AccrualError> {
        self.tracker
            .accruing_since(participant)
            .ok_or_else(|| AccrualError::NotAccruing(participant.clone()))
    }

    fn ensure_not_accruing(&self, participant: &Address) -> Result<(), AccrualError> {
        if self.tracker.is_accruing(participant) {
            return Err(AccrualError::AlreadyAccruing(participant.clone()));
        }
        Ok(())
    }

    fn credit(&mut self, beneficiary: &Address, amount: u128) -> Result<(), AccrualError> {
        if amount > 0 {
            self.ledger.credit(beneficiary, amount)?;
        }
        Ok(())
    }

    fn record(
        &mut self,
        accruer: &Address,
        beneficiary: &Address,
        amount: u128,
        policies: Vec<PolicyId>,
        at: Timestamp,
    ) -> MintRecord {
        let record = MintRecord {
            accruer: accruer.clone(),
            beneficiary: beneficiary.clone(),
            amount,
            policies,
            at,
        };
        if amount == 0 {
            tracing::debug!(accruer = %accruer, beneficiary = %beneficiary, "minted nothing");
        } else {
            tracing::info!(
                accruer = %accruer,
                beneficiary = %beneficiary,
                amount = %amount,
                "minted accrued value"
            );
        }
        self.mint_records.push(record.clone());
        record
    }
}

fn validate_params(params: AccrualParams) -> Result<AccrualParams, AccrualError> {
    if params.default_rate_per_second == 0 {
        return Err(AccrualError::ZeroRate);
    }
    if params.default_policy_duration_secs == 0 {
        return Err(AccrualError::InvalidWindow {
            valid_from: Timestamp::EPOCH,
            valid_to: Timestamp::EPOCH,
        });
    }
    Ok(params)
}
