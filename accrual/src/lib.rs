//! UBI accrual: the engine that turns eligibility over time into mintable value.
//!
//! Accrual is a deterministic function of time, not a token on the ledger:
//! `accrued(p, k) = rate_k × (min(now, valid_to_k) − start(p, k))`
//! where `start` is the later of when `p` began accruing, when policy `k`
//! opened, and how far `p` has already been paid under `k`.
//!
//! This crate handles:
//! - Rate policies and their one-way early termination
//! - Per-participant accrual windows and settlement cursors
//! - The start / mint / removal state machine
//! - Governor authorization, configuration and persistence

pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod gate;
pub mod persist;
pub mod policy;
pub mod tracker;

pub use calculator::{accrue, Accrual};
pub use config::{AccrualConfig, GenesisPolicy};
pub use engine::AccrualEngine;
pub use error::AccrualError;
pub use event::MintRecord;
pub use gate::GovernanceGate;
pub use policy::{Policy, PolicyRegistry};
pub use tracker::{AccrualWindowTracker, ParticipantState};
