//! Accrual computation: a pure function of policy, window, cursor and time.
//!
//! `accrued = rate × (min(now, valid_to) − start)` where `start` is the
//! latest of: when the participant started accruing, when the policy became
//! valid, and how far the participant has already been paid.

use crate::error::AccrualError;
use crate::policy::Policy;
use ubi_types::Timestamp;

/// Outcome of an accrual computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accrual {
    /// Claimable amount in raw units.
    pub amount: u128,
    /// Where the settlement cursor moves if this accrual is paid out.
    /// `None` when there is nothing to settle against (participant not
    /// accruing, or unknown policy).
    pub settle_to: Option<Timestamp>,
}

impl Accrual {
    pub const NONE: Self = Self {
        amount: 0,
        settle_to: None,
    };
}

/// Compute the claimable amount for one participant under one policy.
///
/// Never fails for a participant that is not accruing or for an unknown
/// policy: both yield zero. The only error is an overflowing product.
pub fn accrue(
    policy: Option<&Policy>,
    accruing_since: Option<Timestamp>,
    last_settled: Option<Timestamp>,
    now: Timestamp,
) -> Result<Accrual, AccrualError> {
    let (Some(policy), Some(since)) = (policy, accruing_since) else {
        return Ok(Accrual::NONE);
    };

    let window_start = since.max(policy.valid_from);
    let start = match last_settled {
        None => window_start,
        // A cursor left over from an earlier accruing period cannot reach
        // back past the current one.
        Some(cursor) => cursor.max(window_start),
    };
    let end = policy.settle_point(now);
    let settle_to = Some(end);

    if end <= start {
        return Ok(Accrual {
            amount: 0,
            settle_to,
        });
    }

    let elapsed = end
        .as_secs()
        .checked_sub(start.as_secs())
        .ok_or(AccrualError::ArithmeticOverflow)?;
    let amount = policy
        .rate_per_second
        .checked_mul(u128::from(elapsed))
        .ok_or(AccrualError::ArithmeticOverflow)?;

    Ok(Accrual { amount, settle_to })
}
