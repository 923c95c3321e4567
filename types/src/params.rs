//! Rate-policy defaults. Governable values used when the governor creates a
//! policy without spelling out its rate and window.

use serde::{Deserialize, Serialize};

/// Default accrual: 1 unit per second, i.e. 86_400 units per day.
pub const DEFAULT_RATE_PER_SECOND: u64 = 1;

/// Default policy lifetime: 365 days.
pub const DEFAULT_POLICY_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Governable rate-policy defaults stored alongside the policy table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualParams {
    /// Rate applied by `add_default_policy` (raw units per second).
    /// 64-bit so the value survives TOML, whose integers are `i64`.
    #[serde(default = "default_rate")]
    pub default_rate_per_second: u64,

    /// Window length applied by `add_default_policy`, starting at creation time.
    #[serde(default = "default_duration")]
    pub default_policy_duration_secs: u64,
}

fn default_rate() -> u64 {
    DEFAULT_RATE_PER_SECOND
}

fn default_duration() -> u64 {
    DEFAULT_POLICY_DURATION_SECS
}

impl Default for AccrualParams {
    fn default() -> Self {
        Self {
            default_rate_per_second: DEFAULT_RATE_PER_SECOND,
            default_policy_duration_secs: DEFAULT_POLICY_DURATION_SECS,
        }
    }
}
