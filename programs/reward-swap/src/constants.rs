/// Fixed-point scale of the reward-per-share accumulator (1e18).
pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Denominator for basis-point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound for `reward_rate_bps`: 100 %.
pub const MAX_REWARD_RATE_BPS: u16 = 10_000;

/// Default LP reward rate: 0.30 %
pub const DEFAULT_REWARD_RATE_BPS: u16 = 30;
