use serde::{Deserialize, Serialize};

use crate::{
    error::{PoolError, Result},
    state::{Direction, PoolTotals},
};
use super::{fee_math::{on_swap_fee, swap_fee}, reserve_math::{apply_swap, quote}};

/// What a committed swap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub amount_in: u64,
    pub amount_out: u64,
    /// Reward credited to LPs; not deducted from the traded amount.
    pub fee: u64,
    pub direction: Direction,
}

/// Read-only breakdown of a hypothetical swap against the current reserves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapPreview {
    pub direction: Direction,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee: u64,
    pub reserve_in: u64,
    pub reserve_out: u64,
    /// Reserves after the swap, `(reserve_a, reserve_b)`
    pub reserves_after: (u64, u64),
    /// `amount_out / amount_in`
    pub effective_rate: f64,
    /// `amount_in / (reserve_in + amount_in) * 100`
    pub price_impact_pct: f64,
}

/// Core constant-product swap: x * y = k.
///
/// Output is priced on the full input; the LP reward is credited to the
/// accumulator separately and paid out by the reward token on claim.
pub fn handler(
    totals: &mut PoolTotals,
    amount_in: u64,
    direction: Direction,
    min_amount_out: u64,
    reward_rate_bps: u16,
) -> Result<SwapOutcome> {
    if amount_in == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let amount_out = quote(
        totals.reserve(direction.input()),
        totals.reserve(direction.output()),
        amount_in,
    )?;
    if amount_out < min_amount_out {
        return Err(PoolError::SlippageExceeded { actual: amount_out, minimum: min_amount_out });
    }
    if amount_out == 0 {
        return Err(PoolError::ZeroAmount);
    }

    // Work on a copy so an overflow halfway leaves `totals` untouched
    let mut next = *totals;
    apply_swap(&mut next, amount_in, amount_out, direction)?;
    let fee = on_swap_fee(&mut next, amount_in, reward_rate_bps)?;
    debug_assert!(next.k() >= totals.k());
    *totals = next;

    Ok(SwapOutcome { amount_in, amount_out, fee, direction })
}

/// Off-chain style fee and slippage preview. Never mutates.
pub fn preview(
    totals: &PoolTotals,
    amount_in: u64,
    direction: Direction,
    reward_rate_bps: u16,
) -> Result<SwapPreview> {
    if amount_in == 0 {
        return Err(PoolError::ZeroAmount);
    }
    let reserve_in = totals.reserve(direction.input());
    let reserve_out = totals.reserve(direction.output());
    let amount_out = quote(reserve_in, reserve_out, amount_in)?;

    let mut after = *totals;
    apply_swap(&mut after, amount_in, amount_out, direction)?;

    Ok(SwapPreview {
        direction,
        amount_in,
        amount_out,
        fee: swap_fee(amount_in, reward_rate_bps),
        reserve_in,
        reserve_out,
        reserves_after: (after.reserve_a, after.reserve_b),
        effective_rate: amount_out as f64 / amount_in as f64,
        price_impact_pct: amount_in as f64 / (reserve_in as f64 + amount_in as f64) * 100.0,
    })
}
