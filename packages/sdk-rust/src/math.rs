//! Client-side helpers on top of the pool arithmetic.
//!
//! Pricing and settlement themselves live in `reward_swap::instructions`;
//! the helpers here derive the values the client fills in for the caller.

use reward_swap::{
    instructions::{remove_liquidity::amounts_for_shares, settle},
    PoolTotals, Position,
};

use crate::error::{Error, Result};

/// Basis-point denominator for slippage tolerance.
pub const BPS_DENOMINATOR: u64 = 10_000;

// ─── Swap ─────────────────────────────────────────────────────────────────────

/// Floor for a swap's output: `estimated_out` less `max_slippage_bps`.
/// Zero tolerance disables the floor.
pub fn min_amount_out(estimated_out: u64, max_slippage_bps: u16) -> u64 {
    if max_slippage_bps == 0 {
        return 0;
    }
    let slack = estimated_out as u128 * max_slippage_bps.min(10_000) as u128 / BPS_DENOMINATOR as u128;
    estimated_out.saturating_sub(slack as u64)
}

/// B per A at the given reserves, `0.0` for an empty pool.
pub fn spot_price(totals: &PoolTotals) -> f64 {
    if totals.reserve_a == 0 {
        0.0
    } else {
        totals.reserve_b as f64 / totals.reserve_a as f64
    }
}

// ─── Provide liquidity ────────────────────────────────────────────────────────

/// Compute the `amount_b` to deposit alongside `amount_a`.
///
/// - If `amount_b` is `Some`, return it unchanged.
/// - If the pool is empty, `amount_b` is required.
/// - Otherwise, compute proportionally: `amount_b = amount_a × reserve_b / reserve_a`.
pub fn compute_amount_b(totals: &PoolTotals, amount_a: u64, amount_b: Option<u64>) -> Result<u64> {
    if let Some(b) = amount_b {
        return Ok(b);
    }
    if totals.total_shares == 0 {
        return Err(Error::AmountBRequired);
    }
    if totals.reserve_a == 0 {
        return Err(Error::NoLiquidity);
    }
    let b = (amount_a as u128)
        .checked_mul(totals.reserve_b as u128)
        .ok_or(Error::MathOverflow)?
        / totals.reserve_a as u128;
    if b == 0 {
        return Err(Error::AmountBZero);
    }
    u64::try_from(b).map_err(|_| Error::MathOverflow)
}

// ─── Positions ────────────────────────────────────────────────────────────────

/// `(amount_a, amount_b)` burning `shares` would return, `(0, 0)` for none.
pub fn redeemable(totals: &PoolTotals, shares: u64) -> Result<(u64, u64)> {
    if shares == 0 {
        return Ok((0, 0));
    }
    Ok(amounts_for_shares(totals, shares)?)
}

/// Reward `position` could claim at the current accumulator.
pub fn pending_reward(position: &Position, totals: &PoolTotals) -> Result<u64> {
    Ok(settle(position, totals.acc_reward_per_share)?.pending_reward)
}

/// `shares` as a percentage of all outstanding shares.
pub fn pool_share_pct(totals: &PoolTotals, shares: u64) -> f64 {
    if totals.total_shares == 0 {
        0.0
    } else {
        shares as f64 / totals.total_shares as f64 * 100.0
    }
}
