use crate::{
    constants::*,
    error::{PoolError, Result},
    state::{Address, PoolTotals, Position},
};

/// Reward carved out of one swap input: `amount_in * rate_bps / 10_000`.
pub fn swap_fee(amount_in: u64, reward_rate_bps: u16) -> u64 {
    // rate ≤ 10_000, so the result never exceeds amount_in
    (amount_in as u128 * reward_rate_bps as u128 / BPS_DENOMINATOR) as u64
}

/// Accumulator increase for `fee` spread over `total_shares`, scaled by `SCALE`.
pub fn reward_per_share_delta(fee: u64, total_shares: u64) -> Result<u128> {
    if total_shares == 0 || fee == 0 {
        return Ok(0);
    }
    Ok((fee as u128)
        .checked_mul(SCALE)
        .ok_or(PoolError::MathOverflow)?
        / total_shares as u128)
}

/// Credit a swap's fee to every outstanding share. Returns the fee.
///
/// A swap needs non-zero reserves, which need non-zero shares, so the
/// zero-share branch never distributes anything and is never expected.
pub fn on_swap_fee(totals: &mut PoolTotals, amount_in: u64, reward_rate_bps: u16) -> Result<u64> {
    let fee = swap_fee(amount_in, reward_rate_bps);
    debug_assert!(
        totals.total_shares > 0,
        "swap fee accrued against a pool with no shares"
    );
    let delta = reward_per_share_delta(fee, totals.total_shares)?;
    totals.acc_reward_per_share = totals
        .acc_reward_per_share
        .checked_add(delta)
        .ok_or(PoolError::MathOverflow)?;
    Ok(fee)
}

/// Reward earned by `shares` while the accumulator moved by `delta`:
/// `shares * delta / SCALE`, floored.
///
/// Divide-first so the product stays inside u128:
/// `shares * (delta / SCALE) + shares * (delta % SCALE) / SCALE`.
pub fn owed_for(shares: u64, delta: u128) -> Result<u64> {
    let shares = shares as u128;
    let whole = shares
        .checked_mul(delta / SCALE)
        .ok_or(PoolError::MathOverflow)?;
    let fraction = shares * (delta % SCALE) / SCALE;
    let owed = whole.checked_add(fraction).ok_or(PoolError::MathOverflow)?;
    u64::try_from(owed).map_err(|_| PoolError::MathOverflow)
}

// ─── Settlement ────────────────────────────────────────────────────────────
// Call before any change to position.shares.
/// Returns the position with everything earned since its last snapshot moved
/// into `pending_reward` and the snapshot advanced to `acc_reward_per_share`.
///
/// Pure: the caller decides whether to commit the settled position.
pub fn settle(position: &Position, acc_reward_per_share: u128) -> Result<Position> {
    debug_assert!(position.reward_debt <= acc_reward_per_share);
    let delta = acc_reward_per_share.saturating_sub(position.reward_debt);
    let owed = owed_for(position.shares, delta)?;
    Ok(Position {
        shares: position.shares,
        reward_debt: acc_reward_per_share,
        pending_reward: position
            .pending_reward
            .checked_add(owed)
            .ok_or(PoolError::MathOverflow)?,
    })
}

/// [`settle`] for a position that is about to be written back.
pub fn settle_provider(provider: &Address, position: &Position, acc_reward_per_share: u128) -> Result<Position> {
    let settled = settle(position, acc_reward_per_share)?;
    tracing::debug!(
        %provider,
        shares = position.shares,
        owed = settled.pending_reward - position.pending_reward,
        pending = settled.pending_reward,
        "position settled"
    );
    Ok(settled)
}

/// Settle, then empty `pending_reward`. Returns the emptied position and the
/// amount to pay out.
pub fn claim(position: &Position, acc_reward_per_share: u128) -> Result<(Position, u64)> {
    let mut settled = settle(position, acc_reward_per_share)?;
    if settled.pending_reward == 0 {
        return Err(PoolError::NothingToClaim);
    }
    let amount = settled.pending_reward;
    settled.pending_reward = 0;
    Ok((settled, amount))
}
