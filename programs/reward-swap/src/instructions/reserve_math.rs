use crate::{
    error::{PoolError, Result},
    state::{Direction, PoolTotals},
};

/// Constant-product output: `dy = y * dx / (x + dx)`, floored.
///
/// Pure. Refuses to price against an empty side of the pool.
pub fn quote(reserve_in: u64, reserve_out: u64, amount_in: u64) -> Result<u64> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(PoolError::InsufficientLiquidity);
    }
    let amount_out = (reserve_out as u128)
        .checked_mul(amount_in as u128)
        .ok_or(PoolError::MathOverflow)?
        / (reserve_in as u128)
            .checked_add(amount_in as u128)
            .ok_or(PoolError::MathOverflow)?;
    // amount_out < reserve_out, so it always fits
    Ok(amount_out as u64)
}

/// Move `amount_in` into the input reserve and `amount_out` out of the
/// output reserve. Slippage has already been checked by the caller.
pub fn apply_swap(
    totals: &mut PoolTotals,
    amount_in: u64,
    amount_out: u64,
    direction: Direction,
) -> Result<()> {
    let new_in = totals
        .reserve(direction.input())
        .checked_add(amount_in)
        .ok_or(PoolError::MathOverflow)?;
    let new_out = totals
        .reserve(direction.output())
        .checked_sub(amount_out)
        .ok_or(PoolError::InsufficientLiquidity)?;
    *totals.reserve_mut(direction.input()) = new_in;
    *totals.reserve_mut(direction.output()) = new_out;
    Ok(())
}

// ─── Integer square root (Babylonian method) ──────────────────────────────
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) >> 1;
    while y < x {
        x = y;
        y = (y + n / y) >> 1;
    }
    x
}
