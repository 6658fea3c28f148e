use crate::{
    error::{PoolError, Result},
    state::{Address, PoolState, PoolTotals},
};
use super::{fee_math::settle_provider, reserve_math::isqrt};

/// LP shares a deposit of `(amount_a, amount_b)` would mint.
///
/// First deposit sets the price and mints `sqrt(a * b)`; later deposits
/// mint against the smaller of the two ratios to prevent dilution.
pub fn shares_for_deposit(totals: &PoolTotals, amount_a: u64, amount_b: u64) -> Result<u64> {
    if amount_a == 0 || amount_b == 0 {
        return Err(PoolError::ZeroAmount);
    }

    let minted = if totals.total_shares == 0 {
        let product = (amount_a as u128)
            .checked_mul(amount_b as u128)
            .ok_or(PoolError::MathOverflow)?;
        isqrt(product)
    } else {
        if totals.reserve_a == 0 || totals.reserve_b == 0 {
            return Err(PoolError::InsufficientLiquidity);
        }
        let shares = totals.total_shares as u128;
        let from_a = (amount_a as u128)
            .checked_mul(shares)
            .ok_or(PoolError::MathOverflow)?
            / totals.reserve_a as u128;
        let from_b = (amount_b as u128)
            .checked_mul(shares)
            .ok_or(PoolError::MathOverflow)?
            / totals.reserve_b as u128;
        from_a.min(from_b)
    };

    if minted == 0 {
        return Err(PoolError::ZeroSharesMinted);
    }
    u64::try_from(minted).map_err(|_| PoolError::MathOverflow)
}

// ─── Handler ──────────────────────────────────────────────────────────────
/// Mint shares for `provider` and book the deposit into the reserves.
///
/// Reserves grow by exactly the supplied amounts even when one side
/// determined the share count. All checks run before the first write.
pub fn handler(
    state: &mut PoolState,
    provider: &Address,
    amount_a: u64,
    amount_b: u64,
    min_shares: u64,
) -> Result<u64> {
    let totals = state.totals;
    let minted = shares_for_deposit(&totals, amount_a, amount_b)?;
    if minted < min_shares {
        return Err(PoolError::SlippageExceeded { actual: minted, minimum: min_shares });
    }

    // Settle against the share count that earned the reward, then grow it
    let mut position = settle_provider(provider, &state.position(provider), totals.acc_reward_per_share)?;
    position.shares = position
        .shares
        .checked_add(minted)
        .ok_or(PoolError::MathOverflow)?;

    let next = PoolTotals {
        reserve_a: totals.reserve_a.checked_add(amount_a).ok_or(PoolError::MathOverflow)?,
        reserve_b: totals.reserve_b.checked_add(amount_b).ok_or(PoolError::MathOverflow)?,
        total_shares: totals.total_shares.checked_add(minted).ok_or(PoolError::MathOverflow)?,
        acc_reward_per_share: totals.acc_reward_per_share,
    };

    state.totals = next;
    state.store_position(provider, position);
    Ok(minted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_deposit_mints_geometric_mean() {
        let mut state = PoolState::default();
        let p1 = Address::from("p1");

        assert_eq!(handler(&mut state, &p1, 100, 100, 0).unwrap(), 100);
        assert_eq!(state.totals.reserve_a, 100);
        assert_eq!(state.totals.reserve_b, 100);
        assert_eq!(state.position(&p1).shares, 100);
    }

    #[test]
    fn skewed_deposit_mints_smaller_ratio_but_books_both_amounts() {
        let mut state = PoolState::default();
        handler(&mut state, &Address::from("p1"), 100, 100, 0).unwrap();

        let minted = handler(&mut state, &Address::from("p2"), 50, 80, 0).unwrap();

        assert_eq!(minted, 50);
        assert_eq!(state.totals.total_shares, 150);
        assert_eq!((state.totals.reserve_a, state.totals.reserve_b), (150, 180));
    }

    #[test]
    fn dust_deposit_is_refused_untouched() {
        let mut state = PoolState::default();
        handler(&mut state, &Address::from("whale"), 1_000_000, 1_000, 0).unwrap();
        let before = state.clone();

        let err = handler(&mut state, &Address::from("minnow"), 1, 1_000, 0).unwrap_err();

        assert_eq!(err, PoolError::ZeroSharesMinted);
        assert_eq!(state, before);
    }

    #[test]
    fn min_shares_floor_is_checked_before_writing() {
        let mut state = PoolState::default();
        let err = handler(&mut state, &Address::from("p1"), 100, 100, 101).unwrap_err();
        assert_eq!(err, PoolError::SlippageExceeded { actual: 100, minimum: 101 });
        assert_eq!(state, PoolState::default());
    }
}
