use crate::{
    error::{PoolError, Result},
    state::{Address, PoolState, PoolTotals},
};
use super::fee_math::settle_provider;

/// How many shares to burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burn {
    /// Everything the position holds.
    All,
    Exact(u64),
}

/// Result of a committed burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    pub shares: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Reserves owed for burning `shares` out of `totals.total_shares`, floored.
pub fn amounts_for_shares(totals: &PoolTotals, shares: u64) -> Result<(u64, u64)> {
    if totals.total_shares == 0 {
        return Err(PoolError::InsufficientLiquidity);
    }
    let portion = |reserve: u64| -> Result<u64> {
        let amount = (reserve as u128)
            .checked_mul(shares as u128)
            .ok_or(PoolError::MathOverflow)?
            / totals.total_shares as u128;
        u64::try_from(amount).map_err(|_| PoolError::MathOverflow)
    };
    Ok((portion(totals.reserve_a)?, portion(totals.reserve_b)?))
}

/// Burn shares from `provider` and release the proportional reserves.
/// Rewards are settled first; they stay claimable after a full exit.
pub fn handler(
    state: &mut PoolState,
    provider: &Address,
    burn: Burn,
    min_a: u64,
    min_b: u64,
) -> Result<Withdrawal> {
    let totals = state.totals;
    let held = state.position(provider).shares;
    if held == 0 {
        return Err(PoolError::NoPosition);
    }
    let shares = match burn {
        Burn::All => held,
        Burn::Exact(0) => return Err(PoolError::ZeroAmount),
        Burn::Exact(requested) if requested > held => {
            return Err(PoolError::InsufficientShares { requested, held })
        }
        Burn::Exact(requested) => requested,
    };

    let (amount_a, amount_b) = amounts_for_shares(&totals, shares)?;
    if amount_a < min_a {
        return Err(PoolError::SlippageExceeded { actual: amount_a, minimum: min_a });
    }
    if amount_b < min_b {
        return Err(PoolError::SlippageExceeded { actual: amount_b, minimum: min_b });
    }

    let mut position = settle_provider(provider, &state.position(provider), totals.acc_reward_per_share)?;
    position.shares = held - shares;

    // amount_x ≤ reserve_x because shares ≤ total_shares
    state.totals = PoolTotals {
        reserve_a: totals.reserve_a - amount_a,
        reserve_b: totals.reserve_b - amount_b,
        total_shares: totals.total_shares - shares,
        acc_reward_per_share: totals.acc_reward_per_share,
    };
    state.store_position(provider, position);
    Ok(Withdrawal { shares, amount_a, amount_b })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::provide_liquidity;

    fn seeded() -> PoolState {
        let mut state = PoolState::default();
        provide_liquidity::handler(&mut state, &Address::from("p1"), 100, 100, 0).unwrap();
        provide_liquidity::handler(&mut state, &Address::from("p2"), 50, 50, 0).unwrap();
        state
    }

    #[test]
    fn full_exit_returns_proportional_reserves() {
        let mut state = seeded();
        let out = handler(&mut state, &Address::from("p2"), Burn::All, 0, 0).unwrap();

        assert_eq!(out, Withdrawal { shares: 50, amount_a: 50, amount_b: 50 });
        assert_eq!(state.totals.total_shares, 100);
        assert!(!state.positions.contains_key(&Address::from("p2")));
    }

    #[test]
    fn caller_without_shares_gets_no_position() {
        let mut state = seeded();
        let before = state.clone();
        let err = handler(&mut state, &Address::from("nobody"), Burn::All, 0, 0).unwrap_err();
        assert_eq!(err, PoolError::NoPosition);
        assert_eq!(state, before);
    }

    #[test]
    fn partial_burn_respects_holdings_and_floors() {
        let mut state = seeded();
        let p1 = Address::from("p1");

        assert_eq!(
            handler(&mut state, &p1, Burn::Exact(101), 0, 0).unwrap_err(),
            PoolError::InsufficientShares { requested: 101, held: 100 }
        );
        assert_eq!(handler(&mut state, &p1, Burn::Exact(0), 0, 0).unwrap_err(), PoolError::ZeroAmount);
        assert_eq!(
            handler(&mut state, &p1, Burn::Exact(30), 31, 0).unwrap_err(),
            PoolError::SlippageExceeded { actual: 30, minimum: 31 }
        );

        let out = handler(&mut state, &p1, Burn::Exact(30), 30, 30).unwrap();
        assert_eq!((out.amount_a, out.amount_b), (30, 30));
        assert_eq!(state.position(&p1).shares, 70);
        assert_eq!(state.totals.total_shares, 120);
    }
}
