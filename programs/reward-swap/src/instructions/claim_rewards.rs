use crate::{
    error::Result,
    state::{Address, PoolState},
};
use super::fee_math::{claim, settle, settle_provider};

/// Settle `provider` and empty its pending reward. Returns the amount the
/// reward token must mint. Refused with `NothingToClaim` before any write.
pub fn handler(state: &mut PoolState, provider: &Address) -> Result<u64> {
    let acc = state.totals.acc_reward_per_share;
    let (position, amount) = claim(&settle_provider(provider, &state.position(provider), acc)?, acc)?;
    state.store_position(provider, position);
    Ok(amount)
}

/// What `handler` would pay right now, without settling anything.
pub fn pending(state: &PoolState, provider: &Address) -> Result<u64> {
    Ok(settle(&state.position(provider), state.totals.acc_reward_per_share)?.pending_reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PoolError,
        instructions::{provide_liquidity, remove_liquidity, swap},
        state::Direction,
    };

    #[test]
    fn rewards_follow_share_count_and_survive_exit() {
        let mut state = PoolState::default();
        let p1 = Address::from("p1");
        let p2 = Address::from("p2");
        provide_liquidity::handler(&mut state, &p1, 3_000, 3_000, 0).unwrap();
        provide_liquidity::handler(&mut state, &p2, 1_000, 1_000, 0).unwrap();

        // 4% of 10_000 = 400 reward, split 3:1
        swap::handler(&mut state.totals, 10_000, Direction::AToB, 0, 400).unwrap();
        assert_eq!(pending(&state, &p1).unwrap(), 300);
        assert_eq!(pending(&state, &p2).unwrap(), 100);

        remove_liquidity::handler(&mut state, &p2, remove_liquidity::Burn::All, 0, 0).unwrap();
        assert_eq!(state.position(&p2).pending_reward, 100);

        assert_eq!(handler(&mut state, &p2).unwrap(), 100);
        assert!(!state.positions.contains_key(&p2));
        assert_eq!(handler(&mut state, &p2).unwrap_err(), PoolError::NothingToClaim);
        assert_eq!(handler(&mut state, &p1).unwrap(), 300);
    }

    #[test]
    fn late_joiner_earns_nothing_retroactively() {
        let mut state = PoolState::default();
        let early = Address::from("early");
        let late = Address::from("late");
        provide_liquidity::handler(&mut state, &early, 1_000, 1_000, 0).unwrap();
        swap::handler(&mut state.totals, 500, Direction::BToA, 0, 1_000).unwrap();

        provide_liquidity::handler(&mut state, &late, 100, 100, 0).unwrap();

        assert_eq!(pending(&state, &late).unwrap(), 0);
        assert_eq!(pending(&state, &early).unwrap(), 50);
    }
}
